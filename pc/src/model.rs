//! Course progress record types
//!
//! Mirrors the `progress.json` document: a course with an ordered list of
//! exercises, each optionally carrying a single submission summary or a list
//! of task submissions, plus an optional requirement rule set.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::error::{ProgressError, Result};

/// Root record of a progress file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgressData {
    /// Course display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identifier used to locate the document region (`[//]: # (Progress <id> begin)`)
    pub progress_name: String,

    /// Record format version, checked by [`crate::version::check_version`]
    pub version: u32,

    /// Exercises in display and accumulation order
    pub exercises: Vec<Exercise>,

    /// Pass/fail rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Requirements>,
}

impl CourseProgressData {
    /// Parse a record from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        debug!(len = content.len(), "CourseProgressData::from_json: called");
        Ok(serde_json::from_str(content)?)
    }

    /// Requirements, or an empty rule set when none are defined
    pub fn requirements_or_default(&self) -> Requirements {
        self.requirements.clone().unwrap_or_default()
    }
}

/// Display label of an exercise (`"name": 1` or `"name": "Intro"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExerciseName {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for ExerciseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One graded unit of coursework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Display label (older files call this `number`)
    #[serde(alias = "number")]
    pub name: ExerciseName,

    /// Directory the exercise lives in, used for links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Feedback file for the whole exercise, relative to `directory`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_file: Option<String>,

    /// Free text appended to the notes column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// ISO date of the submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

impl Exercise {
    /// Parse `submission_date` into a calendar day
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps.
    /// Timestamps keep the day of their own offset.
    pub fn submission_day(&self) -> Result<Option<NaiveDate>> {
        let Some(value) = self.submission_date.as_deref() else {
            return Ok(None);
        };
        debug!(%value, "Exercise::submission_day: called");

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Ok(Some(datetime.date_naive()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Some(datetime.date()));
            }
        }

        Err(ProgressError::InvalidDate {
            exercise: self.name.to_string(),
            value: value.to_string(),
        })
    }
}

/// Submission data of an exercise: one summary or a list of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Submission {
    Tasks(Vec<TaskSubmission>),
    Summary(SubmissionSummary),
}

/// Grading state of a submission or task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmissionState {
    /// `achievedPoints` is defined
    Graded(f64),
    /// Intentionally skipped, never graded
    NotSubmitted,
    /// Still open
    Pending,
}

/// Anything carrying achievable/achieved points and a not-submitted flag
pub trait PointsRecord {
    fn points(&self) -> f64;
    fn achieved_points(&self) -> Option<f64>;
    fn not_submitted(&self) -> bool;

    /// Graded wins over the not-submitted flag
    fn state(&self) -> SubmissionState {
        match self.achieved_points() {
            Some(achieved) => SubmissionState::Graded(achieved),
            None if self.not_submitted() => SubmissionState::NotSubmitted,
            None => SubmissionState::Pending,
        }
    }
}

/// Single submission for a whole exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionSummary {
    pub points: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_points: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_submitted: bool,
}

impl PointsRecord for SubmissionSummary {
    fn points(&self) -> f64 {
        self.points
    }

    fn achieved_points(&self) -> Option<f64> {
        self.achieved_points
    }

    fn not_submitted(&self) -> bool {
        self.not_submitted
    }
}

/// One task of an exercise submitted as a task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Task directory, relative to the exercise directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    /// Feedback file, relative to the task directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_file: Option<String>,

    pub points: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achieved_points: Option<f64>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_submitted: bool,
}

impl PointsRecord for TaskSubmission {
    fn points(&self) -> f64 {
        self.points
    }

    fn achieved_points(&self) -> Option<f64> {
        self.achieved_points
    }

    fn not_submitted(&self) -> bool {
        self.not_submitted
    }
}

/// Optional pass/fail rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_points: Option<PointThresholds>,

    /// Fractions in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_points_percentage: Option<PointThresholds>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_passed_exercises: Option<PassedExercisesThresholds>,
}

/// Threshold applied per submission and/or to the sum of all submissions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_submission: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_submissions: Option<f64>,
}

/// How many exercises must pass, and what makes a single exercise pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassedExercisesThresholds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,

    /// Fraction in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_points_for_pass: Option<f64>,

    /// Fraction in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_points_percentage_for_pass: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exercise(value: serde_json::Value) -> Exercise {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_full_record() {
        let data = CourseProgressData::from_json(
            r#"{
                "$schema": "./progress.schema.json",
                "name": "Algorithms",
                "progressName": "algo",
                "version": 5,
                "exercises": [
                    {"name": 1, "directory": "ex01", "submission": {"points": 10, "achievedPoints": 7.5}},
                    {"name": "Project", "submission": [{"name": "a", "points": 4}, {"points": 3, "notSubmitted": true}]},
                    {"name": 3}
                ],
                "requirements": {"minimumPoints": {"allSubmissions": 15}}
            }"#,
        )
        .unwrap();

        assert_eq!(data.progress_name, "algo");
        assert_eq!(data.exercises.len(), 3);
        assert_eq!(data.exercises[0].name.to_string(), "1");
        assert_eq!(data.exercises[1].name.to_string(), "Project");
        assert!(matches!(data.exercises[0].submission, Some(Submission::Summary(_))));
        assert!(matches!(data.exercises[1].submission, Some(Submission::Tasks(ref t)) if t.len() == 2));
        assert!(data.exercises[2].submission.is_none());
        assert_eq!(
            data.requirements_or_default().minimum_points.unwrap().all_submissions,
            Some(15.0)
        );
    }

    #[test]
    fn test_legacy_number_key() {
        let ex = exercise(json!({"number": 4, "submission": {"points": 2}}));
        assert_eq!(ex.name.to_string(), "4");
    }

    #[test]
    fn test_missing_points_is_error() {
        let result = CourseProgressData::from_json(
            r#"{"progressName": "x", "version": 5, "exercises": [{"name": 1, "submission": {"achievedPoints": 2}}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_state() {
        let graded = SubmissionSummary {
            points: 10.0,
            achieved_points: Some(5.0),
            not_submitted: true,
        };
        assert_eq!(graded.state(), SubmissionState::Graded(5.0));

        let skipped = SubmissionSummary {
            points: 10.0,
            achieved_points: None,
            not_submitted: true,
        };
        assert_eq!(skipped.state(), SubmissionState::NotSubmitted);

        let open = SubmissionSummary {
            points: 10.0,
            achieved_points: None,
            not_submitted: false,
        };
        assert_eq!(open.state(), SubmissionState::Pending);
    }

    #[test]
    fn test_submission_day_formats() {
        let ex = exercise(json!({"name": 1, "submissionDate": "2021-04-09"}));
        assert_eq!(ex.submission_day().unwrap(), NaiveDate::from_ymd_opt(2021, 4, 9));

        let ex = exercise(json!({"name": 1, "submissionDate": "2021-04-09T23:30:00+02:00"}));
        assert_eq!(ex.submission_day().unwrap(), NaiveDate::from_ymd_opt(2021, 4, 9));

        let ex = exercise(json!({"name": 1, "submissionDate": "2021-04-09T08:00:00"}));
        assert_eq!(ex.submission_day().unwrap(), NaiveDate::from_ymd_opt(2021, 4, 9));

        let ex = exercise(json!({"name": 1}));
        assert_eq!(ex.submission_day().unwrap(), None);
    }

    #[test]
    fn test_submission_day_invalid() {
        let ex = exercise(json!({"name": "Intro", "submissionDate": "next tuesday"}));
        let err = ex.submission_day().unwrap_err();
        assert!(matches!(err, ProgressError::InvalidDate { ref exercise, .. } if exercise == "Intro"));
    }
}
