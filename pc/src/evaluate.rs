//! Progress evaluation
//!
//! Turns exercises into submission statistics and checks them against the
//! requirement rules. Every defined rule yields one [`RequirementStatus`] row;
//! rows are computed in a fixed order and all of them are kept even after the
//! overall result has already failed.

use tracing::debug;

use crate::model::{Exercise, PointsRecord, Requirements, Submission, SubmissionState};
use crate::render::{render_floating_point_number, render_percentage};

/// `minimumPoints.perSubmission`
pub const MINIMUM_POINTS: &str = "Minimum points";
/// `minimumPassedExercises.minimumPointsForPass`
pub const MINIMUM_POINTS_FOR_PASS: &str = "Minimum points for pass";
/// `minimumPointsPercentage.perSubmission`
pub const MINIMUM_POINTS_PERCENTAGE: &str = "Minimum points percentage";
/// `minimumPassedExercises.minimumPointsPercentageForPass`
pub const MINIMUM_POINTS_PERCENTAGE_FOR_PASS: &str = "Minimum points percentage for pass";
/// `minimumPoints.allSubmissions`
pub const MINIMUM_POINTS_ALL: &str = "Minimum points (all submissions)";
/// `minimumPointsPercentage.allSubmissions`
pub const MINIMUM_POINTS_PERCENTAGE_ALL: &str = "Minimum points percentage (all submissions)";
/// `minimumPassedExercises.number`
pub const MINIMUM_PASSED_EXERCISES: &str = "Minimum passed exercises";
/// `minimumPassedExercises.percentage`
pub const MINIMUM_PASSED_EXERCISES_PERCENTAGE: &str = "Minimum passed exercises percentage";

/// Aggregated points and state of an exercise that has submission data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionInfo {
    pub achieved_points: f64,
    pub total_points: f64,
    /// At least one item is neither graded nor marked not-submitted
    pub pending: bool,
    /// At least one item is graded or pending
    pub submitted: bool,
}

impl SubmissionInfo {
    /// Achieved share of the total, `None` when there is nothing to achieve
    pub fn ratio(&self) -> Option<f64> {
        ratio(self.achieved_points, self.total_points)
    }

    /// Graded outcome, i.e. neither pending nor completely unsubmitted
    pub fn is_graded(&self) -> bool {
        !self.pending && self.submitted
    }
}

/// Submission statistics of one exercise
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExerciseInfo {
    /// No submission, or an empty task list
    NoSubmission,
    Found(SubmissionInfo),
}

impl ExerciseInfo {
    pub fn found(&self) -> Option<&SubmissionInfo> {
        match self {
            Self::NoSubmission => None,
            Self::Found(info) => Some(info),
        }
    }
}

/// Result of checking one requirement rule
#[derive(Debug, Clone, PartialEq)]
pub struct RequirementStatus {
    /// Rule description, e.g. "Minimum points"
    pub requirement: String,
    /// "achieved/needed"
    pub status: String,
    pub passed: bool,
}

/// Overall outcome plus one row per defined rule
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub passed: bool,
    pub requirements: Vec<RequirementStatus>,
}

/// Pass/fail outcome of one exercise
#[derive(Debug, Clone, PartialEq)]
pub enum PassedInfo {
    /// Nothing to evaluate, counts as not passed
    NoSubmission,
    /// Not graded yet, the outcome is undecided
    Pending,
    Evaluated(Evaluation),
}

impl PassedInfo {
    pub fn passed(&self) -> bool {
        match self {
            Self::NoSubmission | Self::Pending => false,
            Self::Evaluated(evaluation) => evaluation.passed,
        }
    }

    pub fn requirements(&self) -> &[RequirementStatus] {
        match self {
            Self::NoSubmission | Self::Pending => &[],
            Self::Evaluated(evaluation) => &evaluation.requirements,
        }
    }
}

/// Sums over all exercises that have submission data
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CourseTotals {
    pub achieved_points: f64,
    pub total_points: f64,
    pub exercises_with_submission: usize,
    pub passed_exercises: usize,
}

/// Collects requirement rows and latches the overall result
struct RequirementChecker {
    passed: bool,
    requirements: Vec<RequirementStatus>,
}

impl RequirementChecker {
    fn new(passed: bool) -> Self {
        Self {
            passed,
            requirements: Vec::new(),
        }
    }

    fn check(&mut self, requirement: &str, status: String, passed: bool) {
        debug!(requirement, %status, passed, "RequirementChecker::check: called");
        self.passed &= passed;
        self.requirements.push(RequirementStatus {
            requirement: requirement.to_string(),
            status,
            passed,
        });
    }

    fn check_points(&mut self, requirement: &str, achieved: f64, needed: f64) {
        let status = format!(
            "{}/{}",
            render_floating_point_number(achieved),
            render_floating_point_number(needed)
        );
        self.check(requirement, status, achieved >= needed);
    }

    fn check_percentage(&mut self, requirement: &str, ratio: Option<f64>, needed: f64) {
        let status = format!(
            "{}%/{}%",
            render_percentage(ratio.unwrap_or(0.0)),
            render_percentage(needed)
        );
        // Zero totals fail
        self.check(requirement, status, ratio.is_some_and(|r| r >= needed));
    }

    fn finish(self) -> Evaluation {
        Evaluation {
            passed: self.passed,
            requirements: self.requirements,
        }
    }
}

fn ratio(achieved: f64, total: f64) -> Option<f64> {
    if total > 0.0 { Some(achieved / total) } else { None }
}

fn summarize<'a, R, I>(items: I) -> SubmissionInfo
where
    R: PointsRecord + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let empty = SubmissionInfo {
        achieved_points: 0.0,
        total_points: 0.0,
        pending: false,
        submitted: false,
    };
    items.into_iter().fold(empty, |info, item| SubmissionInfo {
        achieved_points: info.achieved_points + item.achieved_points().unwrap_or(0.0),
        total_points: info.total_points + item.points(),
        pending: info.pending || item.state() == SubmissionState::Pending,
        submitted: info.submitted || item.state() != SubmissionState::NotSubmitted,
    })
}

/// Compute submission statistics for one exercise
pub fn get_exercise_info(exercise: &Exercise) -> ExerciseInfo {
    debug!(name = %exercise.name, "get_exercise_info: called");
    match &exercise.submission {
        None => ExerciseInfo::NoSubmission,
        Some(Submission::Tasks(tasks)) if tasks.is_empty() => ExerciseInfo::NoSubmission,
        Some(Submission::Tasks(tasks)) => ExerciseInfo::Found(summarize(tasks)),
        Some(Submission::Summary(summary)) => ExerciseInfo::Found(summarize([summary])),
    }
}

/// Check one exercise against the per-submission rules
pub fn get_exercise_passed_info(info: &ExerciseInfo, requirements: &Requirements) -> PassedInfo {
    debug!(?info, "get_exercise_passed_info: called");
    let info = match info {
        ExerciseInfo::NoSubmission => return PassedInfo::NoSubmission,
        ExerciseInfo::Found(info) if info.pending => return PassedInfo::Pending,
        ExerciseInfo::Found(info) => info,
    };

    let mut checker = RequirementChecker::new(info.submitted);
    let points = requirements.minimum_points.as_ref();
    let percentage = requirements.minimum_points_percentage.as_ref();
    let passed_exercises = requirements.minimum_passed_exercises.as_ref();

    if let Some(needed) = points.and_then(|p| p.per_submission) {
        checker.check_points(MINIMUM_POINTS, info.achieved_points, needed);
    }
    if let Some(needed) = passed_exercises.and_then(|p| p.minimum_points_for_pass) {
        checker.check_points(MINIMUM_POINTS_FOR_PASS, info.achieved_points, needed);
    }
    if let Some(needed) = percentage.and_then(|p| p.per_submission) {
        checker.check_percentage(MINIMUM_POINTS_PERCENTAGE, info.ratio(), needed);
    }
    if let Some(needed) = passed_exercises.and_then(|p| p.minimum_points_percentage_for_pass) {
        checker.check_percentage(MINIMUM_POINTS_PERCENTAGE_FOR_PASS, info.ratio(), needed);
    }

    PassedInfo::Evaluated(checker.finish())
}

/// Labels of the per-exercise rules that are defined, in evaluation order
pub fn exercise_requirement_labels(requirements: &Requirements) -> Vec<&'static str> {
    let points = requirements.minimum_points.as_ref();
    let percentage = requirements.minimum_points_percentage.as_ref();
    let passed_exercises = requirements.minimum_passed_exercises.as_ref();

    [
        (points.and_then(|p| p.per_submission).is_some(), MINIMUM_POINTS),
        (
            passed_exercises.and_then(|p| p.minimum_points_for_pass).is_some(),
            MINIMUM_POINTS_FOR_PASS,
        ),
        (percentage.and_then(|p| p.per_submission).is_some(), MINIMUM_POINTS_PERCENTAGE),
        (
            passed_exercises
                .and_then(|p| p.minimum_points_percentage_for_pass)
                .is_some(),
            MINIMUM_POINTS_PERCENTAGE_FOR_PASS,
        ),
    ]
    .into_iter()
    .filter_map(|(defined, label)| defined.then_some(label))
    .collect()
}

/// Sum points and count passed exercises over the whole course
pub fn get_course_totals(exercises: &[Exercise], requirements: &Requirements) -> CourseTotals {
    debug!(count = exercises.len(), "get_course_totals: called");
    exercises
        .iter()
        .map(get_exercise_info)
        .fold(CourseTotals::default(), |totals, info| match info {
            ExerciseInfo::NoSubmission => totals,
            ExerciseInfo::Found(found) => {
                let passed = get_exercise_passed_info(&info, requirements).passed();
                CourseTotals {
                    achieved_points: totals.achieved_points + found.achieved_points,
                    total_points: totals.total_points + found.total_points,
                    exercises_with_submission: totals.exercises_with_submission + 1,
                    passed_exercises: totals.passed_exercises + usize::from(passed),
                }
            }
        })
}

/// Check the whole course against the all-submission and passed-exercise rules
pub fn get_course_passed_info(exercises: &[Exercise], requirements: &Requirements) -> Evaluation {
    debug!(count = exercises.len(), "get_course_passed_info: called");
    let totals = get_course_totals(exercises, requirements);
    let mut checker = RequirementChecker::new(true);
    let points = requirements.minimum_points.as_ref();
    let percentage = requirements.minimum_points_percentage.as_ref();
    let passed_exercises = requirements.minimum_passed_exercises.as_ref();

    if let Some(needed) = points.and_then(|p| p.all_submissions) {
        checker.check_points(MINIMUM_POINTS_ALL, totals.achieved_points, needed);
    }
    if let Some(needed) = percentage.and_then(|p| p.all_submissions) {
        checker.check_percentage(
            MINIMUM_POINTS_PERCENTAGE_ALL,
            ratio(totals.achieved_points, totals.total_points),
            needed,
        );
    }
    if let Some(needed) = passed_exercises.and_then(|p| p.number) {
        checker.check(
            MINIMUM_PASSED_EXERCISES,
            format!("{}/{}", totals.passed_exercises, needed),
            totals.passed_exercises >= needed as usize,
        );
    }
    if let Some(needed) = passed_exercises.and_then(|p| p.percentage) {
        checker.check_percentage(
            MINIMUM_PASSED_EXERCISES_PERCENTAGE,
            ratio(totals.passed_exercises as f64, totals.exercises_with_submission as f64),
            needed,
        );
    }

    checker.finish()
}
