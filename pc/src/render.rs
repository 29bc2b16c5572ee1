//! Markdown rendering of course progress
//!
//! Produces two tables: an optional course requirements table and the
//! `Exercise | Points | Notes` table. Output is deterministic for a given
//! record so that re-running on an updated document changes nothing.

use tracing::{debug, info};

use crate::error::Result;
use crate::evaluate::{
    ExerciseInfo, PassedInfo, exercise_requirement_labels, get_course_passed_info, get_exercise_info,
    get_exercise_passed_info,
};
use crate::model::{CourseProgressData, Exercise, PointsRecord, Requirements, Submission, SubmissionState, TaskSubmission};
use crate::version::check_version;

pub const GLYPH_PASSED: &str = ":heavy_check_mark:";
pub const GLYPH_FAILED: &str = ":x:";
pub const GLYPH_UNDECIDED: &str = ":warning:";

/// Header of the exercise table
pub const EXERCISE_TABLE_HEADER: [&str; 3] = ["Exercise", "Points", "Notes"];

/// Two decimals with trailing fractional zeros removed: `1` -> "1", `53.50` -> "53.5"
pub fn render_floating_point_number(number: f64) -> String {
    let fixed = format!("{:.2}", number);
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}

/// Render a fraction as a percentage number without the `%` sign
pub fn render_percentage(percentage: f64) -> String {
    render_floating_point_number(percentage * 100.0)
}

/// Check, cross or warning glyph for passed, failed or undecided
pub fn render_passed(passed: Option<bool>) -> &'static str {
    match passed {
        Some(true) => GLYPH_PASSED,
        Some(false) => GLYPH_FAILED,
        None => GLYPH_UNDECIDED,
    }
}

/// `| a | b |`
pub fn create_md_table_row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    format!("| {} |", cells.join(" | "))
}

/// Header row, separator row, then one row per body entry
pub fn create_md_table<H: AsRef<str>, C: AsRef<str>>(header: &[H], rows: &[Vec<C>]) -> String {
    let separator = vec!["---"; header.len()];
    let mut lines = vec![create_md_table_row(header), create_md_table_row(&separator)];
    lines.extend(rows.iter().map(|row| create_md_table_row(row)));
    lines.join("\n")
}

fn md_link(text: &str, target: &str) -> String {
    format!("[{}]({})", text, target)
}

/// Join link path segments with `/`, skipping absent or empty ones
fn join_link_path(segments: &[Option<&str>]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .flatten()
        .map(|s| s.trim_start_matches("./").trim_end_matches('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if parts.is_empty() { ".".to_string() } else { parts.join("/") }
}

/// Points string: "achieved/total", "~total~", "?/total", or the bare total without a state
pub fn render_points(state: Option<SubmissionState>, total: f64) -> String {
    let total_str = render_floating_point_number(total);
    match state {
        Some(SubmissionState::Graded(achieved)) => {
            format!("{}/{}", render_floating_point_number(achieved), total_str)
        }
        Some(SubmissionState::NotSubmitted) => format!("~{}~", total_str),
        Some(SubmissionState::Pending) => format!("?/{}", total_str),
        None => total_str,
    }
}

/// Render one task: optional label, then its points (linked to the feedback file once graded)
pub fn render_exercise_submission_task(task: &TaskSubmission, exercise_dir: Option<&str>) -> String {
    debug!(name = ?task.name, "render_exercise_submission_task: called");
    let state = task.state();
    let mut points = render_points(Some(state), task.points);
    if let (SubmissionState::Graded(_), Some(feedback)) = (state, task.feedback_file.as_deref()) {
        let target = join_link_path(&[exercise_dir, task.directory.as_deref(), Some(feedback)]);
        points = md_link(&points, &target);
    }

    match task.name.as_deref() {
        Some(name) => {
            let label = match task.directory.as_deref() {
                Some(dir) => md_link(name, &join_link_path(&[exercise_dir, Some(dir)])),
                None => name.to_string(),
            };
            format!("{}: {}", label, points)
        }
        None => points,
    }
}

fn render_exercise_name(exercise: &Exercise) -> Result<String> {
    let label = exercise.name.to_string();
    let mut name = match exercise.directory.as_deref() {
        Some(dir) => md_link(&label, dir),
        None => label,
    };
    if let Some(day) = exercise.submission_day()? {
        name = format!("{} ({})", name, day.format("%Y.%m.%d"));
    }
    Ok(name)
}

fn render_exercise_points(exercise: &Exercise, info: &ExerciseInfo) -> String {
    let (Some(submission), Some(info)) = (exercise.submission.as_ref(), info.found()) else {
        return String::new();
    };

    let state = if !info.submitted {
        SubmissionState::NotSubmitted
    } else if info.pending {
        SubmissionState::Pending
    } else {
        SubmissionState::Graded(info.achieved_points)
    };
    let mut total = render_points(Some(state), info.total_points);
    if let Some(feedback) = exercise.feedback_file.as_deref() {
        total = md_link(&total, &join_link_path(&[exercise.directory.as_deref(), Some(feedback)]));
    }
    if let (true, Some(ratio)) = (info.is_graded(), info.ratio()) {
        total = format!("{} ({}%)", total, render_percentage(ratio));
    }

    match submission {
        Submission::Tasks(tasks) => {
            let tasks: Vec<String> = tasks
                .iter()
                .map(|task| render_exercise_submission_task(task, exercise.directory.as_deref()))
                .collect();
            format!("{} = {}", tasks.join(" + "), total)
        }
        Submission::Summary(_) => total,
    }
}

fn render_exercise_notes(exercise: &Exercise, passed_info: &PassedInfo, requirements: &Requirements) -> String {
    let pairs: Vec<String> = match passed_info {
        PassedInfo::Pending => exercise_requirement_labels(requirements)
            .into_iter()
            .map(|label| format!("{} {}", label, render_passed(None)))
            .collect(),
        _ => passed_info
            .requirements()
            .iter()
            .map(|r| format!("{} {}", r.requirement, render_passed(Some(r.passed))))
            .collect(),
    };
    let pairs = pairs.join(", ");

    match exercise.notes.as_deref().filter(|text| !text.is_empty()) {
        Some(text) if pairs.is_empty() => text.to_string(),
        Some(text) => format!("{} - {}", pairs, text),
        None => pairs,
    }
}

/// Render the `[name, points, notes]` cells of one exercise
pub fn render_exercise_row(exercise: &Exercise, requirements: &Requirements) -> Result<[String; 3]> {
    debug!(name = %exercise.name, "render_exercise_row: called");
    let info = get_exercise_info(exercise);
    let passed_info = get_exercise_passed_info(&info, requirements);

    Ok([
        render_exercise_name(exercise)?,
        render_exercise_points(exercise, &info),
        render_exercise_notes(exercise, &passed_info, requirements),
    ])
}

/// Running totals threaded through the exercise rows
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RowAccumulator {
    pub achieved_points: f64,
    pub total_points: f64,
    pub rows: usize,
}

/// Render one row and return it with the updated accumulator
pub fn render_exercise_row_step(
    acc: RowAccumulator,
    exercise: &Exercise,
    requirements: &Requirements,
) -> Result<(RowAccumulator, [String; 3])> {
    let row = render_exercise_row(exercise, requirements)?;
    let next = match get_exercise_info(exercise) {
        ExerciseInfo::NoSubmission => RowAccumulator {
            rows: acc.rows + 1,
            ..acc
        },
        ExerciseInfo::Found(info) => RowAccumulator {
            achieved_points: acc.achieved_points + info.achieved_points,
            total_points: acc.total_points + info.total_points,
            rows: acc.rows + 1,
        },
    };
    Ok((next, row))
}

/// Render all exercise rows in order
pub fn render_exercise_rows(
    exercises: &[Exercise],
    requirements: &Requirements,
) -> Result<(Vec<[String; 3]>, RowAccumulator)> {
    exercises
        .iter()
        .try_fold((Vec::with_capacity(exercises.len()), RowAccumulator::default()), |(mut rows, acc), exercise| {
            let (acc, row) = render_exercise_row_step(acc, exercise, requirements)?;
            rows.push(row);
            Ok((rows, acc))
        })
}

/// Render the full markdown region content for a progress record
pub fn render_new_progress_content(data: &CourseProgressData) -> Result<String> {
    debug!(progress_name = %data.progress_name, "render_new_progress_content: called");
    check_version(data.version)?;
    let requirements = data.requirements_or_default();
    let mut blocks = Vec::new();

    let course = get_course_passed_info(&data.exercises, &requirements);
    if !course.requirements.is_empty() {
        let header: Vec<&str> = course.requirements.iter().map(|r| r.requirement.as_str()).collect();
        let row: Vec<String> = course
            .requirements
            .iter()
            .map(|r| format!("{} {}", r.status, render_passed(Some(r.passed))))
            .collect();
        blocks.push(create_md_table(&header, &[row]));
    }

    let (rows, totals) = render_exercise_rows(&data.exercises, &requirements)?;
    let rows: Vec<Vec<String>> = rows.into_iter().map(Vec::from).collect();
    blocks.push(create_md_table(&EXERCISE_TABLE_HEADER, &rows));

    info!(
        progress_name = %data.progress_name,
        rows = totals.rows,
        achieved = totals.achieved_points,
        total = totals.total_points,
        passed = course.passed,
        "Rendered progress content"
    );
    Ok(blocks.join("\n\n"))
}
