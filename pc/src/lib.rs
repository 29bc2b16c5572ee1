//! ProgressCore - course progress evaluation and markdown rendering
//!
//! Turns a `progress.json` course record into markdown tables and splices
//! them into a marked region of an existing document.
//!
//! # Pipeline
//!
//! ```text
//! CourseProgressData -> evaluate -> render -> region
//!   (model)             (pass/fail)  (tables)  (splice into README)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use progresscore::{CourseProgressData, readme_progress_indicators, render_new_progress_content};
//! use progresscore::region::{indent_content, update_readme_comment_content};
//!
//! let data = CourseProgressData::from_json(&json)?;
//! let content = render_new_progress_content(&data)?;
//! let markers = readme_progress_indicators(&data.progress_name);
//! let readme = update_readme_comment_content(&readme, &markers, |indent| indent_content(&content, indent))?;
//! ```

pub mod error;
pub mod evaluate;
pub mod model;
pub mod region;
pub mod render;
pub mod version;

pub use error::{ProgressError, Result};
pub use evaluate::{
    CourseTotals, Evaluation, ExerciseInfo, PassedInfo, RequirementStatus, SubmissionInfo, get_course_passed_info,
    get_course_totals, get_exercise_info, get_exercise_passed_info,
};
pub use model::{
    CourseProgressData, Exercise, ExerciseName, PassedExercisesThresholds, PointThresholds, PointsRecord, Requirements,
    Submission, SubmissionState, SubmissionSummary, TaskSubmission,
};
pub use region::{ProgressIndicators, readme_progress_indicators, update_readme_comment_content};
pub use render::{render_new_progress_content, render_passed, render_percentage};
pub use version::{CURRENT_VERSION, MINIMUM_SUPPORTED_VERSION, VersionCheck, check_version};
