//! Read the progress file, render it and rewrite the document region

use eyre::{Context, Result};
use progresscore::region::{ProgressIndicators, indent_content, update_readme_comment_content};
use progresscore::{CourseProgressData, render_new_progress_content};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for a single update run
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub progress_path: PathBuf,
    pub readme_path: PathBuf,
    /// Section type used in the marker lines
    pub section: String,
    /// Compute the new document without writing it
    pub dry_run: bool,
}

/// Result of an update run
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub progress_name: String,
    pub readme_path: PathBuf,
    /// Updated document content
    pub document: String,
    /// Whether the document differs from what was on disk
    pub changed: bool,
    /// Whether the document was written
    pub written: bool,
}

/// Read and parse a progress JSON file
pub fn load_progress_data(path: &Path) -> Result<CourseProgressData> {
    debug!(path = %path.display(), "load_progress_data: called");
    let content = fs::read_to_string(path).context(format!("Failed to read progress file: {}", path.display()))?;
    CourseProgressData::from_json(&content).context(format!("Failed to parse progress file: {}", path.display()))
}

/// Load a progress file and render its region content
pub fn render_progress_file(path: &Path) -> Result<(CourseProgressData, String)> {
    let data = load_progress_data(path)?;
    let content =
        render_new_progress_content(&data).context(format!("Failed to render progress file: {}", path.display()))?;
    Ok((data, content))
}

/// Replace the progress region of the document
///
/// Nothing is written when rendering or marker lookup fails, or when the
/// document is already up to date.
pub fn update_document(options: &UpdateOptions) -> Result<UpdateOutcome> {
    debug!(?options, "update_document: called");
    let (data, content) = render_progress_file(&options.progress_path)?;
    let indicators = ProgressIndicators::new(&data.progress_name, &options.section);

    let readme_path = &options.readme_path;
    let current =
        fs::read_to_string(readme_path).context(format!("Failed to read document: {}", readme_path.display()))?;
    let document =
        match update_readme_comment_content(&current, &indicators, |indent| indent_content(&content, indent)) {
            Ok(document) => document,
            Err(e) if e.is_document_error() => {
                return Err(e).context(format!(
                    "Progress markers for '{}' must appear exactly once in {}",
                    data.progress_name,
                    readme_path.display()
                ));
            }
            Err(e) => {
                return Err(e).context(format!("Failed to update progress region in {}", readme_path.display()));
            }
        };

    let changed = document != current;
    let written = changed && !options.dry_run;
    if written {
        fs::write(readme_path, &document).context(format!("Failed to write document: {}", readme_path.display()))?;
        info!(path = %readme_path.display(), progress_name = %data.progress_name, "Updated progress region");
    } else {
        info!(path = %readme_path.display(), changed, dry_run = options.dry_run, "Document not written");
    }

    Ok(UpdateOutcome {
        progress_name: data.progress_name,
        readme_path: readme_path.clone(),
        document,
        changed,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROGRESS: &str = r#"{
        "progressName": "algo",
        "version": 5,
        "exercises": [
            {"name": 1, "submission": {"points": 10, "achievedPoints": 5}},
            {"name": 2, "submission": {"points": 10}}
        ]
    }"#;

    fn setup(readme: &str) -> (TempDir, UpdateOptions) {
        let temp = TempDir::new().unwrap();
        let progress_path = temp.path().join("progress.json");
        let readme_path = temp.path().join("README.md");
        fs::write(&progress_path, PROGRESS).unwrap();
        fs::write(&readme_path, readme).unwrap();
        let options = UpdateOptions {
            progress_path,
            readme_path,
            section: "Progress".to_string(),
            dry_run: false,
        };
        (temp, options)
    }

    #[test]
    fn test_update_writes_region() {
        let (_temp, options) = setup("# Course\n\n[//]: # (Progress algo begin)\n[//]: # (Progress algo end)\n\nEnd\n");

        let outcome = update_document(&options).unwrap();
        assert!(outcome.changed);
        assert!(outcome.written);

        let written = fs::read_to_string(&options.readme_path).unwrap();
        assert_eq!(
            written,
            "# Course\n\n[//]: # (Progress algo begin)\n\n\
             | Exercise | Points | Notes |\n| --- | --- | --- |\n| 1 | 5/10 (50%) |  |\n| 2 | ?/10 |  |\n\n\
             [//]: # (Progress algo end)\n\nEnd\n"
        );
    }

    #[test]
    fn test_second_update_is_noop() {
        let (_temp, options) = setup("[//]: # (Progress algo begin)\nold\n[//]: # (Progress algo end)\n");

        let first = update_document(&options).unwrap();
        assert!(first.written);
        let second = update_document(&options).unwrap();
        assert!(!second.changed);
        assert!(!second.written);
        assert_eq!(first.document, second.document);
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let original = "[//]: # (Progress algo begin)\n[//]: # (Progress algo end)\n";
        let (_temp, mut options) = setup(original);
        options.dry_run = true;

        let outcome = update_document(&options).unwrap();
        assert!(outcome.changed);
        assert!(!outcome.written);
        assert_eq!(fs::read_to_string(&options.readme_path).unwrap(), original);
    }

    #[test]
    fn test_missing_marker_reports_path_and_leaves_file() {
        let original = "# No markers\n";
        let (_temp, options) = setup(original);

        let err = update_document(&options).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("Progress markers for 'algo' must appear exactly once"));
        assert!(msg.contains("README.md"));
        assert!(msg.contains("[//]: # (Progress algo begin)"));
        assert_eq!(fs::read_to_string(&options.readme_path).unwrap(), original);
    }

    #[test]
    fn test_duplicate_end_marker_leaves_file() {
        let original = "[//]: # (Progress algo begin)\n[//]: # (Progress algo end)\n[//]: # (Progress algo end)\n";
        let (_temp, options) = setup(original);

        let err = update_document(&options).unwrap_err();
        assert!(format!("{:#}", err).contains("found 2 occurrences"));
        assert_eq!(fs::read_to_string(&options.readme_path).unwrap(), original);
    }

    #[test]
    fn test_custom_section_markers() {
        let (_temp, mut options) = setup("[//]: # (Grades algo begin)\n[//]: # (Grades algo end)\n");
        options.section = "Grades".to_string();
        assert!(update_document(&options).unwrap().written);
    }

    #[test]
    fn test_invalid_json_reports_path() {
        let (_temp, options) = setup("");
        fs::write(&options.progress_path, "{ not json").unwrap();

        let err = update_document(&options).unwrap_err();
        assert!(format!("{:#}", err).contains("progress.json"));
    }
}
