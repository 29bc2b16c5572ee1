//! In-place replacement of a marked document region
//!
//! A region is delimited by two markdown comment lines:
//!
//! ```text
//! [//]: # (Progress algo begin)
//! ...owned content...
//! [//]: # (Progress algo end)
//! ```
//!
//! Everything outside the markers is left untouched.

use tracing::debug;

use crate::error::{ProgressError, Result};

/// Default section type used in marker lines
pub const DEFAULT_SECTION: &str = "Progress";

/// Begin and end marker of one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressIndicators {
    pub begin: String,
    pub end: String,
}

impl ProgressIndicators {
    /// Build the marker pair for a region id and section type
    pub fn new(id: &str, section: &str) -> Self {
        Self {
            begin: format!("[//]: # ({} {} begin)", section, id),
            end: format!("[//]: # ({} {} end)", section, id),
        }
    }
}

/// Markers for a progress region: `[//]: # (Progress <id> begin)`
pub fn readme_progress_indicators(id: &str) -> ProgressIndicators {
    ProgressIndicators::new(id, DEFAULT_SECTION)
}

fn ensure_single(content: &str, marker: &str) -> Result<()> {
    match content.matches(marker).count() {
        1 => Ok(()),
        count => Err(ProgressError::MarkerMismatch {
            marker: marker.to_string(),
            count,
        }),
    }
}

fn split_once_exactly<'a>(content: &'a str, marker: &str) -> Result<(&'a str, &'a str)> {
    ensure_single(content, marker)?;
    content.split_once(marker).ok_or_else(|| ProgressError::MarkerMismatch {
        marker: marker.to_string(),
        count: 0,
    })
}

/// Indentation of the begin marker line: leading spaces, tabs and `>` quote markers
fn marker_indent(before: &str) -> &str {
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line = &before[line_start..];
    let indent_len = line
        .find(|c: char| !matches!(c, ' ' | '\t' | '>'))
        .unwrap_or(line.len());
    &line[..indent_len]
}

/// Prefix every non-empty line with `indent`
pub fn indent_content(content: &str, indent: &str) -> String {
    if indent.is_empty() {
        return content.to_string();
    }
    content
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace the region between the markers with freshly generated content
///
/// Each marker must occur exactly once in the whole document, the end
/// marker after the begin marker. `generate` receives the indentation of the begin marker line.
pub fn update_readme_comment_content<F>(content: &str, indicators: &ProgressIndicators, generate: F) -> Result<String>
where
    F: FnOnce(&str) -> String,
{
    debug!(begin = %indicators.begin, "update_readme_comment_content: called");
    let (before, rest) = split_once_exactly(content, &indicators.begin)?;
    ensure_single(content, &indicators.end)?;
    let (_, after) = split_once_exactly(rest, &indicators.end)?;
    let indent = marker_indent(before);
    let generated = generate(indent);

    Ok(format!(
        "{}{}\n\n{}\n\n{}{}{}",
        before, indicators.begin, generated, indent, indicators.end, after
    ))
}
