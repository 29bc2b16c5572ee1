//! Progress record version gate

use tracing::{debug, warn};

use crate::error::{ProgressError, Result};

/// Oldest record version with the nested requirements schema
pub const MINIMUM_SUPPORTED_VERSION: u32 = 5;

/// Newest record version this crate knows about
pub const CURRENT_VERSION: u32 = 5;

/// Outcome of a successful version check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionCheck {
    Supported,
    /// Newer than [`CURRENT_VERSION`]; processing continues
    Newer { found: u32, current: u32 },
}

/// Reject records older than the supported floor, warn about newer ones
pub fn check_version(version: u32) -> Result<VersionCheck> {
    debug!(version, "check_version: called");
    if version < MINIMUM_SUPPORTED_VERSION {
        return Err(ProgressError::UnsupportedVersion {
            found: version,
            minimum: MINIMUM_SUPPORTED_VERSION,
        });
    }
    if version > CURRENT_VERSION {
        warn!(
            version,
            current = CURRENT_VERSION,
            "Progress data version is newer than supported, output may be incomplete"
        );
        return Ok(VersionCheck::Newer {
            found: version,
            current: CURRENT_VERSION,
        });
    }
    Ok(VersionCheck::Supported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_old_version_rejected() {
        let err = check_version(MINIMUM_SUPPORTED_VERSION - 1).unwrap_err();
        assert!(matches!(
            err,
            ProgressError::UnsupportedVersion { found: 4, minimum: 5 }
        ));
    }

    #[test]
    fn test_current_version_supported() {
        assert_eq!(check_version(CURRENT_VERSION).unwrap(), VersionCheck::Supported);
    }

    #[test]
    fn test_newer_version_is_warning_only() {
        assert_eq!(
            check_version(CURRENT_VERSION + 2).unwrap(),
            VersionCheck::Newer {
                found: CURRENT_VERSION + 2,
                current: CURRENT_VERSION
            }
        );
    }
}
