//! Unified error handling for the elevation-matcher library.
//!
//! All fallible operations return [`Result`] with a single error enum,
//! so callers get one consistent surface instead of mixed
//! Option/panic/silent-default behavior.

use std::fmt;

/// Unified error type for elevation-matcher operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ElevationMatchError {
    /// Raw sample sequence is malformed or degenerate
    InvalidProfile {
        profile_id: String,
        message: String,
    },
    /// Two normalized profiles have different lengths and cannot be compared
    IncompatibleProfiles {
        id_a: String,
        id_b: String,
        len_a: usize,
        len_b: usize,
    },
    /// Invalid configuration (thresholds, weights, resample count)
    ConfigError { message: String },
    /// Catalog lookup for an unknown profile id
    ProfileNotFound { profile_id: String },
    /// A ranking pass was cancelled cooperatively
    Cancelled,
}

impl fmt::Display for ElevationMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevationMatchError::InvalidProfile {
                profile_id,
                message,
            } => {
                write!(f, "Profile '{}' is invalid: {}", profile_id, message)
            }
            ElevationMatchError::IncompatibleProfiles {
                id_a,
                id_b,
                len_a,
                len_b,
            } => {
                write!(
                    f,
                    "Profiles '{}' ({} points) and '{}' ({} points) have mismatched resolutions",
                    id_a, len_a, id_b, len_b
                )
            }
            ElevationMatchError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            ElevationMatchError::ProfileNotFound { profile_id } => {
                write!(f, "No profile with id '{}'", profile_id)
            }
            ElevationMatchError::Cancelled => {
                write!(f, "Matching pass was cancelled")
            }
        }
    }
}

impl ElevationMatchError {
    /// Re-tag an `InvalidProfile` error with the owning profile's id.
    ///
    /// `normalize_profile` operates on bare sample slices and cannot know
    /// which profile they belong to; callers that do know attach the id here.
    pub(crate) fn with_profile_id(self, id: &str) -> Self {
        match self {
            ElevationMatchError::InvalidProfile { message, .. } => {
                ElevationMatchError::InvalidProfile {
                    profile_id: id.to_string(),
                    message,
                }
            }
            other => other,
        }
    }
}

impl std::error::Error for ElevationMatchError {}

/// Result type alias for elevation-matcher operations.
pub type Result<T> = std::result::Result<T, ElevationMatchError>;

/// Extension trait for converting Option to ElevationMatchError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a profile-not-found error.
    fn ok_or_not_found(self, profile_id: &str) -> Result<T>;

    /// Convert Option to Result with an invalid-profile error.
    fn ok_or_invalid(self, profile_id: &str, message: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, profile_id: &str) -> Result<T> {
        self.ok_or_else(|| ElevationMatchError::ProfileNotFound {
            profile_id: profile_id.to_string(),
        })
    }

    fn ok_or_invalid(self, profile_id: &str, message: &str) -> Result<T> {
        self.ok_or_else(|| ElevationMatchError::InvalidProfile {
            profile_id: profile_id.to_string(),
            message: message.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ElevationMatchError::InvalidProfile {
            profile_id: "route-1".to_string(),
            message: "only 1 sample, minimum 2 required".to_string(),
        };
        assert!(err.to_string().contains("route-1"));
        assert!(err.to_string().contains("minimum 2"));

        let err = ElevationMatchError::IncompatibleProfiles {
            id_a: "a".to_string(),
            id_b: "b".to_string(),
            len_a: 100,
            len_b: 50,
        };
        assert!(err.to_string().contains("100"));
        assert!(err.to_string().contains("50"));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        let result = none.ok_or_not_found("missing-route");
        assert!(matches!(
            result,
            Err(ElevationMatchError::ProfileNotFound { .. })
        ));

        let result = none.ok_or_invalid("bad-route", "empty samples");
        assert!(matches!(
            result,
            Err(ElevationMatchError::InvalidProfile { .. })
        ));
    }
}
