//! Error types for navigation trees, URL generation and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, NavigationError>;

/// Errors raised by navigation nodes, resolvers, factories and the middleware constructor.
///
/// None of these are retried: the data is either well-formed or the failure
/// is a configuration/programming error that the caller has to fix.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// An element handed to the middleware is not a navigation container.
    #[error("invalid container at position {index}: expected a navigation container, got {found}")]
    Construction {
        /// Position of the offending element in the candidate list.
        index: usize,
        /// Short description of what was found instead.
        found: String,
    },

    /// A caller supplied an argument the operation cannot accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration file path does not point to an existing file.
    #[error("invalid argument: config file {} does not exist", path.display())]
    ConfigNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The URL resolver could not produce an href.
    #[error("cannot generate URL for {}: {reason}", route.as_deref().unwrap_or("<current route>"))]
    UrlResolution {
        /// The route that was requested, `None` when reusing the matched route.
        route: Option<String>,
        /// Why generation failed.
        reason: String,
    },

    /// A JSON configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// A YAML configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavigationError {
    /// Shorthand for [`NavigationError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Shorthand for [`NavigationError::UrlResolution`].
    pub fn url_resolution(route: Option<&str>, reason: impl Into<String>) -> Self {
        Self::UrlResolution {
            route: route.map(str::to_string),
            reason: reason.into(),
        }
    }

    /// Whether this error reports a rejected argument (including missing config files).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::ConfigNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_display() {
        let error = NavigationError::Construction {
            index: 2,
            found: "String".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "invalid container at position 2: expected a navigation container, got String"
        );
    }

    #[test]
    fn test_url_resolution_display() {
        let error = NavigationError::url_resolution(Some("user.detail"), "missing parameter 'id'");
        assert_eq!(
            error.to_string(),
            "cannot generate URL for user.detail: missing parameter 'id'"
        );

        let error = NavigationError::url_resolution(None, "route match failed");
        assert_eq!(
            error.to_string(),
            "cannot generate URL for <current route>: route match failed"
        );
    }

    #[test]
    fn test_invalid_argument_classification() {
        assert!(NavigationError::invalid_argument("empty route").is_invalid_argument());
        assert!(NavigationError::ConfigNotFound {
            path: PathBuf::from("/nope.yaml")
        }
        .is_invalid_argument());
        assert!(!NavigationError::url_resolution(None, "x").is_invalid_argument());
    }
}
