//! Domain error types
//!
//! This module defines the error hierarchy for envset. Conversion failures of a
//! single value are reported as [`ValueError`]; everything the registry itself
//! reports is an [`EnvError`], which wraps the failing key around the cause.

use thiserror::Error;

/// Boxed error returned by caller-supplied parse callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main envset error type
///
/// Returned by registration, by a parse pass, and by the entry sources.
#[derive(Debug, Error)]
pub enum EnvError {
    /// A registered value rejected the text supplied for it
    #[error("cannot set value for {name}: {source}")]
    InvalidValue {
        /// Normalized key of the failing entry
        name: String,
        /// Underlying conversion failure
        #[source]
        source: ValueError,
    },

    /// A second value was registered under a key already in use
    #[error("environment variable redefined: {0}")]
    Redefined(String),

    /// `set` was called with a key that has no registered value
    #[error("no such environment variable: {0}")]
    UnknownKey(String),

    /// Reading an entry source failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A dotenv file could not be read or parsed
    #[error("dotenv error: {0}")]
    Dotenv(String),
}

impl EnvError {
    /// Returns the key this error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            EnvError::InvalidValue { name, .. } => Some(name),
            EnvError::Redefined(name) | EnvError::UnknownKey(name) => Some(name),
            EnvError::Io(_) | EnvError::Dotenv(_) => None,
        }
    }
}

/// Conversion failure of a single typed value
///
/// The destination is left untouched whenever one of these is returned.
#[derive(Debug, Error)]
pub enum ValueError {
    /// Text is not a member of the value's grammar
    #[error("parse error: invalid syntax {input:?}")]
    Syntax {
        /// Offending text
        input: String,
    },

    /// Text is well formed but does not fit the destination type
    #[error("value out of range: {input:?}")]
    Range {
        /// Offending text
        input: String,
    },

    /// Duration literal could not be parsed
    #[error(transparent)]
    Duration(#[from] DurationError),

    /// Failure reported by a caller-supplied value or callback
    #[error("{0}")]
    Custom(BoxError),
}

impl ValueError {
    /// Short category name that carries none of the offending text
    pub fn kind(&self) -> &'static str {
        match self {
            ValueError::Syntax { .. } => "syntax",
            ValueError::Range { .. } => "range",
            ValueError::Duration(_) => "duration",
            ValueError::Custom(_) => "custom",
        }
    }

    pub(crate) fn syntax(input: &str) -> Self {
        ValueError::Syntax {
            input: input.to_string(),
        }
    }

    pub(crate) fn range(input: &str) -> Self {
        ValueError::Range {
            input: input.to_string(),
        }
    }
}

/// Duration literal errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// Literal does not follow the `<number><unit>` grammar
    #[error("invalid duration {0:?}")]
    Invalid(String),

    /// A number was not followed by a unit
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    /// Unit is not one of `ns`, `us`, `µs`, `ms`, `s`, `m`, `h`
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unrecognized unit
        unit: String,
        /// The whole literal
        input: String,
    },

    /// Total does not fit in 64-bit nanoseconds
    #[error("invalid duration {0:?}: out of range")]
    Overflow(String),
}

impl From<std::io::Error> for EnvError {
    fn from(err: std::io::Error) -> Self {
        EnvError::Io(err.to_string())
    }
}

impl From<dotenvy::Error> for EnvError {
    fn from(err: dotenvy::Error) -> Self {
        match err {
            dotenvy::Error::Io(e) => EnvError::Dotenv(format!("cannot read file: {e}")),
            other => EnvError::Dotenv(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_value_display() {
        let err = EnvError::InvalidValue {
            name: "APP_PORT".to_string(),
            source: ValueError::syntax("abc"),
        };
        assert_eq!(
            err.to_string(),
            "cannot set value for APP_PORT: parse error: invalid syntax \"abc\""
        );
    }

    #[test]
    fn test_invalid_value_exposes_source() {
        let err = EnvError::InvalidValue {
            name: "APP_PORT".to_string(),
            source: ValueError::range("70000"),
        };
        let source = err.source().expect("source should be set");
        assert_eq!(source.to_string(), "value out of range: \"70000\"");
    }

    #[test]
    fn test_duration_error_is_transparent() {
        let err: ValueError = DurationError::MissingUnit("10".to_string()).into();
        assert_eq!(err.to_string(), "missing unit in duration \"10\"");
    }

    #[test]
    fn test_error_key() {
        assert_eq!(EnvError::Redefined("A".into()).key(), Some("A"));
        assert_eq!(EnvError::UnknownKey("B".into()).key(), Some("B"));
        assert_eq!(EnvError::Io("boom".into()).key(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: EnvError = io_err.into();
        assert!(matches!(err, EnvError::Io(_)));
    }

    #[test]
    fn test_value_error_kind() {
        assert_eq!(ValueError::syntax("s3cret").kind(), "syntax");
        assert_eq!(ValueError::range("s3cret").kind(), "range");
        assert_eq!(
            ValueError::from(DurationError::Invalid("x".into())).kind(),
            "duration"
        );
        assert_eq!(ValueError::Custom("x".into()).kind(), "custom");
    }

    #[test]
    fn test_custom_error_display() {
        let err = ValueError::Custom("bad color".into());
        assert_eq!(err.to_string(), "bad color");
    }

    #[test]
    fn test_env_error_implements_std_error() {
        let err = EnvError::UnknownKey("X".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
