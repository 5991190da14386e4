//! Result type alias for envset

use super::errors::EnvError;

/// Result type alias for envset operations
///
/// # Examples
///
/// ```
/// use envset::domain::result::Result;
/// use envset::domain::errors::EnvError;
///
/// fn failing_function() -> Result<()> {
///     Err(EnvError::UnknownKey("APP_PORT".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, EnvError>;
