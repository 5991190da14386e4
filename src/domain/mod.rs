//! Error and result types shared across envset.
//!
//! All fallible operations return [`Result<T>`], an alias over [`EnvError`]:
//!
//! ```rust
//! use envset::domain::{EnvError, Result};
//!
//! fn port(set: &mut envset::EnvSet<'_>) -> Result<()> {
//!     set.parse(["APP_PORT=8080"])?;
//!     Ok(())
//! }
//! # let mut set = envset::EnvSet::new("app");
//! # port(&mut set).unwrap();
//! # let _: Option<EnvError> = None;
//! ```

pub mod errors;
pub mod result;

pub use errors::{BoxError, DurationError, EnvError, ValueError};
pub use result::Result;
