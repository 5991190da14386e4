//! Registry of named, typed environment variables
//!
//! [`EnvSet`] owns the mapping from normalized names to [`Entry`] values and
//! runs the parse pass. The [`loader`] module adds passes over the process
//! environment and dotenv files.

pub mod entry;
pub mod env_set;
pub mod loader;

pub use entry::Entry;
pub use env_set::EnvSet;
