//! Entry sources
//!
//! Convenience passes that feed an [`EnvSet`] from the process environment or
//! from a dotenv file. Both end up in [`EnvSet::parse`], so the matching rules
//! are the same as for a hand-built entry list.

use std::path::Path;

use tracing::debug;

use super::env_set::EnvSet;
use crate::domain::result::Result;

impl EnvSet<'_> {
    /// Parses the current process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn parse_process_env(&mut self) -> Result<()> {
        let entries: Vec<String> = std::env::vars_os()
            .filter_map(|(key, value)| {
                let key = key.into_string().ok()?;
                let value = value.into_string().ok()?;
                Some(format!("{key}={value}"))
            })
            .collect();
        debug!(count = entries.len(), "Read process environment");
        self.parse(entries)
    }

    /// Parses `KEY=VALUE` lines from a dotenv file
    ///
    /// The whole file is read before any value is applied, so a malformed line
    /// leaves every destination untouched. `${VAR}` references are expanded by
    /// the dotenv reader.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::Dotenv`](crate::EnvError::Dotenv) if the file cannot
    /// be read or contains an invalid line, and
    /// [`EnvError::InvalidValue`](crate::EnvError::InvalidValue) if a value is
    /// rejected.
    pub fn parse_dotenv(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path)?
            .map(|item| item.map(|(key, value)| format!("{key}={value}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(path = %path.display(), count = entries.len(), "Read dotenv file");
        self.parse(entries)
    }
}
