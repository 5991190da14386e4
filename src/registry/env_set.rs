//! The environment set: registration and the parse pass
//!
//! Names are normalized when they are registered (`PREFIX_NAME`, uppercased)
//! but incoming keys are matched verbatim. Entries such as
//! `PFX_TIMEOUT=10m` therefore match a `TIMEOUT` registered under prefix
//! `pfx`, while a bare `TIMEOUT=...` or a lowercase `pfx_timeout=...` does not.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use super::entry::Entry;
use crate::domain::errors::{BoxError, EnvError};
use crate::domain::result::Result;
use crate::value::{Func, Scalar, Typed, Value};

/// A set of typed environment variables sharing one prefix
///
/// Destinations are borrowed mutably for the lifetime of the set; drop the set
/// (or let it go out of scope) to read them again.
///
/// # Examples
///
/// ```rust
/// use chrono::Duration;
/// use envset::EnvSet;
///
/// # fn example() -> envset::Result<()> {
/// let mut timeout = Duration::zero();
/// let mut verbose = false;
///
/// let mut set = EnvSet::new("app");
/// set.duration(&mut timeout, "timeout", Duration::seconds(10), "request timeout")?;
/// set.bool(&mut verbose, "verbose", false, "chatty output")?;
///
/// set.parse(["APP_TIMEOUT=20s", "APP_VERBOSE=true", "HOME=/root"])?;
/// assert!(set.is_parsed());
/// drop(set);
///
/// assert_eq!(timeout, Duration::seconds(20));
/// assert!(verbose);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct EnvSet<'a> {
    prefix: String,
    parsed: bool,
    entries: BTreeMap<String, Entry<'a>>,
    actual: BTreeSet<String>,
}

impl<'a> EnvSet<'a> {
    /// Creates an empty set; the prefix is uppercased, and an empty prefix means none
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: prefix.as_ref().to_uppercase(),
            parsed: false,
            entries: BTreeMap::new(),
            actual: BTreeSet::new(),
        }
    }

    /// The uppercased prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key a value registered as `name` is looked up under
    pub fn key_for(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Registers a boolean
    pub fn bool(
        &mut self,
        dest: &'a mut bool,
        name: &str,
        default: bool,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a word-sized signed integer
    pub fn int(
        &mut self,
        dest: &'a mut isize,
        name: &str,
        default: isize,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a 64-bit signed integer
    pub fn int64(
        &mut self,
        dest: &'a mut i64,
        name: &str,
        default: i64,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a word-sized unsigned integer
    pub fn uint(
        &mut self,
        dest: &'a mut usize,
        name: &str,
        default: usize,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a 64-bit unsigned integer
    pub fn uint64(
        &mut self,
        dest: &'a mut u64,
        name: &str,
        default: u64,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a finite 64-bit float
    ///
    /// A NaN or infinite default is rejected with [`EnvError::InvalidValue`].
    pub fn float64(
        &mut self,
        dest: &'a mut f64,
        name: &str,
        default: f64,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a duration written as e.g. `1h30m` or `250ms`
    ///
    /// The default must fit in 64-bit nanoseconds (about 292 years), otherwise
    /// registration fails with [`EnvError::InvalidValue`].
    pub fn duration(
        &mut self,
        dest: &'a mut chrono::Duration,
        name: &str,
        default: chrono::Duration,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default, usage)
    }

    /// Registers a string; every text is accepted verbatim
    pub fn string(
        &mut self,
        dest: &'a mut String,
        name: &str,
        default: impl Into<String>,
        usage: &str,
    ) -> Result<()> {
        self.scalar(dest, name, default.into(), usage)
    }

    /// Registers a callback that receives the raw text of the matched entry
    ///
    /// An error returned by the callback aborts the parse pass like any other
    /// conversion failure.
    pub fn func<F>(&mut self, name: &str, usage: &str, callback: F) -> Result<()>
    where
        F: FnMut(&str) -> std::result::Result<(), BoxError> + 'a,
    {
        self.var(Func::new(callback), name, usage)
    }

    /// Registers any [`Value`] implementation
    pub fn var(&mut self, value: impl Value + 'a, name: &str, usage: &str) -> Result<()> {
        let key = self.key_for(name);
        self.ensure_vacant(&key)?;
        self.insert(key, usage, Box::new(value));
        Ok(())
    }

    fn scalar<T: Scalar + 'a>(
        &mut self,
        dest: &'a mut T,
        name: &str,
        default: T,
        usage: &str,
    ) -> Result<()> {
        let key = self.key_for(name);
        // Checked first so a rejected registration does not seed the destination.
        self.ensure_vacant(&key)?;
        default
            .check_round_trip()
            .map_err(|source| EnvError::InvalidValue {
                name: key.clone(),
                source,
            })?;
        self.insert(key, usage, Box::new(Typed::new(dest, default)));
        Ok(())
    }

    fn ensure_vacant(&self, key: &str) -> Result<()> {
        if self.entries.contains_key(key) {
            warn!(key, "Environment variable registered twice");
            return Err(EnvError::Redefined(key.to_string()));
        }
        Ok(())
    }

    fn insert(&mut self, key: String, usage: &str, value: Box<dyn Value + 'a>) {
        let entry = Entry::new(key.clone(), usage.to_string(), value);
        debug!(key = %key, "Registered environment variable");
        self.entries.insert(key, entry);
    }

    /// Applies `KEY=VALUE` entries in order
    ///
    /// Entries without `=` and keys that are not registered are skipped. The
    /// first value that fails to convert aborts the pass; entries applied
    /// before it stay applied. The set counts as parsed even when this fails.
    pub fn parse<I, S>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.parsed = true;

        let mut applied = 0usize;
        let mut unknown = 0usize;
        let mut malformed = 0usize;

        for raw in entries {
            let Some((key, text)) = raw.as_ref().split_once('=') else {
                trace!("Skipping environment entry without '='");
                malformed += 1;
                continue;
            };

            let Some(entry) = self.entries.get_mut(key) else {
                trace!(key, "Skipping unregistered environment variable");
                unknown += 1;
                continue;
            };

            if let Err(source) = entry.value.parse(text) {
                warn!(key, kind = source.kind(), "Invalid environment variable value");
                return Err(EnvError::InvalidValue {
                    name: key.to_string(),
                    source,
                });
            }
            self.actual.insert(key.to_string());
            applied += 1;
        }

        debug!(
            prefix = %self.prefix,
            applied,
            unknown,
            malformed,
            "Parsed environment entries"
        );
        Ok(())
    }

    /// Whether a parse pass has been attempted, successful or not
    pub fn is_parsed(&self) -> bool {
        self.parsed
    }

    /// Sets one registered key from text
    ///
    /// Unlike [`EnvSet::parse`], an unknown key is an error here.
    pub fn set(&mut self, key: &str, text: &str) -> Result<()> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| EnvError::UnknownKey(key.to_string()))?;
        entry
            .value
            .parse(text)
            .map_err(|source| EnvError::InvalidValue {
                name: key.to_string(),
                source,
            })?;
        self.actual.insert(key.to_string());
        Ok(())
    }

    /// Entry registered under the exact (normalized) key
    pub fn lookup(&self, key: &str) -> Option<&Entry<'a>> {
        self.entries.get(key)
    }

    /// Calls `f` for every entry in lexicographic key order
    pub fn visit_all(&self, mut f: impl FnMut(&Entry<'a>)) {
        for entry in self.entries.values() {
            f(entry);
        }
    }

    /// Calls `f` for every entry that has been set, in lexicographic key order
    pub fn visit(&self, mut f: impl FnMut(&Entry<'a>)) {
        for entry in self.actual.iter().filter_map(|key| self.entries.get(key)) {
            f(entry);
        }
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for EnvSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSet")
            .field("prefix", &self.prefix)
            .field("parsed", &self.parsed)
            .field("entries", &self.entries.values().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{DurationError, ValueError};
    use chrono::Duration;

    #[test]
    fn test_key_for_with_prefix() {
        let set = EnvSet::new("envx");
        assert_eq!(set.prefix(), "ENVX");
        assert_eq!(set.key_for("timeout"), "ENVX_TIMEOUT");
        assert_eq!(set.key_for("Max_Conns"), "ENVX_MAX_CONNS");
    }

    #[test]
    fn test_key_for_without_prefix() {
        let set = EnvSet::new("");
        assert_eq!(set.key_for("timeout"), "TIMEOUT");
    }

    #[test]
    fn test_prefixed_key_matches_exactly() {
        let mut timeout = Duration::zero();
        let mut set = EnvSet::new("ENVX");
        set.duration(&mut timeout, "TIMEOUT", Duration::seconds(5), "just a timeout")
            .unwrap();

        set.parse(["ENVX_TIMEOUT=10m", "TIMEOUT=12345"]).unwrap();
        assert!(set.is_parsed());
        drop(set);
        assert_eq!(timeout, Duration::minutes(10));
    }

    #[test]
    fn test_input_keys_are_not_normalized() {
        let mut count = 0i64;
        let mut set = EnvSet::new("pfx");
        set.int64(&mut count, "count", 1, "").unwrap();

        set.parse(["pfx_count=5", "PFX_count=6", "COUNT=7"]).unwrap();
        drop(set);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_registration_seeds_destination() {
        let mut workers = 0usize;
        let mut set = EnvSet::new("");
        set.uint(&mut workers, "workers", 8, "worker threads").unwrap();
        assert_eq!(set.lookup("WORKERS").unwrap().default_text(), "8");
        drop(set);
        assert_eq!(workers, 8);
    }

    #[test]
    fn test_out_of_range_duration_default_is_rejected() {
        let mut timeout = Duration::seconds(1);
        let mut set = EnvSet::new("p");
        let err = set
            .duration(&mut timeout, "t", Duration::days(200_000), "")
            .unwrap_err();
        assert!(matches!(
            err,
            EnvError::InvalidValue {
                ref name,
                source: ValueError::Duration(DurationError::Overflow(_)),
            } if name == "P_T"
        ));
        assert!(set.lookup("P_T").is_none());
        drop(set);
        assert_eq!(timeout, Duration::seconds(1));
    }

    #[test]
    fn test_largest_duration_default_round_trips() {
        let default = Duration::nanoseconds(i64::MAX);
        let mut timeout = Duration::zero();
        let mut set = EnvSet::new("p");
        set.duration(&mut timeout, "t", default, "").unwrap();

        let text = set.lookup("P_T").unwrap().default_text().to_string();
        set.parse([format!("P_T={text}")]).unwrap();
        drop(set);
        assert_eq!(timeout, default);
    }

    #[test]
    fn test_non_finite_float_default_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut ratio = 0.5f64;
            let mut set = EnvSet::new("p");
            assert!(matches!(
                set.float64(&mut ratio, "ratio", bad, ""),
                Err(EnvError::InvalidValue {
                    source: ValueError::Range { .. },
                    ..
                })
            ));
            assert!(set.is_empty());
            drop(set);
            assert_eq!(ratio, 0.5);
        }
    }

    #[test]
    fn test_redefinition_is_rejected() {
        let mut first = 0i64;
        let mut second = 99i64;
        let mut set = EnvSet::new("app");
        set.int64(&mut first, "port", 80, "").unwrap();

        let err = set.int64(&mut second, "PORT", 443, "").unwrap_err();
        assert!(matches!(err, EnvError::Redefined(ref key) if key == "APP_PORT"));
        assert_eq!(set.len(), 1);
        drop(set);
        assert_eq!(first, 80);
        assert_eq!(second, 99);
    }

    #[test]
    fn test_invalid_value_keeps_default() {
        let mut count = 0i64;
        let mut set = EnvSet::new("PFX");
        set.int64(&mut count, "count", 3, "").unwrap();

        let err = set.parse(["PFX_COUNT=abc"]).unwrap_err();
        match err {
            EnvError::InvalidValue { name, source } => {
                assert_eq!(name, "PFX_COUNT");
                assert!(matches!(source, ValueError::Syntax { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(set.is_parsed());
        drop(set);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_abort_keeps_earlier_entries() {
        let mut a = 0i64;
        let mut b = 0i64;
        let mut c = 0i64;
        let mut set = EnvSet::new("");
        set.int64(&mut a, "a", 0, "").unwrap();
        set.int64(&mut b, "b", 0, "").unwrap();
        set.int64(&mut c, "c", 0, "").unwrap();

        let result = set.parse(["A=1", "B=oops", "C=3"]);
        assert!(result.is_err());
        drop(set);
        assert_eq!((a, b, c), (1, 0, 0));
    }

    #[test]
    fn test_skips_malformed_and_unknown() {
        let mut name = String::new();
        let mut set = EnvSet::new("svc");
        set.string(&mut name, "name", "default", "").unwrap();

        set.parse(["SVC_NAME", "OTHER=1", "=", "SVC_NAME"]).unwrap();
        assert_eq!(set.lookup("SVC_NAME").unwrap().current_text(), "default");
        drop(set);
        assert_eq!(name, "default");
    }

    #[test]
    fn test_splits_at_first_equals() {
        let mut dsn = String::new();
        let mut set = EnvSet::new("db");
        set.string(&mut dsn, "dsn", "", "").unwrap();

        set.parse(["DB_DSN=host=localhost user=app"]).unwrap();
        drop(set);
        assert_eq!(dsn, "host=localhost user=app");
    }

    #[test]
    fn test_last_duplicate_wins() {
        let mut level = String::new();
        let mut set = EnvSet::new("");
        set.string(&mut level, "level", "info", "").unwrap();

        set.parse(["LEVEL=debug", "LEVEL=warn"]).unwrap();
        drop(set);
        assert_eq!(level, "warn");
    }

    #[test]
    fn test_set_and_visit() {
        let mut a = false;
        let mut b = 0.0f64;
        let mut set = EnvSet::new("x");
        set.float64(&mut b, "b", 1.5, "").unwrap();
        set.bool(&mut a, "a", false, "").unwrap();

        set.set("X_B", "2.25").unwrap();
        assert!(!set.is_parsed());
        assert!(matches!(
            set.set("X_C", "1"),
            Err(EnvError::UnknownKey(ref key)) if key == "X_C"
        ));
        assert!(matches!(
            set.set("X_A", "maybe"),
            Err(EnvError::InvalidValue { .. })
        ));

        let mut all = Vec::new();
        set.visit_all(|entry| all.push(entry.name().to_string()));
        assert_eq!(all, vec!["X_A", "X_B"]);

        let mut touched = Vec::new();
        set.visit(|entry| touched.push((entry.name().to_string(), entry.current_text())));
        assert_eq!(touched, vec![("X_B".to_string(), "2.25".to_string())]);
    }

    #[test]
    fn test_func_error_is_wrapped() {
        let mut set = EnvSet::new("app");
        set.func("mode", "run mode", |text| match text {
            "fast" | "slow" => Ok(()),
            other => Err(format!("unknown mode {other:?}").into()),
        })
        .unwrap();

        set.parse(["APP_MODE=fast"]).unwrap();
        let err = set.parse(["APP_MODE=warp"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot set value for APP_MODE: unknown mode \"warp\""
        );
    }

    #[test]
    fn test_debug_lists_entries() {
        let mut flag = false;
        let mut set = EnvSet::new("dbg");
        set.bool(&mut flag, "on", true, "").unwrap();
        let text = format!("{set:?}");
        assert!(text.contains("DBG_ON"));
        assert!(!set.is_empty());
    }
}
