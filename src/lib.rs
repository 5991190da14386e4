// envset - typed environment-variable configuration
// Copyright (c) 2026 Envset Contributors
// Licensed under the MIT License

//! # envset - typed environment-variable configuration
//!
//! envset lets a program declare named configuration values, bind each one to
//! a variable it owns, and fill all of them in one pass from a list of
//! `KEY=VALUE` entries such as the process environment.
//!
//! ## Overview
//!
//! - [`value`] - the [`Value`] contract and the built-in typed handles
//!   (bool, signed/unsigned integers, `f64`, durations, strings, callbacks)
//! - [`registry`] - [`EnvSet`], which registers values under prefixed,
//!   uppercased names and runs the parse pass
//! - [`domain`] - error types and the crate [`Result`] alias
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::Duration;
//! use envset::EnvSet;
//!
//! # fn main() -> envset::Result<()> {
//! let envs = ["ENVX_TIMEOUT=20s"]; // or use EnvSet::parse_process_env
//!
//! let mut timeout = Duration::zero();
//! let mut set = EnvSet::new("ENVX");
//! set.duration(&mut timeout, "TIMEOUT", Duration::seconds(10), "just a timeout")?;
//! set.parse(envs)?;
//! drop(set);
//!
//! assert_eq!(timeout, Duration::seconds(20));
//! # Ok(())
//! # }
//! ```
//!
//! ## Matching rules
//!
//! Registered names become `PREFIX_NAME` in upper case (just `NAME` when the
//! prefix is empty). Incoming keys are compared verbatim, so entries must
//! already follow that convention. Unknown keys and entries without `=` are
//! ignored; the first value that fails to convert aborts the pass with an
//! [`EnvError::InvalidValue`] naming the key.
//!
//! ## Custom types
//!
//! Anything implementing [`Value`] can be registered with [`EnvSet::var`]:
//!
//! ```rust
//! use envset::{EnvSet, Value, ValueError};
//!
//! struct Level<'a>(&'a mut u8);
//!
//! impl Value for Level<'_> {
//!     fn render(&self) -> String {
//!         self.0.to_string()
//!     }
//!
//!     fn parse(&mut self, text: &str) -> Result<(), ValueError> {
//!         match text {
//!             "low" => *self.0 = 1,
//!             "high" => *self.0 = 9,
//!             _ => return Err(ValueError::Custom(format!("bad level {text:?}").into())),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let mut level = 5;
//! let mut set = EnvSet::new("");
//! set.var(Level(&mut level), "level", "compression level").unwrap();
//! set.parse(["LEVEL=high"]).unwrap();
//! drop(set);
//! assert_eq!(level, 9);
//! ```
//!
//! ## Logging
//!
//! envset emits `tracing` events: registrations and pass summaries at
//! `debug`, skipped entries at `trace`, and rejected values at `warn`. Only
//! keys are logged, never values.

pub mod domain;
pub mod registry;
pub mod value;

pub use domain::{BoxError, DurationError, EnvError, Result, ValueError};
pub use registry::{Entry, EnvSet};
pub use value::{Func, Scalar, Typed, Value};
