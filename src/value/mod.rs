//! Typed values
//!
//! A [`Value`] is anything that can render itself as text and parse text back
//! into the destination it is bound to. The registry stores every registered
//! value as a `Box<dyn Value + 'a>`, so custom types plug in through
//! [`EnvSet::var`](crate::EnvSet::var) without touching the registry.
//!
//! The built-in variants are [`Typed`] handles over the [`Scalar`] types
//! (`bool`, `isize`, `i64`, `usize`, `u64`, `f64`, [`chrono::Duration`] and
//! `String`) plus [`Func`], which forwards text to a caller-supplied closure.
//!
//! # Example
//!
//! ```rust
//! use envset::value::{Typed, Value};
//!
//! let mut retries = 0u64;
//! let mut value = Typed::new(&mut retries, 3);
//! assert_eq!(value.render(), "3");
//!
//! value.parse("5").unwrap();
//! assert!(value.parse("-1").is_err());
//! drop(value);
//! assert_eq!(retries, 5);
//! ```

mod duration;
mod number;

use crate::domain::errors::{BoxError, DurationError, ValueError};

/// Contract every registered value satisfies
pub trait Value {
    /// Canonical text form of the currently held value
    fn render(&self) -> String;

    /// Converts `text` and, on success, overwrites the destination
    ///
    /// Implementations must leave the destination untouched on failure.
    fn parse(&mut self, text: &str) -> Result<(), ValueError>;

    /// Text form of this variant's zero value
    ///
    /// Used to tell whether a registered default is worth showing.
    fn zero_text(&self) -> String {
        String::new()
    }
}

/// Primitive types that can be bound through [`Typed`]
pub trait Scalar: Sized {
    /// Converts text into the native type
    fn from_text(text: &str) -> Result<Self, ValueError>;

    /// Canonical text form; `from_text(render())` reproduces the value
    fn to_text(&self) -> String;

    /// The zero value used by [`Value::zero_text`]
    fn zero() -> Self;

    /// Rejects values that would not survive `from_text(to_text())`
    ///
    /// Checked on defaults before they are registered.
    fn check_round_trip(&self) -> Result<(), ValueError> {
        Ok(())
    }
}

impl Scalar for bool {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        const TRUTHY: [&str; 3] = ["1", "t", "true"];
        const FALSY: [&str; 3] = ["0", "f", "false"];

        if TRUTHY.iter().any(|t| text.eq_ignore_ascii_case(t)) {
            Ok(true)
        } else if FALSY.iter().any(|f| text.eq_ignore_ascii_case(f)) {
            Ok(false)
        } else {
            Err(ValueError::syntax(text))
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn zero() -> Self {
        false
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn from_text(text: &str) -> Result<Self, ValueError> {
                let wide = number::parse_signed(text)?;
                <$ty>::try_from(wide).map_err(|_| ValueError::range(text))
            }

            fn to_text(&self) -> String {
                self.to_string()
            }

            fn zero() -> Self {
                0
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn from_text(text: &str) -> Result<Self, ValueError> {
                let wide = number::parse_unsigned(text)?;
                <$ty>::try_from(wide).map_err(|_| ValueError::range(text))
            }

            fn to_text(&self) -> String {
                self.to_string()
            }

            fn zero() -> Self {
                0
            }
        }
    )*};
}

signed_scalar!(isize, i64);
unsigned_scalar!(usize, u64);

impl Scalar for f64 {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        number::parse_float(text)
    }

    fn check_round_trip(&self) -> Result<(), ValueError> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(ValueError::range(&self.to_string()))
        }
    }

    fn to_text(&self) -> String {
        self.to_string()
    }

    fn zero() -> Self {
        0.0
    }
}

impl Scalar for chrono::Duration {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        let nanos = duration::parse_nanos(text)?;
        Ok(chrono::Duration::nanoseconds(nanos))
    }

    fn check_round_trip(&self) -> Result<(), ValueError> {
        match self.num_nanoseconds() {
            Some(_) => Ok(()),
            None => Err(DurationError::Overflow(self.to_string()).into()),
        }
    }

    fn to_text(&self) -> String {
        // Clamped; EnvSet refuses defaults outside i64 nanoseconds.
        let nanos = self.num_nanoseconds().unwrap_or(if *self < chrono::Duration::zero() {
            i64::MIN
        } else {
            i64::MAX
        });
        duration::format_nanos(nanos)
    }

    fn zero() -> Self {
        chrono::Duration::zero()
    }
}

impl Scalar for String {
    fn from_text(text: &str) -> Result<Self, ValueError> {
        Ok(text.to_string())
    }

    fn to_text(&self) -> String {
        self.clone()
    }

    fn zero() -> Self {
        String::new()
    }
}

/// Handle binding a [`Scalar`] destination owned by the caller
#[derive(Debug)]
pub struct Typed<'a, T> {
    dest: &'a mut T,
}

impl<'a, T: Scalar> Typed<'a, T> {
    /// Binds `dest` and seeds it with `default`
    pub fn new(dest: &'a mut T, default: T) -> Self {
        *dest = default;
        Self { dest }
    }

    /// Current value of the destination
    pub fn get(&self) -> &T {
        self.dest
    }
}

impl<T: Scalar> Value for Typed<'_, T> {
    fn render(&self) -> String {
        self.dest.to_text()
    }

    fn parse(&mut self, text: &str) -> Result<(), ValueError> {
        *self.dest = T::from_text(text)?;
        Ok(())
    }

    fn zero_text(&self) -> String {
        T::zero().to_text()
    }
}

/// Value that forwards text to a caller-supplied closure
pub struct Func<F> {
    callback: F,
}

impl<F> Func<F>
where
    F: FnMut(&str) -> Result<(), BoxError>,
{
    /// Wraps `callback`; it receives the raw text of every matched entry
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Value for Func<F>
where
    F: FnMut(&str) -> Result<(), BoxError>,
{
    fn render(&self) -> String {
        String::new()
    }

    fn parse(&mut self, text: &str) -> Result<(), ValueError> {
        (self.callback)(text).map_err(ValueError::Custom)
    }
}

impl<F> std::fmt::Debug for Func<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Func").finish_non_exhaustive()
    }
}
