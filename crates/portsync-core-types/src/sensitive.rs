//! Redacting wrapper for credentials
//!
//! OpenStack passwords and Keystone tokens travel through configuration and
//! provider structs that derive `Debug`. Wrapping them in `Sensitive<T>` keeps
//! them out of logs and error messages.

use std::fmt;

/// Wrapper that prints `***REDACTED***` for both `Debug` and `Display`
///
/// # Example
///
/// ```
/// use portsync_core_types::Sensitive;
///
/// let token = Sensitive::new("gAAAAABk-token".to_string());
/// assert_eq!(format!("{:?}", token), "***REDACTED***");
/// assert_eq!(token.expose(), "gAAAAABk-token");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Only call this at the point where it is sent.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}
