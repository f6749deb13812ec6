//! Redaction marker for PII values
//!
//! Annotation keywords are personal data. Anything that reaches a log line
//! or a rendered summary goes through `Sensitive<T>` unless the caller
//! explicitly asked to see it.

use std::fmt;

/// Wrapper that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use annodiff_core_types::Sensitive;
///
/// let keyword = Sensitive::new("Jane Doe");
/// assert_eq!(format!("{}", keyword), "***REDACTED***");
/// assert_eq!(keyword.expose(), &"Jane Doe");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
