use std::fmt;

use serde::{Deserialize, Deserializer};

/// A configuration value that must never show up in output.
///
/// The blog's session signing key lives in one of these. `Debug` and
/// `Display` both print `[REDACTED]`, so the whole [`Config`](crate::Config)
/// can be logged at startup without leaking it.
///
/// ```
/// use blog_policy::Secret;
///
/// let signing_key = Secret::new("hush-hush".to_string());
///
/// assert_eq!(format!("{:?}", signing_key), "[REDACTED]");
/// assert_eq!(format!("{}", signing_key), "[REDACTED]");
///
/// // Reading it takes a deliberate call
/// assert_eq!(signing_key.expose_secret(), "hush-hush");
/// ```
///
/// No `Clone`, `Deref` or `AsRef`; there is exactly one way in:
///
/// ```compile_fail
/// use blog_policy::Secret;
///
/// let key = Secret::new("hush".to_string());
/// let copy = key.clone();
/// ```
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    /// Wraps a sensitive value.
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Borrows the wrapped value. Keep the result out of logs.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Secret<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Secret::new)
    }
}
