//! Secret value types with automatic memory zeroing
//!
//! - [`SecureSecret`]: a wrapper around `secrecy::SecretString` that zeroes on drop
//! - [`ResolvedLicenseKey`]: a resolved key together with the source that produced it

use crate::KeySource;
use secrecy::{ExposeSecret, SecretString};

/// A secret value with automatic memory zeroing on drop.
///
/// `Debug` and `Display` print `[REDACTED]`; the value is only reachable
/// through [`expose`](Self::expose).
#[derive(Clone)]
pub struct SecureSecret {
    inner: SecretString,
}

impl SecureSecret {
    /// Move a string into secure storage.
    #[must_use]
    pub fn new(value: String) -> Self {
        Self {
            inner: SecretString::from(value),
        }
    }

    /// Expose the secret value for use.
    ///
    /// Callers must not log or persist the returned value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.inner.expose_secret()
    }

    /// Length of the secret value without exposing it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    /// Check if the secret value is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.expose_secret().is_empty()
    }
}

impl std::fmt::Debug for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl std::fmt::Display for SecureSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// A license key returned by the resolver
#[derive(Debug, Clone)]
pub struct ResolvedLicenseKey {
    value: SecureSecret,
    source: KeySource,
}

impl ResolvedLicenseKey {
    /// Wrap a resolved value
    #[must_use]
    pub fn new(value: String, source: KeySource) -> Self {
        Self {
            value: SecureSecret::new(value),
            source,
        }
    }

    /// The license key
    #[must_use]
    pub fn expose(&self) -> &str {
        self.value.expose()
    }

    /// Which source produced the key
    #[must_use]
    pub const fn source(&self) -> KeySource {
        self.source
    }

    /// The key as a [`SecureSecret`]
    #[must_use]
    pub const fn secret(&self) -> &SecureSecret {
        &self.value
    }

    /// The key with everything but the last four characters masked.
    ///
    /// Keys of four characters or fewer are fully masked.
    #[must_use]
    pub fn redacted(&self) -> String {
        let key = self.value.expose();
        let count = key.chars().count();
        if count <= 4 {
            return "*".repeat(count);
        }
        let tail: String = key.chars().skip(count - 4).collect();
        format!("{}{tail}", "*".repeat(count - 4))
    }
}
