//! In-memory secret and parameter stores
//!
//! Fixed contents set up at construction, plus per-identifier scripted
//! failures and call counters. Used for tests and local runs where no AWS
//! account is reachable.

use crate::{CredentialError, KeySource, ParameterStore, SecretStore, SecretValue};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-memory [`SecretStore`].
///
/// Unknown identifiers fail with [`CredentialError::NotFound`].
///
/// ```ignore
/// let store = MemorySecretStore::new()
///     .with_secret("NEW_RELIC_LICENSE_KEY", r#"{"LicenseKey": "abc123"}"#)
///     .with_failure("locked", "AccessDeniedException");
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    secrets: HashMap<String, SecretValue>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MemorySecretStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret with a string payload
    #[must_use]
    pub fn with_secret(mut self, id: impl Into<String>, secret_string: impl Into<String>) -> Self {
        self.secrets
            .insert(id.into(), SecretValue::new(secret_string));
        self
    }

    /// Add a secret that has no string payload
    #[must_use]
    pub fn with_binary_secret(mut self, id: impl Into<String>) -> Self {
        self.secrets.insert(id.into(), SecretValue::binary());
        self
    }

    /// Make lookups of `id` fail with [`CredentialError::SourceUnavailable`]
    #[must_use]
    pub fn with_failure(mut self, id: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(id.into(), message.into());
        self
    }

    /// Number of `get_secret_value` calls served so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failures.get(secret_id) {
            return Err(CredentialError::unavailable(
                KeySource::SecretStore,
                secret_id,
                message,
            ));
        }

        self.secrets
            .get(secret_id)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound {
                key_source: KeySource::SecretStore,
                id: secret_id.to_string(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

/// In-memory [`ParameterStore`].
///
/// Values are returned as stored regardless of the decryption flag; calls
/// that asked for decryption are counted separately.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    parameters: HashMap<String, String>,
    failures: HashMap<String, String>,
    calls: AtomicUsize,
    decrypted_calls: AtomicUsize,
}

impl MemoryParameterStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Make lookups of `name` fail with [`CredentialError::SourceUnavailable`]
    #[must_use]
    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(name.into(), message.into());
        self
    }

    /// Number of `get_parameter` calls served so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of calls that asked for decryption
    #[must_use]
    pub fn decrypted_calls(&self) -> usize {
        self.decrypted_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParameterStore for MemoryParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<String, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if with_decryption {
            self.decrypted_calls.fetch_add(1, Ordering::SeqCst);
        }

        if let Some(message) = self.failures.get(name) {
            return Err(CredentialError::unavailable(
                KeySource::ParameterStore,
                name,
                message,
            ));
        }

        self.parameters
            .get(name)
            .cloned()
            .ok_or_else(|| CredentialError::NotFound {
                key_source: KeySource::ParameterStore,
                id: name.to_string(),
            })
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_secret_store_lookup() {
        let store = MemorySecretStore::new().with_secret("id", r#"{"LicenseKey": "k"}"#);
        let value = store.get_secret_value("id").await.unwrap();
        assert_eq!(value.secret_string.as_deref(), Some(r#"{"LicenseKey": "k"}"#));
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_secret_store_missing() {
        let store = MemorySecretStore::new();
        let err = store.get_secret_value("nope").await.unwrap_err();
        assert!(matches!(
            err,
            CredentialError::NotFound {
                key_source: KeySource::SecretStore,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_secret_store_scripted_failure() {
        let store = MemorySecretStore::new()
            .with_secret("id", "{}")
            .with_failure("id", "AccessDeniedException");
        let err = store.get_secret_value("id").await.unwrap_err();
        assert!(err.to_string().contains("AccessDeniedException"));
    }

    #[tokio::test]
    async fn test_secret_store_binary() {
        let store = MemorySecretStore::new().with_binary_secret("bin");
        let value = store.get_secret_value("bin").await.unwrap();
        assert!(value.secret_string.is_none());
    }

    #[tokio::test]
    async fn test_parameter_store_lookup() {
        let store = MemoryParameterStore::new().with_parameter("name", "value");
        assert_eq!(store.get_parameter("name", true).await.unwrap(), "value");
        assert_eq!(store.get_parameter("name", false).await.unwrap(), "value");
        assert_eq!(store.calls(), 2);
        assert_eq!(store.decrypted_calls(), 1);
    }

    #[tokio::test]
    async fn test_parameter_store_failure() {
        let store = MemoryParameterStore::new().with_failure("name", "ThrottlingException");
        let err = store.get_parameter("name", true).await.unwrap_err();
        assert!(matches!(
            err,
            CredentialError::SourceUnavailable {
                key_source: KeySource::ParameterStore,
                ..
            }
        ));
    }
}
