//! License key resolution chain

use crate::{
    Configuration, CredentialError, KeySource, LICENSE_KEY_ENV, ParameterStore,
    ResolvedLicenseKey, SecretStore, decode_license_key,
};
use crate::config::read_env;
use std::sync::Arc;

/// Resolves the license key from configuration, the secret store, the
/// parameter store and the environment, in that order.
///
/// The resolver keeps no state between calls. Each call tries every source at
/// most once and stops at the first one that yields a value. The two remote
/// stores are injected and can be swapped after construction.
///
/// # Example
///
/// ```ignore
/// let resolver = LicenseKeyResolver::new(
///     Arc::new(MemorySecretStore::new()),
///     Arc::new(MemoryParameterStore::new().with_parameter("NEW_RELIC_LICENSE_KEY", "abc")),
/// );
/// let key = resolver.resolve(&Configuration::new()).await?;
/// assert_eq!(key.source(), KeySource::ParameterStore);
/// ```
#[derive(Clone)]
pub struct LicenseKeyResolver {
    secret_store: Arc<dyn SecretStore>,
    parameter_store: Arc<dyn ParameterStore>,
}

impl std::fmt::Debug for LicenseKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseKeyResolver")
            .field("secret_store", &self.secret_store.provider_name())
            .field("parameter_store", &self.parameter_store.provider_name())
            .finish()
    }
}

impl LicenseKeyResolver {
    /// Create a resolver over the given stores
    #[must_use]
    pub fn new(
        secret_store: Arc<dyn SecretStore>,
        parameter_store: Arc<dyn ParameterStore>,
    ) -> Self {
        Self {
            secret_store,
            parameter_store,
        }
    }

    /// Replace the secret store, returning the updated resolver
    #[must_use]
    pub fn with_secret_store(mut self, secret_store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = secret_store;
        self
    }

    /// Replace the parameter store, returning the updated resolver
    #[must_use]
    pub fn with_parameter_store(mut self, parameter_store: Arc<dyn ParameterStore>) -> Self {
        self.parameter_store = parameter_store;
        self
    }

    /// Swap the secret store in place; later calls use the new store.
    pub fn override_secret_store(&mut self, secret_store: Arc<dyn SecretStore>) {
        tracing::debug!(
            provider = secret_store.provider_name(),
            "Overriding secret store"
        );
        self.secret_store = secret_store;
    }

    /// Swap the parameter store in place; later calls use the new store.
    pub fn override_parameter_store(&mut self, parameter_store: Arc<dyn ParameterStore>) {
        tracing::debug!(
            provider = parameter_store.provider_name(),
            "Overriding parameter store"
        );
        self.parameter_store = parameter_store;
    }

    /// Resolve the license key.
    ///
    /// Sources are tried in order and the first success wins:
    ///
    /// 1. a non-empty literal key in `config` (no remote calls)
    /// 2. the secret store entry at [`Configuration::secret_id`], which must
    ///    decode to a non-empty `LicenseKey` attribute
    /// 3. the parameter store entry with the same identifier, decrypted
    /// 4. the `NEW_RELIC_LICENSE_KEY` environment variable, if present
    ///
    /// # Errors
    /// When every source fails, returns the error from the secret store
    /// attempt, not the error of the last source tried.
    pub async fn resolve(
        &self,
        config: &Configuration,
    ) -> Result<ResolvedLicenseKey, CredentialError> {
        if let Some(license_key) = config.literal_license_key() {
            tracing::info!(
                source = %KeySource::Configuration,
                "Using license key from configuration"
            );
            return Ok(ResolvedLicenseKey::new(
                license_key.to_string(),
                KeySource::Configuration,
            ));
        }

        let secret_id = Self::secret_id(config);

        let secret_error = match self.lookup_secret_store(secret_id).await {
            Ok(license_key) => {
                return Ok(ResolvedLicenseKey::new(license_key, KeySource::SecretStore));
            }
            Err(e) => {
                tracing::debug!(
                    secret_id,
                    provider = self.secret_store.provider_name(),
                    error = %e,
                    "Secret store did not yield a license key"
                );
                e
            }
        };

        match self.parameter_store.get_parameter(secret_id, true).await {
            Ok(license_key) => {
                return Ok(ResolvedLicenseKey::new(
                    license_key,
                    KeySource::ParameterStore,
                ));
            }
            Err(e) => {
                tracing::debug!(
                    parameter = secret_id,
                    provider = self.parameter_store.provider_name(),
                    error = %e,
                    "Parameter store did not yield a license key"
                );
            }
        }

        if let Some(license_key) = Self::lookup_environment() {
            return Ok(ResolvedLicenseKey::new(license_key, KeySource::Environment));
        }
        tracing::debug!(
            var = LICENSE_KEY_ENV,
            "License key environment variable not set"
        );

        tracing::warn!(
            secret_id,
            error = %secret_error,
            "No license key source succeeded"
        );
        Err(secret_error)
    }

    /// Check whether the secret store has an entry at the configured identifier.
    ///
    /// Only the lookup outcome matters; the payload is not decoded.
    pub async fn is_secret_configured(&self, config: &Configuration) -> bool {
        let secret_id = Self::secret_id(config);
        match self.secret_store.get_secret_value(secret_id).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(secret_id, error = %e, "License key secret not configured");
                false
            }
        }
    }

    fn secret_id(config: &Configuration) -> &str {
        if let Some(secret_id) = config.configured_secret_id() {
            tracing::debug!(secret_id, "Fetching license key from configured secret id");
        }
        config.secret_id()
    }

    async fn lookup_secret_store(&self, secret_id: &str) -> Result<String, CredentialError> {
        let value = self.secret_store.get_secret_value(secret_id).await?;
        let raw = value
            .secret_string
            .ok_or_else(|| CredentialError::MalformedSecret {
                id: secret_id.to_string(),
                reason: "secret has no string value (may be binary)".to_string(),
            })?;
        decode_license_key(secret_id, &raw)
    }

    fn lookup_environment() -> Option<String> {
        read_env(LICENSE_KEY_ENV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_SECRET_ID, MemoryParameterStore, MemorySecretStore};

    fn resolver(
        secrets: MemorySecretStore,
        parameters: MemoryParameterStore,
    ) -> (
        LicenseKeyResolver,
        Arc<MemorySecretStore>,
        Arc<MemoryParameterStore>,
    ) {
        let secrets = Arc::new(secrets);
        let parameters = Arc::new(parameters);
        (
            LicenseKeyResolver::new(secrets.clone(), parameters.clone()),
            secrets,
            parameters,
        )
    }

    #[tokio::test]
    async fn test_literal_key_skips_remote_lookups() {
        let (resolver, secrets, parameters) = resolver(
            MemorySecretStore::new().with_secret(DEFAULT_SECRET_ID, r#"{"LicenseKey": "sm"}"#),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );
        let config = Configuration::new().with_license_key("literal");

        let key = resolver.resolve(&config).await.unwrap();

        assert_eq!(key.expose(), "literal");
        assert_eq!(key.source(), KeySource::Configuration);
        assert_eq!(secrets.calls(), 0);
        assert_eq!(parameters.calls(), 0);
    }

    #[tokio::test]
    async fn test_secret_store_wins_over_parameter_store() {
        let (resolver, _, parameters) = resolver(
            MemorySecretStore::new().with_secret(DEFAULT_SECRET_ID, r#"{"LicenseKey": "sm"}"#),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );

        let key = resolver.resolve(&Configuration::new()).await.unwrap();

        assert_eq!(key.expose(), "sm");
        assert_eq!(key.source(), KeySource::SecretStore);
        assert_eq!(parameters.calls(), 0);
    }

    #[tokio::test]
    async fn test_parameter_store_requests_decryption() {
        let (resolver, _, parameters) = resolver(
            MemorySecretStore::new(),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );

        let key = resolver.resolve(&Configuration::new()).await.unwrap();

        assert_eq!(key.expose(), "ssm");
        assert_eq!(parameters.decrypted_calls(), 1);
    }

    #[tokio::test]
    async fn test_binary_secret_falls_through() {
        let (resolver, _, _) = resolver(
            MemorySecretStore::new().with_binary_secret(DEFAULT_SECRET_ID),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );

        let key = resolver.resolve(&Configuration::new()).await.unwrap();
        assert_eq!(key.source(), KeySource::ParameterStore);
    }

    #[tokio::test]
    async fn test_override_secret_store() {
        let (mut resolver, old, _) = resolver(
            MemorySecretStore::new(),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );
        let replacement = Arc::new(
            MemorySecretStore::new().with_secret(DEFAULT_SECRET_ID, r#"{"LicenseKey": "new"}"#),
        );
        resolver.override_secret_store(replacement.clone());

        let key = resolver.resolve(&Configuration::new()).await.unwrap();

        assert_eq!(key.expose(), "new");
        assert_eq!(old.calls(), 0);
        assert_eq!(replacement.calls(), 1);
    }

    #[tokio::test]
    async fn test_override_parameter_store() {
        let (mut resolver, _, _) = resolver(MemorySecretStore::new(), MemoryParameterStore::new());
        resolver.override_parameter_store(Arc::new(
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "swapped"),
        ));

        let key = resolver.resolve(&Configuration::new()).await.unwrap();
        assert_eq!(key.expose(), "swapped");
    }

    #[tokio::test]
    async fn test_is_secret_configured_ignores_contents() {
        let (resolver, _, _) = resolver(
            MemorySecretStore::new().with_secret(DEFAULT_SECRET_ID, "not json"),
            MemoryParameterStore::new(),
        );
        assert!(resolver.is_secret_configured(&Configuration::new()).await);
    }

    #[tokio::test]
    async fn test_is_secret_configured_false_on_failure() {
        let (resolver, _, parameters) = resolver(
            MemorySecretStore::new().with_failure(DEFAULT_SECRET_ID, "AccessDeniedException"),
            MemoryParameterStore::new().with_parameter(DEFAULT_SECRET_ID, "ssm"),
        );
        assert!(!resolver.is_secret_configured(&Configuration::new()).await);
        assert_eq!(parameters.calls(), 0);
    }

    #[tokio::test]
    async fn test_is_secret_configured_uses_configured_id() {
        let (resolver, _, _) = resolver(
            MemorySecretStore::new().with_secret("custom", "{}"),
            MemoryParameterStore::new(),
        );
        assert!(
            resolver
                .is_secret_configured(&Configuration::new().with_secret_id("custom"))
                .await
        );
        assert!(!resolver.is_secret_configured(&Configuration::new()).await);
    }

    #[test]
    fn test_debug_shows_providers() {
        let (resolver, _, _) = resolver(MemorySecretStore::new(), MemoryParameterStore::new());
        let debug = format!("{resolver:?}");
        assert!(debug.contains("LicenseKeyResolver"));
        assert!(debug.contains("memory"));
    }
}
