//! AWS Secrets Manager secret store

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use licensekey_secrets::{CredentialError, KeySource, SecretStore, SecretValue};

/// [`SecretStore`] backed by AWS Secrets Manager.
///
/// Each lookup is a single `GetSecretValue` call for the current version of
/// the secret. Retries and timeouts are whatever the SDK client is configured
/// with.
#[derive(Clone)]
pub struct AwsSecretStore {
    client: Client,
}

impl std::fmt::Debug for AwsSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretStore")
            .field("region", &self.client.config().region())
            .finish()
    }
}

impl AwsSecretStore {
    /// Wrap an existing Secrets Manager client
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a client from shared AWS configuration
    #[must_use]
    pub fn from_config(config: &SdkConfig) -> Self {
        Self::new(Client::new(config))
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue, CredentialError> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|e| {
                CredentialError::unavailable(
                    KeySource::SecretStore,
                    secret_id,
                    format!("AWS Secrets Manager error: {}", DisplayErrorContext(&e)),
                )
            })?;

        Ok(SecretValue {
            secret_string: response.secret_string().map(str::to_string),
        })
    }

    fn provider_name(&self) -> &'static str {
        "aws-secrets-manager"
    }
}
