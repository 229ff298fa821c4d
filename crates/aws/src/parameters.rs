//! AWS SSM Parameter Store

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::Client;
use aws_sdk_ssm::error::DisplayErrorContext;
use licensekey_secrets::{CredentialError, KeySource, ParameterStore};

/// [`ParameterStore`] backed by AWS Systems Manager Parameter Store
#[derive(Clone)]
pub struct AwsParameterStore {
    client: Client,
}

impl std::fmt::Debug for AwsParameterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsParameterStore")
            .field("region", &self.client.config().region())
            .finish()
    }
}

impl AwsParameterStore {
    /// Wrap an existing SSM client
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
impl ParameterStore for AwsParameterStore {
    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<String, CredentialError> {
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|e| {
                CredentialError::unavailable(
                    KeySource::ParameterStore,
                    name,
                    format!("AWS SSM error: {}", DisplayErrorContext(&e)),
                )
            })?;

        response
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| {
                CredentialError::unavailable(
                    KeySource::ParameterStore,
                    name,
                    "parameter has no value",
                )
            })
    }

    fn provider_name(&self) -> &'static str {
        "aws-ssm"
    }
}
