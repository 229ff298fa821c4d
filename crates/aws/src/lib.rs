//! AWS backends for licensekey
//!
//! - [`AwsSecretStore`]: AWS Secrets Manager `GetSecretValue`
//! - [`AwsParameterStore`]: SSM Parameter Store `GetParameter`
//!
//! [`load_resolver`] loads the shared AWS configuration once and wires both
//! clients into a [`LicenseKeyResolver`].

pub mod parameters;
pub mod secrets;

pub use parameters::AwsParameterStore;
pub use secrets::AwsSecretStore;

use aws_config::{BehaviorVersion, SdkConfig};
use licensekey_secrets::LicenseKeyResolver;
use std::sync::Arc;

/// Load AWS configuration from the environment (region, credentials chain,
/// shared config files) and build a resolver over Secrets Manager and SSM.
pub async fn load_resolver() -> LicenseKeyResolver {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    tracing::debug!(region = ?config.region(), "Loaded AWS configuration");
    resolver_from_config(&config)
}

/// Build a resolver from an already loaded AWS configuration
#[must_use]
pub fn resolver_from_config(config: &SdkConfig) -> LicenseKeyResolver {
    LicenseKeyResolver::new(
        Arc::new(AwsSecretStore::from_config(config)),
        Arc::new(AwsParameterStore::from_config(config)),
    )
}
