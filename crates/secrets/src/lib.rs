//! License key resolution for serverless monitoring agents
//!
//! The agent needs exactly one secret, the vendor license key. It can live in
//! several places and [`LicenseKeyResolver`] tries them in a fixed order,
//! stopping at the first one that yields a value:
//!
//! 1. a literal key in [`Configuration`]
//! 2. a JSON secret in the secret store (AWS Secrets Manager)
//! 3. an encrypted parameter in the parameter store (AWS SSM)
//! 4. the `NEW_RELIC_LICENSE_KEY` environment variable
//!
//! ```ignore
//! use licensekey_secrets::{Configuration, LicenseKeyResolver};
//!
//! let resolver = LicenseKeyResolver::new(secret_store, parameter_store);
//! let key = resolver.resolve(&Configuration::from_env()).await?;
//! tracing::info!(source = %key.source(), "License key resolved");
//! ```
//!
//! The remote stores are injected as trait objects. AWS-backed
//! implementations live in the `licensekey-aws` crate; in-memory ones for
//! tests are in [`memory`].

mod config;
pub mod memory;
mod record;
mod resolver;
mod types;

pub use config::{Configuration, DEFAULT_SECRET_ID, LICENSE_KEY_ENV, LICENSE_KEY_SECRET_ENV};
pub use memory::{MemoryParameterStore, MemorySecretStore};
pub use record::{LICENSE_KEY_ATTRIBUTE, LicenseKeySecret, decode_license_key};
pub use resolver::LicenseKeyResolver;
pub use types::{ResolvedLicenseKey, SecureSecret};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a license key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeySource {
    /// Literal value from configuration
    Configuration,
    /// Secret store (AWS Secrets Manager)
    #[serde(rename = "secrets-manager")]
    SecretStore,
    /// Parameter store (AWS SSM Parameter Store)
    ParameterStore,
    /// Process environment
    Environment,
}

impl KeySource {
    /// Stable short name used in logs and CLI output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::SecretStore => "secrets-manager",
            Self::ParameterStore => "parameter-store",
            Self::Environment => "environment",
        }
    }
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error types for license key resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// A remote lookup failed (not found, access denied, network)
    #[error("License key unavailable from {key_source} '{id}': {message}")]
    SourceUnavailable {
        /// Source that was queried
        key_source: KeySource,
        /// Identifier that was looked up
        id: String,
        /// Error message from the backend
        message: String,
    },

    /// The secret store returned a record without a usable `LicenseKey`
    #[error("malformed license key secret '{id}': {reason}")]
    MalformedSecret {
        /// Secret identifier
        id: String,
        /// What was wrong with the record
        reason: String,
    },

    /// The source has no entry under this identifier
    #[error("License key not found in {key_source} under '{id}'")]
    NotFound {
        /// Source that was searched
        key_source: KeySource,
        /// Identifier that was looked up
        id: String,
    },
}

impl CredentialError {
    /// Build a [`CredentialError::SourceUnavailable`] from any displayable backend error
    #[must_use]
    pub fn unavailable(key_source: KeySource, id: &str, err: impl std::fmt::Display) -> Self {
        Self::SourceUnavailable {
            key_source,
            id: id.to_string(),
            message: err.to_string(),
        }
    }

    /// Whether this error describes a malformed secret record
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedSecret { .. })
    }
}

/// Raw payload returned by a secret store lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretValue {
    /// String payload; `None` for binary secrets
    pub secret_string: Option<String>,
}

impl SecretValue {
    /// A secret with a string payload
    #[must_use]
    pub fn new(secret_string: impl Into<String>) -> Self {
        Self {
            secret_string: Some(secret_string.into()),
        }
    }

    /// A secret that only carries binary data
    #[must_use]
    pub const fn binary() -> Self {
        Self {
            secret_string: None,
        }
    }
}

/// Key-value secret store holding structured secret payloads.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the secret stored under `secret_id`.
    ///
    /// Any failure (missing entry, denied access, transport) is reported as an
    /// error; the resolver does not distinguish between them.
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue, CredentialError>;

    /// Provider name used in logs
    fn provider_name(&self) -> &'static str;
}

/// Parameter store holding plain or encrypted string parameters.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the parameter `name`, decrypting secure strings when `with_decryption` is set.
    async fn get_parameter(
        &self,
        name: &str,
        with_decryption: bool,
    ) -> Result<String, CredentialError>;

    /// Provider name used in logs
    fn provider_name(&self) -> &'static str;
}
