//! Resolver input configuration

use serde::{Deserialize, Serialize};

/// Identifier used for the secret store and parameter store when none is configured
pub const DEFAULT_SECRET_ID: &str = "NEW_RELIC_LICENSE_KEY";

/// Environment variable holding a literal license key
pub const LICENSE_KEY_ENV: &str = "NEW_RELIC_LICENSE_KEY";

/// Environment variable naming the secret-store entry to query
pub const LICENSE_KEY_SECRET_ENV: &str = "NEW_RELIC_LICENSE_KEY_SECRET";

/// License key settings supplied by the caller.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Literal license key; wins over every other source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,

    /// Secret-store (and parameter-store) identifier override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key_secret_id: Option<String>,
}

impl Configuration {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the configuration from `NEW_RELIC_LICENSE_KEY` and
    /// `NEW_RELIC_LICENSE_KEY_SECRET`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            license_key: read_env(LICENSE_KEY_ENV),
            license_key_secret_id: read_env(LICENSE_KEY_SECRET_ENV),
        }
    }

    /// Set a literal license key
    #[must_use]
    pub fn with_license_key(mut self, license_key: impl Into<String>) -> Self {
        self.license_key = Some(license_key.into());
        self
    }

    /// Set the secret identifier override
    #[must_use]
    pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.license_key_secret_id = Some(secret_id.into());
        self
    }

    /// The literal license key, if one is configured and non-empty
    #[must_use]
    pub fn literal_license_key(&self) -> Option<&str> {
        self.license_key.as_deref().filter(|key| !key.is_empty())
    }

    /// The configured secret identifier, if non-empty
    #[must_use]
    pub fn configured_secret_id(&self) -> Option<&str> {
        self.license_key_secret_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    /// Identifier for secret-store and parameter-store lookups
    #[must_use]
    pub fn secret_id(&self) -> &str {
        self.configured_secret_id().unwrap_or(DEFAULT_SECRET_ID)
    }
}

/// Read an environment variable; a set variable is always `Some`.
///
/// Values that are not valid UTF-8 are converted lossily.
pub fn read_env(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| {
        value.into_string().unwrap_or_else(|raw| {
            tracing::warn!(var = name, "Environment variable is not valid UTF-8");
            raw.to_string_lossy().into_owned()
        })
    })
}
