//! Secret-store record decoding

use crate::CredentialError;
use serde_json::{Map, Value};

/// Attribute of the secret-store record that holds the license key
pub const LICENSE_KEY_ATTRIBUTE: &str = "LicenseKey";

/// Decoded secret-store record.
///
/// The record is a JSON object with a single required string attribute,
/// `LicenseKey`. Other attributes are ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct LicenseKeySecret {
    license_key: String,
}

impl LicenseKeySecret {
    /// Parse a raw secret string.
    ///
    /// The attribute name is matched exactly first and then ignoring ASCII case,
    /// so `{"licenseKey": "..."}` is accepted as well.
    ///
    /// # Errors
    /// Returns [`CredentialError::MalformedSecret`] if the payload is not a JSON
    /// object or has no non-empty string `LicenseKey` attribute.
    pub fn parse(secret_id: &str, raw: &str) -> Result<Self, CredentialError> {
        let malformed = |reason: String| CredentialError::MalformedSecret {
            id: secret_id.to_string(),
            reason,
        };

        let object: Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

        let value = object.get(LICENSE_KEY_ATTRIBUTE).or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(LICENSE_KEY_ATTRIBUTE))
                .map(|(_, value)| value)
        });

        match value {
            Some(Value::String(key)) if !key.is_empty() => Ok(Self {
                license_key: key.clone(),
            }),
            Some(Value::String(_) | Value::Null) | None => Err(malformed(format!(
                "missing \"{LICENSE_KEY_ATTRIBUTE}\" attribute"
            ))),
            Some(other) => Err(malformed(format!(
                "\"{LICENSE_KEY_ATTRIBUTE}\" must be a string, found {}",
                json_type(other)
            ))),
        }
    }

    /// The decoded license key
    #[must_use]
    pub fn license_key(&self) -> &str {
        &self.license_key
    }

    /// Consume the record, returning the license key
    #[must_use]
    pub fn into_license_key(self) -> String {
        self.license_key
    }
}

impl std::fmt::Debug for LicenseKeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LicenseKeySecret")
            .field("license_key", &"[REDACTED]")
            .finish()
    }
}

/// Decode the license key out of a secret-store payload.
///
/// # Errors
/// Returns [`CredentialError::MalformedSecret`] when the record has no usable
/// `LicenseKey` attribute.
pub fn decode_license_key(secret_id: &str, raw: &str) -> Result<String, CredentialError> {
    LicenseKeySecret::parse(secret_id, raw).map(LicenseKeySecret::into_license_key)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
