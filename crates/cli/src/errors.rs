//! CLI error reporting through miette diagnostics

use licensekey_secrets::CredentialError;
use miette::Diagnostic;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    #[error("No license key could be resolved for '{secret_id}'")]
    #[diagnostic(
        code(licensekey::cli::unresolved),
        help(
            "Set NEW_RELIC_LICENSE_KEY, or store the key under a \"LicenseKey\" attribute in Secrets Manager, or as a Parameter Store parameter"
        )
    )]
    Unresolved {
        secret_id: String,
        #[source]
        source: CredentialError,
    },

    #[error("Tracing initialization failed: {message}")]
    #[diagnostic(
        code(licensekey::cli::tracing_error),
        help("Check the RUST_LOG filter syntax")
    )]
    TracingInit { message: String },
}
