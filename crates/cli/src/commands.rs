//! Command implementations
//!
//! Commands return the text to print instead of writing it, so they can be
//! exercised against in-memory stores.

use crate::cli::Commands;
use crate::errors::CliError;
use licensekey_secrets::{Configuration, LicenseKeyResolver};

/// Run a command and return its stdout output
pub async fn run(
    command: Commands,
    resolver: &LicenseKeyResolver,
    config: &Configuration,
) -> Result<String, CliError> {
    match command {
        Commands::Resolve => resolve(resolver, config).await,
        Commands::Check => Ok(check(resolver, config).await),
    }
}

async fn resolve(
    resolver: &LicenseKeyResolver,
    config: &Configuration,
) -> Result<String, CliError> {
    let key = resolver
        .resolve(config)
        .await
        .map_err(|source| CliError::Unresolved {
            secret_id: config.secret_id().to_string(),
            source,
        })?;

    tracing::info!(source = %key.source(), "License key resolved");
    Ok(format!("source: {}\nkey: {}", key.source(), key.redacted()))
}

async fn check(resolver: &LicenseKeyResolver, config: &Configuration) -> String {
    let secret_id = config.secret_id();
    let state = if resolver.is_secret_configured(config).await {
        "configured"
    } else {
        "not configured"
    };
    format!("secret '{secret_id}': {state}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use licensekey_secrets::{
        DEFAULT_SECRET_ID, LICENSE_KEY_ENV, MemoryParameterStore, MemorySecretStore,
    };
    use std::sync::Arc;

    fn resolver(secrets: MemorySecretStore, parameters: MemoryParameterStore) -> LicenseKeyResolver {
        LicenseKeyResolver::new(Arc::new(secrets), Arc::new(parameters))
    }

    #[tokio::test]
    async fn test_resolve_prints_source_and_redacted_key() {
        let resolver = resolver(
            MemorySecretStore::new()
                .with_secret(DEFAULT_SECRET_ID, r#"{"LicenseKey": "0123456789abcdef"}"#),
            MemoryParameterStore::new(),
        );

        let output = run(Commands::Resolve, &resolver, &Configuration::new())
            .await
            .unwrap();

        assert_eq!(output, "source: secrets-manager\nkey: ************cdef");
        assert!(!output.contains("0123456789"));
    }

    #[tokio::test]
    async fn test_resolve_failure_reports_secret_id() {
        temp_env::async_with_vars([(LICENSE_KEY_ENV, None::<&str>)], async {
            let resolver = resolver(MemorySecretStore::new(), MemoryParameterStore::new());
            let config = Configuration::new().with_secret_id("prod/nr");

            let err = run(Commands::Resolve, &resolver, &config).await.unwrap_err();

            match err {
                CliError::Unresolved { secret_id, source } => {
                    assert_eq!(secret_id, "prod/nr");
                    assert!(source.to_string().contains("prod/nr"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        })
        .await;
    }

    #[tokio::test]
    async fn test_check_reports_state() {
        let resolver = resolver(
            MemorySecretStore::new().with_secret(DEFAULT_SECRET_ID, "{}"),
            MemoryParameterStore::new(),
        );

        let output = run(Commands::Check, &resolver, &Configuration::new())
            .await
            .unwrap();
        assert_eq!(output, "secret 'NEW_RELIC_LICENSE_KEY': configured");

        let output = run(
            Commands::Check,
            &resolver,
            &Configuration::new().with_secret_id("missing"),
        )
        .await
        .unwrap();
        assert_eq!(output, "secret 'missing': not configured");
    }
}
