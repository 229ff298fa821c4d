use crate::logging::{LogLevel, TracingConfig, TracingFormat};
use clap::{Parser, Subcommand};
use licensekey_secrets::Configuration;

#[derive(Parser, Debug)]
#[command(name = "licensekey")]
#[command(about = "Resolve the monitoring license key the way the agent does at startup")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        env = "NEW_RELIC_LICENSE_KEY",
        hide_env_values = true,
        help = "Literal license key; skips every remote lookup"
    )]
    pub license_key: Option<String>,

    #[arg(
        long,
        global = true,
        env = "NEW_RELIC_LICENSE_KEY_SECRET",
        help = "Secrets Manager / Parameter Store identifier"
    )]
    pub secret_id: Option<String>,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format (same as --log-format json)")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        help = "Tracing filter directive; overrides RUST_LOG and --level"
    )]
    pub log_filter: Option<String>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Run the resolution chain and report which source answered")]
    Resolve,
    #[command(about = "Check whether the license key secret exists in Secrets Manager")]
    Check,
}

impl Cli {
    /// Resolver configuration from flags and their environment fallbacks
    pub fn configuration(&self) -> Configuration {
        Configuration {
            license_key: self.license_key.clone(),
            license_key_secret_id: self.secret_id.clone(),
        }
    }

    /// Tracing settings from the logging flags; `--json` wins over `--log-format`
    pub fn tracing_config(&self) -> TracingConfig {
        TracingConfig {
            format: if self.json {
                TracingFormat::Json
            } else {
                self.log_format
            },
            level: self.level.into(),
            filter: self.log_filter.clone(),
        }
    }
}
