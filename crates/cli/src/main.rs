mod cli;
mod commands;
mod errors;
mod logging;

use crate::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(cli.tracing_config())?;

    let config = cli.configuration();
    let resolver = licensekey_aws::load_resolver().await;
    tracing::debug!(?resolver, "Resolver ready");

    let output = commands::run(cli.command, &resolver, &config).await?;
    emit(&output);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}
