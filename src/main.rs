use account_rs::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (settings, environment) = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = account_rs::pkg_version(),
        environment = environment.as_str(),
        "Configuration loaded"
    );

    if let Err(e) = execute_command(&cli, settings, environment).await {
        tracing::error!(error = %e, source = ?e, "Command failed");
        return Err(e.into());
    }

    Ok(())
}
