use anyhow::Result;
use campus_connect::cli::{handle_admin_command, AdminCli};
use campus_connect::ConfigManager;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = AdminCli::parse();
    let config = ConfigManager::load()?;

    handle_admin_command(cli, &config).await
}
