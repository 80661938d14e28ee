use anyhow::Context;
use clap::Parser;
use lexi_config::Config;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod controller;
mod output;

use self::cli::Cli;
use self::controller::AppController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::new(),
    };

    init_tracing(&config, cli.json);
    if !config.user.is_signed_in() {
        tracing::debug!("No signed-in user, voting and suggestions are disabled");
    }

    let mut app = AppController::start(config).await?;
    let result = commands::execute(cli.command, &mut app).await;
    app.shutdown().await;

    println!("{}", result?);
    Ok(())
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so
/// command output can be piped.
fn init_tracing(config: &Config, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}
