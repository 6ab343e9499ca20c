//! DocSentry command-line client

mod commands;
mod display;
mod handlers;

use clap::Parser;

use docsentry_core::{drain_notifications, App, Config};

use commands::Cli;
use handlers::AlreadyReported;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    docsentry_core::init_logging(cli.log_filter());

    let config = load_config(&cli)?;
    let app = App::new(config)?;
    let mut notifications = app.notifier().subscribe();

    let result = handlers::run(&app, cli.command).await;
    display::print_notifications(&drain_notifications(&mut notifications));

    match result {
        Err(e) if e.is::<AlreadyReported>() => std::process::exit(1),
        other => other,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let data_dir = cli.data_dir.clone().unwrap_or_else(Config::data_dir);

    let mut config = Config::load_from(&data_dir)?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    config.validate()?;

    tracing::debug!(
        api_url = %config.api_url,
        database = %config.database_path.display(),
        "Configuration loaded"
    );
    Ok(config)
}
