use anyhow::Result;
use clap::Parser;
use keyword_monitor::config::{Cli, MonitorConfig};
use keyword_monitor::Monitor;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if quiet => EnvFilter::new("warn"),
        Err(_) => match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        },
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    tracing::debug!("starting keyword monitor");

    let config = MonitorConfig::from_cli(&cli)?;
    tracing::info!(directory = %config.directory.display(), terms = ?config.terms, "monitoring every {}s for the best {} results", config.period.as_secs(), config.results);
    Monitor::build(config)?.run().await?;

    tracing::debug!("keyword monitor finished");
    Ok(())
}
