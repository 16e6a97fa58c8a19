mod cli;
mod menu;
mod output;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use mocksso_auth::{AuthConfig, SessionState};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    if let Err(e) = run() {
        output::print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(ttl) = cli.ttl {
        config.token.ttl = Duration::from_secs(ttl);
    }
    config.validate()?;

    menu::run(SessionState::new(config))
}

fn load_config(path: Option<&Path>) -> Result<AuthConfig> {
    let Some(path) = path else {
        return Ok(AuthConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
}
