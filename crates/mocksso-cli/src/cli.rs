use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "mocksso")]
#[command(about = "MockSSO — interactive OAuth2/OIDC authorization-code flow simulator")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "MOCKSSO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Token lifetime in seconds (overrides config)
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Emit tracing output (RUST_LOG controls the filter)
    #[arg(short, long)]
    pub verbose: bool,
}
