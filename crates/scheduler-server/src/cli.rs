use clap::Parser;
use std::path::PathBuf;

/// HTTP server for a recurring task scheduler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[clap(short, long, default_value = "scheduler.toml")]
    pub config: PathBuf,
    /// Port to listen on, overriding the configuration
    #[clap(short, long)]
    pub port: Option<u16>,
}
