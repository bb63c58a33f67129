pub mod command;

use std::time::Duration;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;

pub use command::Command;

#[derive(Debug, Clone, Parser)]
#[command(name = "postify", version, about = "Browse and publish posts from the terminal")]
pub struct Config {
    /// Base URL of the posts API
    #[arg(long, env = "POSTIFY_API_URL", default_value = "http://localhost:8080/miclat")]
    api: String,
    /// Request timeout in seconds (no timeout when omitted)
    #[arg(long, env = "POSTIFY_TIMEOUT")]
    timeout: Option<u64>,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Option<Command>,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .format_timestamp(None)
            .init();
    }
    pub fn api(&self) -> &str {
        &self.api
    }
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
    /// The subcommand to run; the interactive feed when none was given
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Feed)
    }
}
