use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{Origin, ProxyConfig, DEFAULT_CACHE_FILE, DEFAULT_PORT};

#[derive(Debug, Parser)]
#[command(name = "caching-proxy", version, about = "Caching HTTP proxy for a single origin")]
pub struct Cli {
    /// Location of the persisted cache.
    #[arg(
        long,
        global = true,
        env = "CACHING_PROXY_CACHE_FILE",
        value_name = "PATH",
        default_value = DEFAULT_CACHE_FILE
    )]
    pub cache_file: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the caching proxy server.
    Start(StartArgs),
    /// Clear the cache.
    #[command(name = "clear-cache")]
    ClearCache,
}

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Port for the server.
    #[arg(short, long, env = "CACHING_PROXY_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Origin server URL.
    #[arg(short, long, env = "CACHING_PROXY_ORIGIN")]
    pub origin: Origin,
}

impl StartArgs {
    pub fn into_config(self, cache_file: PathBuf) -> ProxyConfig {
        ProxyConfig {
            port: self.port,
            origin: self.origin,
            cache_file,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
