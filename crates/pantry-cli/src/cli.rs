use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use pantry_server::ServerConfig;

#[derive(Parser, Debug)]
#[command(
    name = "pantry",
    about = "Produce inventory service over HTTP",
    version,
)]
pub struct Cli {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// TOML configuration file; flags given here override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON file of produce records loaded at startup
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info", env = "PANTRY_LOG_LEVEL")]
    pub log: tracing::Level,
}

impl Cli {
    /// Resolve the effective server configuration: file values first,
    /// overridden by whichever flags were given, defaults for the rest.
    pub fn resolve_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(seed) = &self.seed {
            config.seed_path = Some(seed.clone());
        }
        Ok(config)
    }
}
