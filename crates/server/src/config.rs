//! Command line configuration.
//!
//! ```bash
//! raw-http-server --port 8080 --log-level debug
//! RAW_HTTP_PORT=8080 raw-http-server
//! ```

use std::net::IpAddr;

use clap::Parser;
use raw_http::server::ServerConfig;
use tracing::Level;

#[derive(Debug, Clone, Parser)]
#[command(name = "raw-http-server")]
#[command(about = "Demo HTTP/1.1 server, one request per connection")]
#[command(version)]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, default_value_t = raw_http::server::DEFAULT_PORT, env = "RAW_HTTP_PORT")]
    pub port: u16,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0", env = "RAW_HTTP_HOST")]
    pub host: IpAddr,

    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RAW_HTTP_LOG_LEVEL")]
    pub log_level: Level,
}

impl Config {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder().host(self.host).port(self.port).build()
    }
}
