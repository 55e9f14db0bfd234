use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 42069;

/// Where a [`Server`](super::Server) listens.
///
/// ```
/// use raw_http::server::ServerConfig;
///
/// let config = ServerConfig::builder().port(8080).build();
/// assert_eq!(config.address().to_string(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    address: SocketAddr,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::new()
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServerConfigBuilder {
    host: IpAddr,
    port: u16,
}

impl ServerConfigBuilder {
    fn new() -> Self {
        Self { host: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: DEFAULT_PORT }
    }

    pub fn host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Port 0 binds an ephemeral port, see [`Server::local_addr`](super::Server::local_addr).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig { address: SocketAddr::new(self.host, self.port) }
    }
}
