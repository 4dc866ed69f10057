mod loader;

pub use loader::load_from_path;

use serde::Deserialize;
use std::net::SocketAddr;

fn default_listen() -> SocketAddr {
    "0.0.0.0:25565".parse().unwrap()
}

fn default_hostname() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    25565
}

fn default_kick_message() -> String {
    "bad packet".to_string()
}

fn default_ping_description() -> String {
    "Craftd Proxy\u{00A7}0\u{00A7}0".to_string()
}

/// Upstream the proxy dials for every accepted downstream connection.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Connection {
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Connection {
    fn default() -> Self {
        Connection { hostname: default_hostname(), port: default_port() }
    }
}

/// Top-level proxy configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Address the proxy binds for downstream (client) connections.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    #[serde(default)]
    pub connection: Connection,

    /// Reason string sent to a client whose connection is kicked for a
    /// malformed packet.
    #[serde(default = "default_kick_message")]
    pub kick_message: String,

    /// Server-description string synthesized in the Disconnect-Ping reply
    /// to a ListPing request. May contain `§`+hex color escapes.
    #[serde(default = "default_ping_description")]
    pub ping_description: String,

    /// Optional cap on concurrently open downstream connections.
    #[serde(default)]
    pub max_connections: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen: default_listen(),
            connection: Connection::default(),
            kick_message: default_kick_message(),
            ping_description: default_ping_description(),
            max_connections: None,
        }
    }
}
