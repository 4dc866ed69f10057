use std::fs;
use std::path::Path;

use super::Config;
use crate::error::{ProxyError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| ProxyError::Config(format!("failed to read config file: {e}")))?;
    let cfg: Config =
        toml::from_str(&txt).map_err(|e| ProxyError::Config(format!("failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.connection.hostname.is_empty() {
        return Err(ProxyError::Config("connection.hostname must not be empty".into()));
    }

    if cfg.connection.port == 0 {
        return Err(ProxyError::Config("connection.port must not be zero".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_table_empty() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.connection.hostname, "127.0.0.1");
        assert_eq!(cfg.connection.port, 25565);
    }

    #[test]
    fn rejects_zero_port() {
        let cfg: Config = toml::from_str("[connection]\nport = 0\n").unwrap();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn parses_overrides() {
        let toml_src = r#"
            listen = "127.0.0.1:9999"
            kick_message = "nope"

            [connection]
            hostname = "example.org"
            port = 1337
        "#;
        let cfg: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(cfg.connection.hostname, "example.org");
        assert_eq!(cfg.connection.port, 1337);
        assert_eq!(cfg.kick_message, "nope");
    }
}
