/// Network configuration for the HTTP/WebSocket listener.
use log::warn;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Where the server listens.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Load config from `BOMBER_HOST` / `BOMBER_PORT`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("BOMBER_HOST") {
            if host.trim().is_empty() {
                warn!("[Config] BOMBER_HOST is empty, using default {}", DEFAULT_HOST);
            } else {
                config.host = host.trim().to_string();
            }
        }

        if let Some(port) = lookup("BOMBER_PORT") {
            match port.trim().parse::<u16>() {
                Ok(parsed) if parsed > 0 => config.port = parsed,
                _ => warn!("[Config] Invalid BOMBER_PORT '{}', using default {}", port, DEFAULT_PORT),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn reads_overrides_and_ignores_bad_port() {
        let config = ServerConfig::from_lookup(|key| match key {
            "BOMBER_HOST" => Some("0.0.0.0".to_string()),
            "BOMBER_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);

        let config = ServerConfig::from_lookup(|key| (key == "BOMBER_PORT").then(|| "9001".to_string()));
        assert_eq!(config.port, 9001);
    }
}
