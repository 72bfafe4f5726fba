use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DEVICE_IP: &str = "192.168.2.109";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STATIC_DIR: &str = ".";

/// How long a single device request may run before it is abandoned.
pub const DEVICE_TIMEOUT: Duration = Duration::from_secs(5);

/// Process configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host (IP or name, optionally with a port) of the depth sensor.
    pub device_ip: String,
    /// Port the server binds on all interfaces.
    pub port: u16,
    /// Base directory static files are served from.
    pub static_dir: PathBuf,
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// the built-in defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let device_ip = env::var("ESP32_IP").unwrap_or_else(|_| DEFAULT_DEVICE_IP.to_string());

        let port = port_or_default(env::var("PORT").ok());

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));

        Self {
            device_ip,
            port,
            static_dir,
        }
    }
}

fn port_or_default(raw: Option<String>) -> u16 {
    match raw {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable PORT value {:?}", raw);
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_uses_valid_value() {
        assert_eq!(port_or_default(Some("8080".to_string())), 8080);
    }

    #[test]
    fn port_falls_back_when_unset() {
        assert_eq!(port_or_default(None), DEFAULT_PORT);
    }

    #[test]
    fn port_falls_back_on_unparseable_value() {
        assert_eq!(port_or_default(Some("abc".to_string())), DEFAULT_PORT);
        assert_eq!(port_or_default(Some("99999".to_string())), DEFAULT_PORT);
    }
}
