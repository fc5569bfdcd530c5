use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

/// Server settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub roles_file: PathBuf,
    pub static_dir: PathBuf,
    pub cors_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            roles_file: PathBuf::from("roles.yaml"),
            static_dir: PathBuf::from("www"),
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("APP_HOST").unwrap_or(defaults.host),
            port: parse_or("APP_PORT", lookup("APP_PORT"), defaults.port),
            roles_file: lookup("ROLES_FILE").map_or(defaults.roles_file, PathBuf::from),
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        }
    }

    pub fn address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}
