use anyhow::Context;
use navgraph::EngineConfig;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    /// Per-phase solver deadline
    pub solve_timeout_ms: u64,
    /// Bound unary requests by the deadline as well
    pub unary_deadline: bool,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl EngineSettings {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            Duration::from_millis(self.solve_timeout_ms),
            self.unary_deadline,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 50051,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            engine: EngineSettings {
                solve_timeout_ms: 5000,
                unary_deadline: false,
                max_body_bytes: 256 * 1024 * 1024,
            },
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let config = Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var("SERVER_PORT", defaults.server.port)?,
            },
            logging: LoggingConfig {
                level: env::var("LOG_LEVEL").unwrap_or(defaults.logging.level),
                format: env::var("LOG_FORMAT").unwrap_or(defaults.logging.format),
            },
            engine: EngineSettings {
                solve_timeout_ms: parse_var("SOLVE_TIMEOUT_MS", defaults.engine.solve_timeout_ms)?,
                unary_deadline: parse_flag("UNARY_DEADLINE", defaults.engine.unary_deadline)?,
                max_body_bytes: parse_var("MAX_BODY_BYTES", defaults.engine.max_body_bytes)?,
            },
        };

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {}", name, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &str, default: bool) -> anyhow::Result<bool> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            other => anyhow::bail!("Invalid value for {}: {}", name, other),
        },
        Err(_) => Ok(default),
    }
}
