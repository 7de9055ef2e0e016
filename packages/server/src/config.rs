use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{MqAppConfig, SandboxConfig, WaitingQueueConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound on pooled connections. Default: 100.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connections kept open while idle. Default: 5.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Log every SQL statement. Default: false.
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 {
    100
}
fn default_min_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HMAC secret shared with the service that issues tokens.
    pub jwt_secret: String,
}

/// Pairing scheduler settings.
#[derive(Debug, Deserialize, Clone)]
pub struct MatchmakingConfig {
    /// Seconds between background pairing cycles. Default: 2.
    #[serde(default = "default_cycle_interval_secs")]
    pub cycle_interval_secs: u64,
    /// Maximum battles created per cycle. Default: 10.
    #[serde(default = "default_max_pairs_per_cycle")]
    pub max_pairs_per_cycle: usize,
}

fn default_cycle_interval_secs() -> u64 {
    2
}
fn default_max_pairs_per_cycle() -> usize {
    10
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            cycle_interval_secs: default_cycle_interval_secs(),
            max_pairs_per_cycle: default_max_pairs_per_cycle(),
        }
    }
}

/// Stuck judging detection.
#[derive(Debug, Deserialize, Clone)]
pub struct JudgingConfig {
    /// Submissions still pending after this many seconds are finalized as
    /// internal errors. Default: 300.
    #[serde(default = "default_stuck_timeout_secs")]
    pub stuck_timeout_secs: u64,
    /// Seconds between scans. Default: 60.
    #[serde(default = "default_stuck_scan_interval_secs")]
    pub stuck_scan_interval_secs: u64,
}

fn default_stuck_timeout_secs() -> u64 {
    300
}
fn default_stuck_scan_interval_secs() -> u64 {
    60
}

impl Default for JudgingConfig {
    fn default() -> Self {
        Self {
            stuck_timeout_secs: default_stuck_timeout_secs(),
            stuck_scan_interval_secs: default_stuck_scan_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// TOML file with problems to load at startup.
    #[serde(default)]
    pub problems_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
    #[serde(default)]
    pub waiting_queue: WaitingQueueConfig,
    #[serde(default)]
    pub matchmaking: MatchmakingConfig,
    #[serde(default)]
    pub judging: JudgingConfig,
    #[serde(default)]
    pub sandbox: SandboxConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ARENA_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., ARENA__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("ARENA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
