use serde::Deserialize;

/// App-level MQ configuration for judge job transport.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether MQ is enabled. Default: true.
    /// When disabled the server judges submissions in-process.
    /// Note: Worker ignores this field (always requires MQ).
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Queue for judge jobs (server publishes, worker consumes). Default: "judge_jobs".
    #[serde(default = "default_mq_queue_name")]
    pub queue_name: String,
    /// Queue for judge results (worker publishes, server consumes). Default: "judge_results".
    #[serde(default = "default_mq_result_queue_name")]
    pub result_queue_name: String,
}

fn default_mq_enabled() -> bool {
    true
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_mq_queue_name() -> String {
    "judge_jobs".into()
}
fn default_mq_result_queue_name() -> String {
    "judge_results".into()
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            queue_name: default_mq_queue_name(),
            result_queue_name: default_mq_result_queue_name(),
        }
    }
}

/// Waiting-queue hint store. The ticket table stays authoritative.
#[derive(Debug, Deserialize, Clone)]
pub struct WaitingQueueConfig {
    /// Redis URL for the shared waiting list. `None` selects the in-process list.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Redis key of the list. Default: "matchmaking:waiting".
    #[serde(default = "default_waiting_queue_key")]
    pub key: String,
}

fn default_waiting_queue_key() -> String {
    "matchmaking:waiting".into()
}

impl Default for WaitingQueueConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key: default_waiting_queue_key(),
        }
    }
}

/// External code-execution sandbox (Piston-compatible API).
#[derive(Debug, Deserialize, Clone)]
pub struct SandboxConfig {
    /// Execute endpoint. Default: "https://emkc.org/api/v2/piston/execute".
    #[serde(default = "default_sandbox_url")]
    pub url: String,
    /// Per-request HTTP timeout in milliseconds. Default: 10000.
    #[serde(default = "default_sandbox_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Language version sent when a submission does not pin one. Default: "*".
    #[serde(default = "default_sandbox_version")]
    pub default_version: String,
    /// Run-stage wall clock limit forwarded to the sandbox.
    #[serde(default)]
    pub run_timeout_ms: Option<u64>,
    /// Run-stage memory limit forwarded to the sandbox.
    #[serde(default)]
    pub run_memory_limit_bytes: Option<u64>,
}

fn default_sandbox_url() -> String {
    "https://emkc.org/api/v2/piston/execute".into()
}
fn default_sandbox_request_timeout_ms() -> u64 {
    10_000
}
fn default_sandbox_version() -> String {
    "*".into()
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            url: default_sandbox_url(),
            request_timeout_ms: default_sandbox_request_timeout_ms(),
            default_version: default_sandbox_version(),
            run_timeout_ms: None,
            run_memory_limit_bytes: None,
        }
    }
}
