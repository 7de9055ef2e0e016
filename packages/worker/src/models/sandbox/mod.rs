pub mod error;
pub mod piston;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

pub use error::SandboxError;
pub use piston::PistonSandbox;

/// A source file shipped to the sandbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

/// One execution: compile (if the language needs it) and run with `stdin`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRequest {
    pub language: String,
    pub version: String,
    pub files: Vec<SourceFile>,
    pub stdin: String,
    /// Run-stage wall clock limit in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_timeout: Option<u64>,
    /// Run-stage memory limit in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_memory_limit: Option<u64>,
}

/// Output of a compile or run stage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StageOutput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stdout: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stderr: String,
    #[serde(default)]
    pub code: Option<i32>,
    /// Signal that terminated the process, e.g. `"SIGKILL"`.
    #[serde(default)]
    pub signal: Option<String>,
    /// Sandbox status code, e.g. `"TO"` for a timeout.
    #[serde(default)]
    pub status: Option<String>,
    /// CPU time in milliseconds.
    #[serde(default)]
    pub cpu_time: Option<f64>,
    /// Peak memory in bytes.
    #[serde(default)]
    pub memory: Option<f64>,
}

impl StageOutput {
    pub fn timed_out(&self) -> bool {
        self.status.as_deref() == Some("TO") || self.signal.as_deref() == Some("SIGXCPU")
    }

    /// Killed for memory, judged against `limit_bytes` when the sandbox does
    /// not say so explicitly.
    pub fn exceeded_memory(&self, limit_bytes: Option<u64>) -> bool {
        if self.status.as_deref() == Some("ML") {
            return true;
        }
        match (self.signal.as_deref(), self.memory, limit_bytes) {
            (Some("SIGKILL"), Some(used), Some(limit)) => used >= limit as f64,
            _ => false,
        }
    }
}

/// Raw sandbox answer. A top-level `message` means the request was rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecutionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub compile: Option<StageOutput>,
    #[serde(default)]
    pub run: Option<StageOutput>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Remote code-execution service.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResponse, SandboxError>;
}

/// File name the sandbox expects for `language`.
pub fn source_file_name(language: &str) -> &'static str {
    match language {
        "c" => "main.c",
        "cpp" | "c++" => "main.cpp",
        "java" => "Main.java",
        "python" | "python3" => "main.py",
        "javascript" | "js" | "node" => "main.js",
        "typescript" | "ts" => "main.ts",
        "rust" => "main.rs",
        "go" => "main.go",
        _ => "main",
    }
}
