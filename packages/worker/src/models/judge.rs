//! Sample-based judging.
//!
//! Samples run one at a time and judging stops at the first sample that does
//! not pass. Within a sample the checks are ordered: sandbox failure, compile
//! diagnostics, missing run stage, stderr, time limit, memory limit, output.

use std::sync::Arc;

use common::Verdict;
use common::config::SandboxConfig;
use common::judge_job::SampleCase;
use common::judge_result::VerdictResult;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::sandbox::{
    ExecutionRequest, ExecutionResponse, PistonSandbox, Sandbox, SandboxError, SourceFile,
    StageOutput, source_file_name,
};

/// Raw captures of a single custom-input run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunOutcome {
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    /// Set when the sandbox could not run the code at all.
    pub message: Option<String>,
}

/// Largest resource usage seen across executed samples.
#[derive(Default)]
struct Usage {
    exec_time_ms: Option<i32>,
    memory_kb: Option<i32>,
}

impl Usage {
    fn record(&mut self, run: &StageOutput) {
        if let Some(cpu_time) = run.cpu_time {
            let ms = cpu_time.round() as i32;
            self.exec_time_ms = Some(self.exec_time_ms.map_or(ms, |prev| prev.max(ms)));
        }
        if let Some(bytes) = run.memory {
            let kb = (bytes / 1024.0).ceil() as i32;
            self.memory_kb = Some(self.memory_kb.map_or(kb, |prev| prev.max(kb)));
        }
    }

    fn attach(self, mut result: VerdictResult) -> VerdictResult {
        result.exec_time_ms = self.exec_time_ms;
        result.memory_kb = self.memory_kb;
        result
    }
}

pub struct Verifier {
    sandbox: Arc<dyn Sandbox>,
    default_version: String,
    run_timeout_ms: Option<u64>,
    run_memory_limit_bytes: Option<u64>,
}

impl Verifier {
    pub fn new(sandbox: Arc<dyn Sandbox>, config: &SandboxConfig) -> Self {
        Self {
            sandbox,
            default_version: config.default_version.clone(),
            run_timeout_ms: config.run_timeout_ms,
            run_memory_limit_bytes: config.run_memory_limit_bytes,
        }
    }

    /// Verifier backed by the HTTP sandbox at `config.url`.
    pub fn from_config(config: &SandboxConfig) -> Result<Self, SandboxError> {
        let sandbox = PistonSandbox::new(config)?;
        Ok(Self::new(Arc::new(sandbox), config))
    }

    fn request(
        &self,
        language: &str,
        version: Option<&str>,
        code: &str,
        stdin: &str,
    ) -> ExecutionRequest {
        ExecutionRequest {
            language: language.to_string(),
            version: version.unwrap_or(&self.default_version).to_string(),
            files: vec![SourceFile {
                name: source_file_name(language).to_string(),
                content: code.to_string(),
            }],
            stdin: stdin.to_string(),
            run_timeout: self.run_timeout_ms,
            run_memory_limit: self.run_memory_limit_bytes,
        }
    }

    /// Judge `code` against `samples` in order.
    #[instrument(skip(self, code, samples), fields(samples = samples.len()))]
    pub async fn judge(
        &self,
        language: &str,
        version: Option<&str>,
        code: &str,
        samples: &[SampleCase],
    ) -> VerdictResult {
        if samples.is_empty() {
            warn!("Problem has no sample cases");
            return VerdictResult::internal_error("Problem has no sample cases");
        }

        let mut usage = Usage::default();

        for (index, sample) in samples.iter().enumerate() {
            let position = index as u32 + 1;
            let request = self.request(language, version, code, &sample.input);

            let response = match self.sandbox.execute(&request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(sample = position, error = %e, "Sandbox call failed");
                    return usage.attach(VerdictResult::internal_error(e.to_string()));
                }
            };

            if let Some(run) = &response.run {
                usage.record(run);
            }

            if let Some(failure) = check_sample(
                &response,
                &sample.expected_output,
                position,
                self.run_memory_limit_bytes,
            ) {
                info!(
                    sample = position,
                    verdict = %failure.verdict,
                    "Sample did not pass"
                );
                return usage.attach(failure);
            }

            debug!(sample = position, "Sample passed");
        }

        usage.attach(VerdictResult::accepted())
    }

    /// Run `code` once against caller-supplied input, without judging.
    #[instrument(skip(self, code, stdin))]
    pub async fn run_custom(
        &self,
        language: &str,
        version: Option<&str>,
        code: &str,
        stdin: &str,
    ) -> RunOutcome {
        let request = self.request(language, version, code, stdin);

        let response = match self.sandbox.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Sandbox call failed");
                return RunOutcome {
                    message: Some(e.to_string()),
                    ..Default::default()
                };
            }
        };

        let compile_output = response
            .compile
            .map(|compile| compile.stderr)
            .unwrap_or_default();
        let message = response
            .message
            .or_else(|| response.run.is_none().then(|| "Program was not run".to_string()));
        let run = response.run.unwrap_or_default();

        RunOutcome {
            stdout: run.stdout,
            stderr: run.stderr,
            compile_output,
            message,
        }
    }
}

/// Classify one sample. `None` means the sample passed.
fn check_sample(
    response: &ExecutionResponse,
    expected: &str,
    position: u32,
    memory_limit_bytes: Option<u64>,
) -> Option<VerdictResult> {
    if let Some(message) = &response.message {
        return Some(VerdictResult::internal_error(format!(
            "Sandbox error: {message}"
        )));
    }

    if let Some(compile) = &response.compile
        && !compile.stderr.is_empty()
    {
        let mut result = VerdictResult::failed_on(Verdict::CompilationError, position);
        result.compile_output = Some(compile.stderr.clone());
        return Some(result);
    }

    let Some(run) = &response.run else {
        return Some(VerdictResult::internal_error(
            "Sandbox response has no run stage",
        ));
    };

    if !run.stderr.is_empty() {
        let mut result = VerdictResult::failed_on(Verdict::RuntimeError, position);
        result.stderr = Some(run.stderr.clone());
        return Some(result);
    }

    if run.timed_out() {
        return Some(VerdictResult::failed_on(
            Verdict::TimeLimitExceeded,
            position,
        ));
    }

    if run.exceeded_memory(memory_limit_bytes) {
        return Some(VerdictResult::failed_on(
            Verdict::MemoryLimitExceeded,
            position,
        ));
    }

    let actual = run.stdout.trim();
    if actual != expected.trim() {
        let mut result = VerdictResult::failed_on(Verdict::WrongAnswer, position);
        result.captured_output = Some(actual.to_string());
        return Some(result);
    }

    None
}
