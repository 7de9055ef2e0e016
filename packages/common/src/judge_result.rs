use crate::Verdict;
use serde::{Deserialize, Serialize};

/// Outcome of judging one submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictResult {
    pub verdict: Verdict,
    /// Human-readable summary, e.g. "Wrong answer on sample 2".
    pub message: String,
    /// 1-based index of the first sample that did not pass.
    pub failing_sample: Option<u32>,
    /// Trimmed stdout of the failing sample (wrong answers only).
    pub captured_output: Option<String>,
    /// Compiler diagnostics (compilation errors only).
    pub compile_output: Option<String>,
    /// Program stderr (runtime errors only).
    pub stderr: Option<String>,
    /// Largest run time reported across executed samples (milliseconds).
    pub exec_time_ms: Option<i32>,
    /// Largest memory usage reported across executed samples (kilobytes).
    pub memory_kb: Option<i32>,
}

impl VerdictResult {
    pub fn new(verdict: Verdict, message: impl Into<String>) -> Self {
        Self {
            verdict,
            message: message.into(),
            failing_sample: None,
            captured_output: None,
            compile_output: None,
            stderr: None,
            exec_time_ms: None,
            memory_kb: None,
        }
    }

    pub fn accepted() -> Self {
        Self::new(Verdict::Accepted, "All samples passed")
    }

    /// Judging could not complete: the sandbox failed or answered with an error.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(Verdict::InternalError, message)
    }

    /// A failure pinned to a sample, e.g. "Runtime error on sample 3".
    pub fn failed_on(verdict: Verdict, sample: u32) -> Self {
        let mut result = Self::new(verdict, format!("{} on sample {}", verdict.label(), sample));
        result.failing_sample = Some(sample);
        result
    }
}

/// Result from a judge after judging a submission.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct JudgeResult {
    /// Original job ID.
    pub job_id: String,
    /// Submission that was judged.
    pub submission_id: i32,
    pub result: VerdictResult,
}
