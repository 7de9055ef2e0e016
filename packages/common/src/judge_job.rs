use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One sample case: stdin fed to the program and the expected stdout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCase {
    pub input: String,
    pub expected_output: String,
}

impl SampleCase {
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected_output: expected_output.into(),
        }
    }
}

/// A judge job message sent to the worker queue.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JudgeJob {
    /// Job identifier (UUID)
    pub job_id: String,
    /// ID of the submission being judged
    pub submission_id: i32,
    pub problem_id: i32,
    /// Sandbox language name (e.g., "cpp", "python")
    pub language: String,
    /// Pinned language version; the worker's default is used when absent.
    pub version: Option<String>,
    pub code: String,
    /// Sample cases in judging order.
    pub samples: Vec<SampleCase>,
}

impl JudgeJob {
    /// Create a new judge job with a generated UUID.
    pub fn new(
        submission_id: i32,
        problem_id: i32,
        language: String,
        version: Option<String>,
        code: String,
        samples: Vec<SampleCase>,
    ) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            submission_id,
            problem_id,
            language,
            version,
            code,
            samples,
        }
    }
}
