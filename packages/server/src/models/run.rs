use judge_worker::RunOutcome;
use serde::{Deserialize, Serialize};

use super::shared::{MAX_STDIN_BYTES, validate_code, validate_language, validate_version};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RunRequest {
    #[schema(example = "python")]
    pub language: String,
    pub version: Option<String>,
    pub code: String,
    #[schema(example = "2 2")]
    pub stdin: String,
}

impl RunRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_language(&self.language)?;
        validate_version(self.version.as_deref())?;
        validate_code(&self.code)?;
        if self.stdin.is_empty() {
            return Err(AppError::Validation("stdin must not be empty".into()));
        }
        if self.stdin.len() > MAX_STDIN_BYTES {
            return Err(AppError::Validation(format!(
                "stdin exceeds {MAX_STDIN_BYTES} bytes"
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RunResponse {
    pub stdout: String,
    pub stderr: String,
    pub compile_output: String,
    /// Present when the sandbox could not run the program.
    pub message: Option<String>,
}

impl From<RunOutcome> for RunResponse {
    fn from(o: RunOutcome) -> Self {
        Self {
            stdout: o.stdout,
            stderr: o.stderr,
            compile_output: o.compile_output,
            message: o.message,
        }
    }
}
