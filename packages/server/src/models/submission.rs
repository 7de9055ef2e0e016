use chrono::{DateTime, Utc};
use common::{SubmissionStatus, Verdict};
use serde::{Deserialize, Serialize};

use super::shared::{validate_battle_id, validate_code, validate_language, validate_version};
use crate::entity::submission;
use crate::error::AppError;

/// Either `battle_id` (a live battle the caller takes part in) or
/// `problem_id` (practice), not both.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSubmissionRequest {
    pub battle_id: Option<String>,
    pub problem_id: Option<i32>,
    #[schema(example = "python")]
    pub language: String,
    pub version: Option<String>,
    #[schema(example = "print(sum(map(int, input().split())))")]
    pub code: String,
}

/// Where a submission is judged.
pub enum SubmissionTarget<'a> {
    Battle(&'a str),
    Practice(i32),
}

impl CreateSubmissionRequest {
    pub fn validate(&self) -> Result<SubmissionTarget<'_>, AppError> {
        validate_language(&self.language)?;
        validate_version(self.version.as_deref())?;
        validate_code(&self.code)?;

        match (self.battle_id.as_deref(), self.problem_id) {
            (Some(battle_id), None) => {
                validate_battle_id(battle_id)?;
                Ok(SubmissionTarget::Battle(battle_id))
            }
            (None, Some(problem_id)) => Ok(SubmissionTarget::Practice(problem_id)),
            _ => Err(AppError::Validation(
                "Exactly one of battle_id or problem_id is required".into(),
            )),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmissionResponse {
    pub id: i32,
    pub user_id: i32,
    pub problem_id: i32,
    pub battle_id: Option<String>,
    pub language: String,
    pub version: Option<String>,
    pub status: SubmissionStatus,
    pub verdict: Option<Verdict>,
    /// e.g. "Wrong answer on sample 2".
    pub message: Option<String>,
    /// 1-based index of the first failing sample.
    pub failing_sample: Option<i32>,
    pub exec_time_ms: Option<i32>,
    pub memory_kb: Option<i32>,
    /// Trimmed output of the failing sample.
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub created_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(m: submission::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            problem_id: m.problem_id,
            battle_id: m.battle_id,
            language: m.language,
            version: m.version,
            status: m.status,
            verdict: m.verdict,
            message: m.message,
            failing_sample: m.failing_sample,
            exec_time_ms: m.exec_time_ms,
            memory_kb: m.memory_kb,
            stdout: m.stdout,
            stderr: m.stderr,
            compile_output: m.compile_output,
            created_at: m.created_at,
            judged_at: m.judged_at,
        }
    }
}
