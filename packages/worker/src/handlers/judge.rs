use common::judge_job::JudgeJob;
use common::judge_result::JudgeResult;
use tracing::{info, instrument};

use crate::models::judge::Verifier;

/// Handle a judge job and return the result.
#[instrument(skip(verifier, job), fields(submission_id = job.submission_id, job_id = %job.job_id))]
pub async fn handle_judge_job(verifier: &Verifier, job: JudgeJob) -> JudgeResult {
    info!(
        language = %job.language,
        samples = job.samples.len(),
        "Judging submission"
    );

    let result = verifier
        .judge(&job.language, job.version.as_deref(), &job.code, &job.samples)
        .await;

    info!(
        verdict = %result.verdict,
        failing_sample = ?result.failing_sample,
        "Judging completed"
    );

    JudgeResult {
        job_id: job.job_id,
        submission_id: job.submission_id,
        result,
    }
}
