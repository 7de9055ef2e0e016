use std::sync::Arc;

use chrono::Utc;
use common::SubmissionStatus;
use common::judge_job::{JudgeJob, SampleCase};
use common::judge_result::VerdictResult;
use judge_worker::Verifier;
use judge_worker::handlers::judge::handle_judge_job;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

use crate::consumers::apply_judge_result;
use crate::consumers::judge_result::finalize_submission;
use crate::entity::submission;
use crate::matchmaking::lifecycle::load_samples;
use crate::state::AppState;

pub const PREPARE_FAILED_MESSAGE: &str = "Failed to prepare judge job";

/// Hand a queued submission to a judge.
///
/// The submission moves to `running` first; if another dispatcher got there
/// already nothing is sent. With the broker enabled the job is published to
/// the judge queue, otherwise (or when publishing fails) it is judged by a
/// background task in this process. A job that cannot be prepared finalizes
/// the submission as an internal error.
#[instrument(skip(state, submission), fields(submission_id = submission.id))]
pub async fn dispatch_submission(
    state: &AppState,
    submission: &submission::Model,
) -> Result<(), DbErr> {
    if !mark_running(&state.db, submission.id).await? {
        debug!("Submission already dispatched");
        return Ok(());
    }

    let job = match build_job(&state.db, submission).await {
        Ok(job) => job,
        Err(e) => {
            error!(error = %e, "Failed to prepare judge job");
            let verdict = VerdictResult::internal_error(PREPARE_FAILED_MESSAGE);
            if let Err(e) = finalize_submission(
                &state.db,
                submission.id,
                &verdict,
                &[SubmissionStatus::Running],
            )
            .await
            {
                error!(error = %e, "Failed to finalize undispatchable submission");
            }
            return Err(e);
        }
    };

    if let Some(mq) = &state.mq {
        match mq
            .publish(&state.config.mq.queue_name, None, &job, None)
            .await
        {
            Ok(_) => {
                info!(
                    job_id = %job.job_id,
                    samples = job.samples.len(),
                    "Judge job enqueued"
                );
                return Ok(());
            }
            Err(e) => warn!(error = %e, "Failed to enqueue judge job, judging in-process"),
        }
    }

    spawn_local_judge(state.db.clone(), Arc::clone(&state.verifier), job);
    Ok(())
}

async fn build_job(db: &DatabaseConnection, submission: &submission::Model) -> Result<JudgeJob, DbErr> {
    let samples: Vec<SampleCase> = load_samples(db, submission.problem_id)
        .await?
        .into_iter()
        .map(SampleCase::from)
        .collect();

    Ok(JudgeJob::new(
        submission.id,
        submission.problem_id,
        submission.language.clone(),
        submission.version.clone(),
        submission.code.clone(),
        samples,
    ))
}

/// `queued -> running`, stamping `dispatched_at`. Returns false when the
/// submission was not queued.
async fn mark_running(db: &DatabaseConnection, submission_id: i32) -> Result<bool, DbErr> {
    let updated = submission::Entity::update_many()
        .col_expr(
            submission::Column::Status,
            Expr::value(SubmissionStatus::Running),
        )
        .col_expr(
            submission::Column::DispatchedAt,
            Expr::value(Some(Utc::now())),
        )
        .filter(submission::Column::Id.eq(submission_id))
        .filter(submission::Column::Status.eq(SubmissionStatus::Queued))
        .exec(db)
        .await?;
    Ok(updated.rows_affected == 1)
}

fn spawn_local_judge(db: DatabaseConnection, verifier: Arc<Verifier>, job: JudgeJob) {
    let span = info_span!("local_judge", submission_id = job.submission_id, job_id = %job.job_id);

    tokio::spawn(
        async move {
            let result = handle_judge_job(&verifier, job).await;
            if let Err(e) = apply_judge_result(&db, result).await {
                error!(error = %e, "Failed to store judge result");
            }
        }
        .instrument(span),
    );
}
