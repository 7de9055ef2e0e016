use std::sync::Arc;

use chrono::Utc;
use common::SubmissionStatus;
use common::judge_result::{JudgeResult, VerdictResult};
use mq::{BroccoliError, BrokerMessage, Mq};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use tracing::{error, info};

use crate::entity::submission;

/// Consume judge results from the result queue.
pub async fn consume_judge_results(db: DatabaseConnection, mq: Arc<Mq>, queue_name: String) {
    info!(queue = %queue_name, "Starting judge result consumer");

    let result = mq
        .process_messages(
            &queue_name,
            None, // single-threaded for sequential DB writes
            None,
            move |message: BrokerMessage<JudgeResult>| {
                let db = db.clone();
                async move {
                    let result = message.payload;
                    let submission_id = result.submission_id;
                    let job_id = result.job_id.clone();

                    if let Err(e) = apply_judge_result(&db, result).await {
                        error!(
                            submission_id,
                            job_id = %job_id,
                            error = %e,
                            "Failed to process judge result"
                        );
                        return Err(BroccoliError::Job(e.to_string()));
                    }
                    Ok(())
                }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Judge result consumer stopped unexpectedly");
    }
}

/// Store a verdict on a running submission.
///
/// Returns false when the submission is no longer running, which makes
/// duplicate and late results no-ops.
pub async fn apply_judge_result<C: ConnectionTrait>(
    db: &C,
    result: JudgeResult,
) -> Result<bool, DbErr> {
    let applied = finalize_submission(
        db,
        result.submission_id,
        &result.result,
        &[SubmissionStatus::Running],
    )
    .await?;

    if applied {
        info!(
            submission_id = result.submission_id,
            job_id = %result.job_id,
            verdict = %result.result.verdict,
            failing_sample = ?result.result.failing_sample,
            "Processed judge result"
        );
    } else {
        info!(
            submission_id = result.submission_id,
            job_id = %result.job_id,
            "Submission not running, skipping result"
        );
    }

    Ok(applied)
}

/// Move a submission in one of the `from` states to done, writing the whole
/// verdict in the same statement.
pub(crate) async fn finalize_submission<C: ConnectionTrait>(
    db: &C,
    submission_id: i32,
    result: &VerdictResult,
    from: &[SubmissionStatus],
) -> Result<bool, DbErr> {
    let updated = submission::Entity::update_many()
        .col_expr(submission::Column::Status, Expr::value(SubmissionStatus::Done))
        .col_expr(submission::Column::Verdict, Expr::value(Some(result.verdict)))
        .col_expr(
            submission::Column::Message,
            Expr::value(Some(result.message.clone())),
        )
        .col_expr(
            submission::Column::FailingSample,
            Expr::value(result.failing_sample.map(|n| n as i32)),
        )
        .col_expr(submission::Column::ExecTimeMs, Expr::value(result.exec_time_ms))
        .col_expr(submission::Column::MemoryKb, Expr::value(result.memory_kb))
        .col_expr(
            submission::Column::Stdout,
            Expr::value(result.captured_output.clone()),
        )
        .col_expr(submission::Column::Stderr, Expr::value(result.stderr.clone()))
        .col_expr(
            submission::Column::CompileOutput,
            Expr::value(result.compile_output.clone()),
        )
        .col_expr(submission::Column::JudgedAt, Expr::value(Some(Utc::now())))
        .filter(submission::Column::Id.eq(submission_id))
        .filter(submission::Column::Status.is_in(from.iter().copied()))
        .exec(db)
        .await?;

    Ok(updated.rows_affected == 1)
}
