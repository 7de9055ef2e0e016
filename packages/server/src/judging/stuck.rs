use std::time::Duration;

use chrono::Utc;
use common::SubmissionStatus;
use common::judge_result::VerdictResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use tracing::{error, info, warn};

use super::dispatch_submission;
use crate::consumers::judge_result::finalize_submission;
use crate::entity::submission;
use crate::state::AppState;

pub const STUCK_MESSAGE: &str = "Judging timed out";

/// Run the stuck judging detector as a background task.
pub async fn run_stuck_judging_detector(state: AppState) {
    let config = state.config.judging.clone();
    let scan_interval = Duration::from_secs(config.stuck_scan_interval_secs.max(1));

    info!(
        timeout_secs = config.stuck_timeout_secs,
        scan_interval_secs = config.stuck_scan_interval_secs,
        "Starting stuck judging detector"
    );

    let mut interval = tokio::time::interval(scan_interval);

    loop {
        interval.tick().await;

        if let Err(e) = redispatch_stranded_submissions(&state, config.stuck_timeout_secs).await {
            error!(error = %e, "Stranded submission scan failed");
        }
        if let Err(e) = finalize_stuck_submissions(&state.db, config.stuck_timeout_secs).await {
            error!(error = %e, "Stuck judging detection failed");
        }
    }
}

fn threshold(timeout_secs: u64) -> chrono::DateTime<Utc> {
    Utc::now() - chrono::Duration::seconds(timeout_secs as i64)
}

/// Finalize every submission running for longer than `timeout_secs` since
/// dispatch as an internal error. Returns how many were finalized.
pub async fn finalize_stuck_submissions(
    db: &DatabaseConnection,
    timeout_secs: u64,
) -> anyhow::Result<usize> {
    let stuck_ids: Vec<i32> = submission::Entity::find()
        .select_only()
        .column(submission::Column::Id)
        .filter(submission::Column::Status.eq(SubmissionStatus::Running))
        .filter(submission::Column::DispatchedAt.lt(threshold(timeout_secs)))
        .into_tuple()
        .all(db)
        .await?;

    if stuck_ids.is_empty() {
        return Ok(0);
    }

    info!(count = stuck_ids.len(), "Found stuck submissions");

    let verdict = VerdictResult::internal_error(STUCK_MESSAGE);
    let mut finalized = 0;

    for submission_id in stuck_ids {
        // A result may land between the scan and this update.
        match finalize_submission(db, submission_id, &verdict, &[SubmissionStatus::Running]).await
        {
            Ok(true) => {
                finalized += 1;
                warn!(submission_id, "Finalized stuck submission");
            }
            Ok(false) => {}
            Err(e) => error!(
                submission_id,
                error = %e,
                "Failed to finalize stuck submission"
            ),
        }
    }

    Ok(finalized)
}

/// Dispatch again every submission left `queued` for longer than
/// `timeout_secs`. Returns how many were handed to a judge.
pub async fn redispatch_stranded_submissions(
    state: &AppState,
    timeout_secs: u64,
) -> anyhow::Result<usize> {
    let stranded = submission::Entity::find()
        .filter(submission::Column::Status.eq(SubmissionStatus::Queued))
        .filter(submission::Column::CreatedAt.lt(threshold(timeout_secs)))
        .all(&state.db)
        .await?;

    let mut dispatched = 0;

    for model in &stranded {
        match dispatch_submission(state, model).await {
            Ok(()) => {
                dispatched += 1;
                warn!(submission_id = model.id, "Dispatched stranded submission");
            }
            Err(e) => error!(
                submission_id = model.id,
                error = %e,
                "Failed to dispatch stranded submission"
            ),
        }
    }

    Ok(dispatched)
}
