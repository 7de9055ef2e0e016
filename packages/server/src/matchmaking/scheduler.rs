use std::sync::Arc;
use std::time::Duration;

use common::TicketStatus;
use mq::WaitingQueue;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::run_pairing_cycle;
use crate::config::MatchmakingConfig;
use crate::entity::ticket;

/// Run pairing cycles on a fixed interval as a background task.
pub async fn run_pairing_scheduler(
    db: DatabaseConnection,
    queue: Arc<dyn WaitingQueue>,
    config: MatchmakingConfig,
) {
    let period = Duration::from_secs(config.cycle_interval_secs.max(1));

    info!(
        interval_secs = period.as_secs(),
        max_pairs = config.max_pairs_per_cycle,
        backend = queue.backend(),
        "Starting pairing scheduler"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        run_pairing_cycle(&db, queue.as_ref(), config.max_pairs_per_cycle).await;
    }
}

/// Refill an empty waiting queue from the tickets still waiting in the database.
///
/// Returns the number of users enqueued. A non-empty queue is left alone.
pub async fn restore_waiting_queue(
    db: &DatabaseConnection,
    queue: &dyn WaitingQueue,
) -> anyhow::Result<usize> {
    if queue.size().await? > 0 {
        return Ok(0);
    }

    let waiting: Vec<i32> = ticket::Entity::find()
        .select_only()
        .column(ticket::Column::UserId)
        .filter(ticket::Column::Status.eq(TicketStatus::Waiting))
        .order_by_asc(ticket::Column::CreatedAt)
        .order_by_asc(ticket::Column::Id)
        .into_tuple()
        .all(db)
        .await?;

    for user_id in &waiting {
        if let Err(e) = queue.enqueue(*user_id).await {
            warn!(user_id, error = %e, "Failed to restore waiting queue entry");
        }
    }

    if !waiting.is_empty() {
        info!(
            count = waiting.len(),
            backend = queue.backend(),
            "Restored waiting queue"
        );
    }

    Ok(waiting.len())
}
