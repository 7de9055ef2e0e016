use chrono::Utc;
use common::{BattleStatus, TicketStatus};
use mq::WaitingQueue;
use rand::Rng;
use sea_orm::sea_query::{Expr, LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::MatchError;
use crate::entity::{battle, problem, ticket};

/// Claim the two oldest waiting tickets and turn them into a live battle.
///
/// Returns `None` when fewer than two tickets are claimable or no problem
/// exists. Tickets locked by a concurrent attempt are skipped rather than
/// waited on. Either the battle and both ticket transitions commit together
/// or nothing does.
#[instrument(skip(db))]
pub async fn try_pair_once(db: &DatabaseConnection) -> Result<Option<battle::Model>, MatchError> {
    let txn = db.begin().await?;

    let claimed = ticket::Entity::find()
        .filter(ticket::Column::Status.eq(TicketStatus::Waiting))
        .order_by_asc(ticket::Column::CreatedAt)
        .order_by_asc(ticket::Column::Id)
        .limit(2)
        .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
        .all(&txn)
        .await?;

    let [first, second] = claimed.as_slice() else {
        txn.rollback().await?;
        debug!(claimed = claimed.len(), "Not enough waiting tickets");
        return Ok(None);
    };

    if first.user_id == second.user_id {
        txn.rollback().await?;
        return Err(MatchError::Conflict(format!(
            "User {} holds two waiting tickets",
            first.user_id
        )));
    }

    let Some(problem) = pick_random_problem(&txn).await? else {
        txn.rollback().await?;
        error!("No problems available, cannot create battle");
        return Ok(None);
    };

    let battle = battle::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_a_id: Set(first.user_id),
        user_b_id: Set(second.user_id),
        status: Set(BattleStatus::Live),
        winner_id: Set(None),
        problem_id: Set(problem.id),
        started_at: Set(Utc::now()),
        ended_at: Set(None),
    }
    .insert(&txn)
    .await?;

    for claimed_ticket in [first, second] {
        let updated = ticket::Entity::update_many()
            .col_expr(ticket::Column::Status, Expr::value(TicketStatus::Matched))
            .col_expr(ticket::Column::BattleId, Expr::value(Some(battle.id.clone())))
            .filter(ticket::Column::Id.eq(claimed_ticket.id))
            .filter(ticket::Column::Status.eq(TicketStatus::Waiting))
            .exec(&txn)
            .await?;

        // Engines without row locks fall through to here on a lost race.
        if updated.rows_affected != 1 {
            txn.rollback().await?;
            return Err(MatchError::Contention);
        }
    }

    txn.commit().await?;

    info!(
        battle_id = %battle.id,
        user_a = battle.user_a_id,
        user_b = battle.user_b_id,
        problem_id = battle.problem_id,
        "Battle created"
    );

    Ok(Some(battle))
}

/// Uniformly random problem, or `None` when the catalogue is empty.
async fn pick_random_problem<C: ConnectionTrait>(db: &C) -> Result<Option<problem::Model>, DbErr> {
    let count = problem::Entity::find().count(db).await?;
    if count == 0 {
        return Ok(None);
    }

    let offset = rand::rng().random_range(0..count);

    problem::Entity::find()
        .order_by_asc(problem::Column::Id)
        .offset(offset)
        .one(db)
        .await
}

/// Run up to `max_pairs` pairing attempts, stopping once nothing is left to pair.
///
/// A failed attempt is logged and the next one proceeds. Returns the number of
/// battles created.
#[instrument(skip(db, queue))]
pub async fn run_pairing_cycle(
    db: &DatabaseConnection,
    queue: &dyn WaitingQueue,
    max_pairs: usize,
) -> usize {
    let mut created = 0;

    for attempt in 1..=max_pairs {
        match try_pair_once(db).await {
            Ok(Some(battle)) => {
                created += 1;
                forget_paired(queue, &battle).await;
            }
            Ok(None) => break,
            Err(e) => warn!(attempt, error = %e, "Pairing attempt failed"),
        }
    }

    if created > 0 {
        info!(created, "Pairing cycle finished");
    }

    created
}

/// Drop both participants from the waiting queue hint.
pub async fn forget_paired(queue: &dyn WaitingQueue, battle: &battle::Model) {
    for user_id in [battle.user_a_id, battle.user_b_id] {
        if let Err(e) = queue.dequeue(user_id).await {
            warn!(
                user_id,
                backend = queue.backend(),
                error = %e,
                "Failed to update waiting queue"
            );
        }
    }
}
