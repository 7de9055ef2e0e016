use chrono::Utc;
use common::{BattleStatus, TicketStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use tracing::{info, instrument};

use super::MatchError;
use crate::entity::{battle, problem, sample_case, ticket};

/// Whether the caller has been paired yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStatus {
    NotFound,
    Found { battle_id: String },
}

/// Everything a participant needs to start solving.
#[derive(Debug, Clone)]
pub struct Arena {
    pub battle: battle::Model,
    pub problem: problem::Model,
    pub samples: Vec<sample_case::Model>,
}

fn already_waiting() -> MatchError {
    MatchError::Conflict("Already waiting in the matchmaking queue".into())
}

/// Create a waiting ticket for the user.
#[instrument(skip(db))]
pub async fn join_queue(db: &DatabaseConnection, user_id: i32) -> Result<ticket::Model, MatchError> {
    if let Some(open) = open_ticket(db, user_id).await? {
        return Err(match open.battle_id {
            Some(battle_id) if open.status == TicketStatus::Matched => MatchError::Conflict(
                format!("Already matched to battle {battle_id}, acknowledge it first"),
            ),
            _ => already_waiting(),
        });
    }

    let ticket = ticket::ActiveModel {
        user_id: Set(user_id),
        status: Set(TicketStatus::Waiting),
        battle_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| match e.sql_err() {
        // A concurrent join won the partial unique index.
        Some(SqlErr::UniqueConstraintViolation(_)) => already_waiting(),
        _ => MatchError::Db(e),
    })?;

    info!(ticket_id = ticket.id, "Joined matchmaking queue");
    Ok(ticket)
}

impl PollStatus {
    pub fn from_ticket(ticket: Option<&ticket::Model>) -> Self {
        match ticket {
            Some(ticket::Model {
                status: TicketStatus::Matched,
                battle_id: Some(battle_id),
                ..
            }) => PollStatus::Found {
                battle_id: battle_id.clone(),
            },
            _ => PollStatus::NotFound,
        }
    }
}

/// The user's waiting or matched ticket, if any. Never writes.
pub async fn open_ticket(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<ticket::Model>, MatchError> {
    let open = ticket::Entity::find()
        .filter(ticket::Column::UserId.eq(user_id))
        .filter(ticket::Column::Status.is_in([TicketStatus::Waiting, TicketStatus::Matched]))
        .order_by_desc(ticket::Column::Id)
        .one(db)
        .await?;
    Ok(open)
}

/// Look up the battle the user was matched into. Never writes.
#[instrument(skip(db))]
pub async fn poll_status(db: &DatabaseConnection, user_id: i32) -> Result<PollStatus, MatchError> {
    let open = open_ticket(db, user_id).await?;
    Ok(PollStatus::from_ticket(open.as_ref()))
}

/// Consume the user's matched ticket for `battle_id`.
#[instrument(skip(db))]
pub async fn acknowledge(
    db: &DatabaseConnection,
    user_id: i32,
    battle_id: &str,
) -> Result<(), MatchError> {
    let deleted = ticket::Entity::delete_many()
        .filter(ticket::Column::UserId.eq(user_id))
        .filter(ticket::Column::BattleId.eq(battle_id))
        .filter(ticket::Column::Status.eq(TicketStatus::Matched))
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        return Err(MatchError::NotFound(
            "No matched ticket for this battle".into(),
        ));
    }

    info!("Match acknowledged");
    Ok(())
}

/// Load a live battle with its problem and samples. Never writes.
#[instrument(skip(db))]
pub async fn enter_arena(db: &DatabaseConnection, battle_id: &str) -> Result<Arena, MatchError> {
    let battle = find_battle(db, battle_id).await?;

    if battle.status == BattleStatus::Done {
        return Err(MatchError::AlreadyDone("Battle has already ended".into()));
    }

    let problem = problem::Entity::find_by_id(battle.problem_id)
        .one(db)
        .await?
        .ok_or_else(|| MatchError::NotFound("Problem not found".into()))?;

    let samples = load_samples(db, problem.id).await?;

    Ok(Arena {
        battle,
        problem,
        samples,
    })
}

/// Withdraw the user's waiting ticket.
///
/// Loses against a pairing that already claimed the ticket: on PostgreSQL the
/// delete waits for the pairing transaction and then finds the ticket matched.
#[instrument(skip(db))]
pub async fn cancel_ticket(db: &DatabaseConnection, user_id: i32) -> Result<(), MatchError> {
    let deleted = ticket::Entity::delete_many()
        .filter(ticket::Column::UserId.eq(user_id))
        .filter(ticket::Column::Status.eq(TicketStatus::Waiting))
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        return Err(MatchError::NotFound("No waiting ticket".into()));
    }

    info!("Left matchmaking queue");
    Ok(())
}

/// Move a live battle to done, optionally recording the winner.
#[instrument(skip(db))]
pub async fn complete_battle(
    db: &DatabaseConnection,
    battle_id: &str,
    winner_id: Option<i32>,
) -> Result<battle::Model, MatchError> {
    let battle = find_battle(db, battle_id).await?;

    if battle.status == BattleStatus::Done {
        return Err(MatchError::AlreadyDone("Battle has already ended".into()));
    }

    if let Some(winner) = winner_id
        && !battle.has_participant(winner)
    {
        return Err(MatchError::Invalid(format!(
            "User {winner} is not a participant of this battle"
        )));
    }

    let ended_at = Utc::now();
    let updated = battle::Entity::update_many()
        .col_expr(battle::Column::Status, Expr::value(BattleStatus::Done))
        .col_expr(battle::Column::WinnerId, Expr::value(winner_id))
        .col_expr(battle::Column::EndedAt, Expr::value(Some(ended_at)))
        .filter(battle::Column::Id.eq(battle_id))
        .filter(battle::Column::Status.eq(BattleStatus::Live))
        .exec(db)
        .await?;

    if updated.rows_affected == 0 {
        return Err(MatchError::AlreadyDone("Battle has already ended".into()));
    }

    info!(winner_id = ?winner_id, "Battle completed");

    Ok(battle::Model {
        status: BattleStatus::Done,
        winner_id,
        ended_at: Some(ended_at),
        ..battle
    })
}

pub async fn find_battle(db: &DatabaseConnection, battle_id: &str) -> Result<battle::Model, MatchError> {
    battle::Entity::find_by_id(battle_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| MatchError::NotFound("Battle not found".into()))
}

/// Sample cases of a problem in judging order.
pub async fn load_samples<C: ConnectionTrait>(
    db: &C,
    problem_id: i32,
) -> Result<Vec<sample_case::Model>, DbErr> {
    sample_case::Entity::find()
        .filter(sample_case::Column::ProblemId.eq(problem_id))
        .order_by_asc(sample_case::Column::Position)
        .order_by_asc(sample_case::Column::Id)
        .all(db)
        .await
}
