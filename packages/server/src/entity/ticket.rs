use common::TicketStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's place in the matchmaking queue.
///
/// `battle_id` is set exactly when the status is `matched`. At most one
/// waiting ticket exists per user (partial unique index, see `seed::ensure_indexes`).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ticket")]
pub struct Model {
    /// Doubles as the insertion sequence for tie-breaking equal timestamps.
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(indexed)]
    pub user_id: i32,
    pub status: TicketStatus,
    pub battle_id: Option<String>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
