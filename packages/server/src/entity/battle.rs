use common::BattleStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "battle")]
pub struct Model {
    /// Opaque token (UUID v4) handed to both participants.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub user_a_id: i32,
    pub user_b_id: i32,
    pub status: BattleStatus,
    /// Set only by an explicit completion; always one of the two participants.
    pub winner_id: Option<i32>,

    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    pub started_at: DateTimeUtc,
    /// Set iff the battle is done.
    pub ended_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_participant(&self, user_id: i32) -> bool {
        self.user_a_id == user_id || self.user_b_id == user_id
    }
}
