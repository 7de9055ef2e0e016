use common::{SubmissionStatus, Verdict};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,
    /// NULL for practice submissions outside a battle.
    pub battle_id: Option<String>,

    pub language: String,
    pub version: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub code: String,

    /// queued -> running -> done, guarded by conditional updates.
    pub status: SubmissionStatus,
    /// Written once, together with `status = done`.
    pub verdict: Option<Verdict>,
    pub message: Option<String>,
    /// 1-based index of the first failing sample.
    pub failing_sample: Option<i32>,
    pub exec_time_ms: Option<i32>,
    pub memory_kb: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub stdout: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub stderr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub compile_output: Option<String>,

    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    pub created_at: DateTimeUtc,
    /// Set on `queued -> running`; the stuck detector measures from here.
    pub dispatched_at: Option<DateTimeUtc>,
    pub judged_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
