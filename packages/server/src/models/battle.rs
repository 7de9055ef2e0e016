use chrono::{DateTime, Utc};
use common::BattleStatus;
use serde::{Deserialize, Serialize};

use crate::entity::problem::Difficulty;
use crate::entity::{battle, problem, sample_case};
use crate::matchmaking::Arena;

#[derive(Serialize, utoipa::ToSchema)]
pub struct BattleResponse {
    pub id: String,
    pub user_a_id: i32,
    pub user_b_id: i32,
    pub status: BattleStatus,
    pub winner_id: Option<i32>,
    pub problem_id: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<battle::Model> for BattleResponse {
    fn from(m: battle::Model) -> Self {
        Self {
            id: m.id,
            user_a_id: m.user_a_id,
            user_b_id: m.user_b_id,
            status: m.status,
            winner_id: m.winner_id,
            problem_id: m.problem_id,
            started_at: m.started_at,
            ended_at: m.ended_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProblemSummary {
    pub id: i32,
    pub title: String,
    pub difficulty: Difficulty,
}

impl From<problem::Model> for ProblemSummary {
    fn from(m: problem::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            difficulty: m.difficulty,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SampleResponse {
    pub position: i32,
    pub input: String,
    pub expected_output: String,
}

impl From<sample_case::Model> for SampleResponse {
    fn from(m: sample_case::Model) -> Self {
        Self {
            position: m.position,
            input: m.input,
            expected_output: m.expected_output,
        }
    }
}

/// A live battle as seen by a participant.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ArenaResponse {
    pub battle: BattleResponse,
    pub problem: ProblemSummary,
    pub samples: Vec<SampleResponse>,
}

impl From<Arena> for ArenaResponse {
    fn from(arena: Arena) -> Self {
        Self {
            battle: arena.battle.into(),
            problem: arena.problem.into(),
            samples: arena.samples.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct CompleteBattleRequest {
    /// One of the two participants, or absent for no winner.
    pub winner_id: Option<i32>,
}
