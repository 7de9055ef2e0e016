use common::TicketStatus;
use serde::{Deserialize, Serialize};

use crate::entity::ticket;
use crate::matchmaking::PollStatus;

#[derive(Serialize, utoipa::ToSchema)]
pub struct JoinQueueResponse {
    #[schema(example = 42)]
    pub ticket_id: i32,
    pub status: TicketStatus,
    /// Advisory count of users waiting, including the caller.
    #[schema(example = 3)]
    pub queue_size: usize,
}

impl JoinQueueResponse {
    pub fn new(ticket: &ticket::Model, queue_size: usize) -> Self {
        Self {
            ticket_id: ticket.id,
            status: ticket.status,
            queue_size,
        }
    }
}

/// Poll result, tagged by `status`.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueueStatusResponse {
    /// Still waiting (or not queued at all).
    NotFound { queue_size: usize },
    /// Paired; acknowledge with this battle id.
    Found { battle_id: String },
}

impl QueueStatusResponse {
    pub fn from_poll(status: PollStatus, queue_size: usize) -> Self {
        match status {
            PollStatus::Found { battle_id } => Self::Found { battle_id },
            PollStatus::NotFound => Self::NotFound { queue_size },
        }
    }
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AcknowledgeRequest {
    #[schema(example = "7c9e6679-7425-40de-944b-e07fc1f90ae7")]
    pub battle_id: String,
}
