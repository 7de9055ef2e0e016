//! Ticket pairing and the battle lifecycle.
//!
//! The ticket table is the only source of truth for who is waiting. The
//! waiting queue hint store is updated alongside it on a best-effort basis.

mod error;
pub mod lifecycle;
pub mod pairing;
pub mod scheduler;

pub use error::MatchError;
pub use lifecycle::{
    Arena, PollStatus, acknowledge, cancel_ticket, complete_battle, enter_arena, join_queue,
    open_ticket, poll_status,
};
pub use pairing::{run_pairing_cycle, try_pair_once};
pub use scheduler::{restore_waiting_queue, run_pairing_scheduler};
