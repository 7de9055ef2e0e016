pub mod config;
pub mod judge_job;
pub mod judge_result;
pub mod status;
pub mod verdict;

pub use status::{BattleStatus, ParseStatusError, SubmissionStatus, TicketStatus};
pub use verdict::Verdict;
