pub mod battle;
pub mod matchmaking;
pub mod queue;
pub mod run;
pub mod submission;
