pub mod battle;
pub mod problem;
pub mod sample_case;
pub mod submission;
pub mod ticket;
