pub mod judge;
pub mod sandbox;
