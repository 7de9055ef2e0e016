pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

pub use config::WorkerAppConfig;
pub use error::{Result, WorkerError};
pub use models::judge::{RunOutcome, Verifier};
pub use models::sandbox::{PistonSandbox, Sandbox, SandboxError};
