use thiserror::Error;

/// Failure to obtain a usable answer from the sandbox.
///
/// Always judged as an internal error, never retried.
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Sandbox client initialization failed: {0}")]
    Initialization(String),

    #[error("Sandbox unreachable: {0}")]
    Transport(String),

    #[error("Sandbox did not answer within {0} ms")]
    Timeout(u64),

    #[error("Malformed sandbox response: {0}")]
    Malformed(String),
}
