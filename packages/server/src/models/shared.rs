use serde::Serialize;

use crate::error::AppError;

/// Largest accepted source file, in bytes.
pub const MAX_CODE_BYTES: usize = 64 * 1024;
/// Largest accepted custom stdin, in bytes.
pub const MAX_STDIN_BYTES: usize = 64 * 1024;

/// Single-field acknowledgement body, e.g. `{"status": "canceled"}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    #[schema(example = "canceled")]
    pub status: String,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

/// Validate a sandbox language name (1-32 characters, lowercase ASCII, digits, `+`).
pub fn validate_language(language: &str) -> Result<(), AppError> {
    let valid = !language.is_empty()
        && language.len() <= 32
        && language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '+');
    if !valid {
        return Err(AppError::Validation(
            "Language must be 1-32 lowercase characters".into(),
        ));
    }
    Ok(())
}

/// Validate source code: non-blank and at most `MAX_CODE_BYTES`.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if code.trim().is_empty() {
        return Err(AppError::Validation("Code must not be empty".into()));
    }
    if code.len() > MAX_CODE_BYTES {
        return Err(AppError::Validation(format!(
            "Code exceeds {MAX_CODE_BYTES} bytes"
        )));
    }
    Ok(())
}

/// Validate an optional pinned version (non-blank when present).
pub fn validate_version(version: Option<&str>) -> Result<(), AppError> {
    if let Some(version) = version
        && (version.trim().is_empty() || version.len() > 32)
    {
        return Err(AppError::Validation(
            "Version must be 1-32 characters".into(),
        ));
    }
    Ok(())
}

/// Validate a battle id supplied in a body.
pub fn validate_battle_id(battle_id: &str) -> Result<(), AppError> {
    if battle_id.trim().is_empty() {
        return Err(AppError::Validation("battle_id must not be empty".into()));
    }
    Ok(())
}
