use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::run::*;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/run",
    tag = "Submissions",
    operation_id = "runCode",
    summary = "Run code against custom input",
    description = "Executes the code once with the given stdin and returns the raw output. No verdict is computed and nothing is stored.",
    request_body = RunRequest,
    responses(
        (status = 200, description = "Program output", body = RunResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, language = %payload.language))]
pub async fn run_code(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RunRequest>,
) -> Result<Json<RunResponse>, AppError> {
    payload.validate()?;

    let outcome = state
        .verifier
        .run_custom(
            &payload.language,
            payload.version.as_deref(),
            &payload.code,
            &payload.stdin,
        )
        .await;

    Ok(Json(outcome.into()))
}
