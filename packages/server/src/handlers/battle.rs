use axum::Json;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::matchmaking::{self, lifecycle::find_battle};
use crate::models::battle::*;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/battles/{id}",
    tag = "Battles",
    operation_id = "enterArena",
    summary = "Enter a battle",
    description = "Returns a live battle with its problem and sample cases. Only the two participants can see it; anyone else gets `NOT_FOUND`.",
    params(("id" = String, Path, description = "Battle ID")),
    responses(
        (status = 200, description = "Battle arena", body = ArenaResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Battle not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Battle has ended (ALREADY_DONE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn enter_arena(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArenaResponse>, AppError> {
    let battle = find_battle(&state.db, &id).await?;
    if !battle.has_participant(auth_user.user_id) {
        return Err(AppError::NotFound("Battle not found".into()));
    }

    let arena = matchmaking::enter_arena(&state.db, &id).await?;
    Ok(Json(arena.into()))
}

#[utoipa::path(
    post,
    path = "/battles/{id}/complete",
    tag = "Battles",
    operation_id = "completeBattle",
    summary = "End a battle",
    description = "Moves a live battle to done and records the optional winner, who must be a participant. Operators only.",
    params(("id" = String, Path, description = "Battle ID")),
    request_body = CompleteBattleRequest,
    responses(
        (status = 200, description = "Battle completed", body = BattleResponse),
        (status = 400, description = "Winner is not a participant (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Battle not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Battle has ended (ALREADY_DONE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn complete_battle(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CompleteBattleRequest>,
) -> Result<Json<BattleResponse>, AppError> {
    auth_user.require_operator()?;

    let battle = matchmaking::complete_battle(&state.db, &id, payload.winner_id).await?;
    Ok(Json(battle.into()))
}
