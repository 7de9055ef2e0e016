use axum::Json;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::matchmaking::run_pairing_cycle;
use crate::models::matchmaking::CycleResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/matchmaking/cycle",
    tag = "Matchmaking",
    operation_id = "runPairingCycle",
    summary = "Run a pairing cycle now",
    description = "Pairs waiting tickets until none are left or the per-cycle cap is reached. Operators only.",
    responses(
        (status = 200, description = "Cycle finished", body = CycleResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn run_cycle(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CycleResponse>, AppError> {
    auth_user.require_operator()?;

    let battles_created = run_pairing_cycle(
        &state.db,
        state.waiting_queue.as_ref(),
        state.config.matchmaking.max_pairs_per_cycle,
    )
    .await;

    Ok(Json(CycleResponse { battles_created }))
}
