use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::TicketStatus;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{instrument, warn};

use crate::entity::ticket;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::matchmaking::{self, PollStatus, pairing::forget_paired};
use crate::models::queue::*;
use crate::models::shared::{StatusResponse, validate_battle_id};
use crate::state::AppState;

/// Advisory waiting-queue size. Falls back to counting waiting tickets when
/// the queue backend errors.
async fn queue_size(state: &AppState) -> Result<usize, AppError> {
    match state.waiting_queue.size().await {
        Ok(size) => Ok(size),
        Err(e) => {
            warn!(backend = state.waiting_queue.backend(), error = %e, "Waiting queue size unavailable");
            let count = ticket::Entity::find()
                .filter(ticket::Column::Status.eq(TicketStatus::Waiting))
                .count(&state.db)
                .await?;
            Ok(count as usize)
        }
    }
}

#[utoipa::path(
    post,
    path = "/queue/join",
    tag = "Queue",
    operation_id = "joinQueue",
    summary = "Join the matchmaking queue",
    description = "Creates a waiting ticket for the caller. Fails with `CONFLICT` if the caller is already waiting or holds an unacknowledged match.",
    responses(
        (status = 201, description = "Ticket created", body = JoinQueueResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Already queued or matched (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn join_queue(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = matchmaking::join_queue(&state.db, auth_user.user_id).await?;

    if let Err(e) = state.waiting_queue.enqueue(auth_user.user_id).await {
        warn!(backend = state.waiting_queue.backend(), error = %e, "Failed to update waiting queue");
    }

    let queue_size = queue_size(&state).await?;
    Ok((
        StatusCode::CREATED,
        Json(JoinQueueResponse::new(&ticket, queue_size)),
    ))
}

#[utoipa::path(
    post,
    path = "/queue/leave",
    tag = "Queue",
    operation_id = "leaveQueue",
    summary = "Leave the matchmaking queue",
    description = "Deletes the caller's waiting ticket. Fails with `NOT_FOUND` once the ticket has been matched.",
    responses(
        (status = 200, description = "Ticket canceled", body = StatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No waiting ticket (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn leave_queue(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, AppError> {
    matchmaking::cancel_ticket(&state.db, auth_user.user_id).await?;

    if let Err(e) = state.waiting_queue.dequeue(auth_user.user_id).await {
        warn!(backend = state.waiting_queue.backend(), error = %e, "Failed to update waiting queue");
    }

    Ok(Json(StatusResponse::new("canceled")))
}

#[utoipa::path(
    get,
    path = "/queue/status",
    tag = "Queue",
    operation_id = "queueStatus",
    summary = "Poll for a match",
    description = "Returns the battle the caller was paired into. While the caller is still waiting, a pairing attempt is made before answering.",
    responses(
        (status = 200, description = "Match status", body = QueueStatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn queue_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<QueueStatusResponse>, AppError> {
    let open = matchmaking::open_ticket(&state.db, auth_user.user_id).await?;
    let mut status = PollStatus::from_ticket(open.as_ref());

    if open.is_some_and(|t| t.status == TicketStatus::Waiting) {
        match matchmaking::try_pair_once(&state.db).await {
            Ok(Some(battle)) => {
                forget_paired(state.waiting_queue.as_ref(), &battle).await;
                status = matchmaking::poll_status(&state.db, auth_user.user_id).await?;
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "On-demand pairing failed"),
        }
    }

    let queue_size = match status {
        PollStatus::NotFound => queue_size(&state).await?,
        PollStatus::Found { .. } => 0,
    };

    Ok(Json(QueueStatusResponse::from_poll(status, queue_size)))
}

#[utoipa::path(
    post,
    path = "/queue/acknowledge",
    tag = "Queue",
    operation_id = "acknowledgeMatch",
    summary = "Acknowledge a match",
    description = "Consumes the caller's matched ticket for the given battle. A second acknowledgment fails with `NOT_FOUND`.",
    request_body = AcknowledgeRequest,
    responses(
        (status = 200, description = "Match acknowledged", body = StatusResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No matched ticket for this battle (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, battle_id = %payload.battle_id))]
pub async fn acknowledge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<AcknowledgeRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    validate_battle_id(&payload.battle_id)?;
    matchmaking::acknowledge(&state.db, auth_user.user_id, &payload.battle_id).await?;
    Ok(Json(StatusResponse::new("acknowledged")))
}
