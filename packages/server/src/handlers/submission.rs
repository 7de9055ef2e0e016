use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::{BattleStatus, SubmissionStatus};
use sea_orm::*;
use tracing::{info, instrument};

use crate::entity::{battle, problem, submission};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::judging::dispatch_submission;
use crate::models::submission::*;
use crate::state::AppState;

/// Find a problem by ID or return 404.
async fn find_problem<C: ConnectionTrait>(db: &C, id: i32) -> Result<problem::Model, AppError> {
    problem::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Problem not found".into()))
}

/// Find a live battle the user takes part in.
async fn find_live_battle<C: ConnectionTrait>(
    db: &C,
    battle_id: &str,
    user_id: i32,
) -> Result<battle::Model, AppError> {
    let battle = battle::Entity::find_by_id(battle_id.to_string())
        .one(db)
        .await?
        .filter(|b| b.has_participant(user_id))
        .ok_or_else(|| AppError::NotFound("Battle not found".into()))?;

    if battle.status == BattleStatus::Done {
        return Err(AppError::AlreadyDone("Battle has already ended".into()));
    }
    Ok(battle)
}

#[utoipa::path(
    post,
    path = "/submissions",
    tag = "Submissions",
    operation_id = "createSubmission",
    summary = "Submit a solution",
    description = "Stores the submission as `queued` and hands it to a judge. Target either a live battle the caller takes part in (`battle_id`) or a problem directly (`problem_id`). Poll the submission for the verdict.",
    request_body = CreateSubmissionRequest,
    responses(
        (status = 202, description = "Submission accepted", body = SubmissionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Battle or problem not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Battle has ended (ALREADY_DONE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, language = %payload.language))]
pub async fn create_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (problem_id, battle_id) = match payload.validate()? {
        SubmissionTarget::Battle(battle_id) => {
            let battle = find_live_battle(&state.db, battle_id, auth_user.user_id).await?;
            (battle.problem_id, Some(battle.id))
        }
        SubmissionTarget::Practice(problem_id) => {
            let problem = find_problem(&state.db, problem_id).await?;
            (problem.id, None)
        }
    };

    let model = submission::ActiveModel {
        user_id: Set(auth_user.user_id),
        battle_id: Set(battle_id),
        problem_id: Set(problem_id),
        language: Set(payload.language),
        version: Set(payload.version),
        code: Set(payload.code),
        status: Set(SubmissionStatus::Queued),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    info!(submission_id = model.id, problem_id, "Submission accepted");

    dispatch_submission(&state, &model).await?;

    Ok((StatusCode::ACCEPTED, Json(SubmissionResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}",
    tag = "Submissions",
    operation_id = "getSubmission",
    summary = "Get a submission",
    description = "Returns the caller's submission with its verdict once judged. Other users' submissions are reported as `NOT_FOUND`; operators can read any submission.",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission", body = SubmissionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Submission not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_submission(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let visible = |s: &submission::Model| {
        s.user_id == auth_user.user_id || auth_user.require_operator().is_ok()
    };

    let sub = submission::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .filter(visible)
        .ok_or_else(|| AppError::NotFound("Submission not found".into()))?;

    Ok(Json(sub.into()))
}
