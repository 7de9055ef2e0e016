use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(queue_routes())
        .merge(battle_routes())
        .merge(submission_routes())
        .routes(routes!(handlers::matchmaking::run_cycle))
}

fn queue_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::queue::join_queue))
        .routes(routes!(handlers::queue::leave_queue))
        .routes(routes!(handlers::queue::queue_status))
        .routes(routes!(handlers::queue::acknowledge))
}

fn battle_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::battle::enter_arena))
        .routes(routes!(handlers::battle::complete_battle))
}

fn submission_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::submission::create_submission))
        .routes(routes!(handlers::submission::get_submission))
        .routes(routes!(handlers::run::run_code))
}
