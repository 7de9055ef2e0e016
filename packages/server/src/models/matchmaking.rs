use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct CycleResponse {
    #[schema(example = 1)]
    pub battles_created: usize,
}
