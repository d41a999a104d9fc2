use super::handlers::analyze_food::{__path_analyze_food, MAX_IMAGE_SIZE, analyze_food};
use crate::application::http::server::app_state::AppState;
use axum::{Router, extract::DefaultBodyLimit, routing::post};
use utoipa::OpenApi;

/// Room for the text part and multipart framing on top of the image.
const MAX_BODY_SIZE: usize = MAX_IMAGE_SIZE + 1024 * 1024;

#[derive(OpenApi)]
#[openapi(paths(analyze_food))]
pub struct FoodAnalysisApiDoc;

pub fn food_analysis_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/analyze", state.args.server.root_path),
            post(analyze_food),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
