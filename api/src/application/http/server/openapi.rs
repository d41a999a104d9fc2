use crate::application::http::{food_analysis::router::FoodAnalysisApiDoc, health::HealthApiDoc};
use incognito_core::domain::food_analysis::entities::{FoodCategory, HealthVerdict};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Incognito Health AI API"
    ),
    nest(
        (path = "/health", api = HealthApiDoc),
    ),
    components(schemas(HealthVerdict, FoodCategory))
)]
pub struct ApiDoc;

/// Full document: the analysis routes sit at the root, the rest is nested.
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDoc::openapi();
    openapi.merge(FoodAnalysisApiDoc::openapi());
    openapi
}
