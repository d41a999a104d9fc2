use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use incognito_core::domain::food_analysis::{
    entities::AnalysisOutcome,
    ports::FoodAnalysisService,
    value_objects::{AnalyzeFoodInput, UploadedImage},
};
use validator::Validate;

use crate::application::http::{
    food_analysis::validators::AnalyzeFoodForm,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse},
            response::Response,
        },
        app_state::AppState,
    },
};

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// A body over the router limit surfaces here as a read error with status 413.
fn multipart_error(context: &str, error: MultipartError) -> ApiError {
    let message = format!("{}: {}", context, error.body_text());
    match error.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(message),
        _ => ApiError::BadRequest(message),
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    tag = "food-analysis",
    summary = "Analyze a food product",
    description = "Analyzes a product by name or photo. The name wins when both are sent. Non-food input returns a 200 with status `error: data not found`.",
    request_body(content = AnalyzeFoodForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = AnalysisOutcome),
        (status = 400, body = ApiErrorResponse, description = "Neither product_name nor image provided"),
        (status = 404, body = ApiErrorResponse, description = "Product not found"),
        (status = 413, body = ApiErrorResponse, description = "Image too large"),
        (status = 500, body = ApiErrorResponse, description = "AI analysis failed"),
    ),
)]
pub async fn analyze_food(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<AnalysisOutcome>, ApiError> {
    let mut form = AnalyzeFoodForm::default();
    let mut image_mime_type: Option<String> = None;
    let mut image_file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart field", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "product_name" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| multipart_error("Failed to read product_name", e))?;
                form.product_name = Some(value);
            }
            "image" => {
                image_mime_type = field.content_type().map(str::to_string);
                image_file_name = field.file_name().map(str::to_string);

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error("Failed to read image", e))?;

                if data.len() > MAX_IMAGE_SIZE {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "Image too large. Max size is {} bytes",
                        MAX_IMAGE_SIZE
                    )));
                }

                // browsers send an empty part when no file was picked
                form.image = (!data.is_empty()).then(|| data.to_vec());
            }
            _ => {}
        }
    }

    form.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let input = AnalyzeFoodInput {
        product_name: form.product_name,
        image: form
            .image
            .map(|data| UploadedImage::new(data, image_mime_type, image_file_name)),
    };

    let outcome = state
        .service
        .analyze_food(input)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(outcome))
}
