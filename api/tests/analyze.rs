use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_test::{
    TestServer,
    multipart::{MultipartForm, Part},
};
use clap::Parser;
use incognito_api::{
    application::http::server::http_server::{router, state},
    args::Args,
};
use serde_json::{Value, json};
use test_context::{AsyncTestContext, test_context};
use tokio::{net::TcpListener, task::JoinHandle};

/// base64 of `horlicks-photo`
const HORLICKS_PHOTO_B64: &str = "aG9ybGlja3MtcGhvdG8=";

#[derive(Default)]
struct UpstreamCalls {
    model_list: AtomicUsize,
    generate: AtomicUsize,
    product_search: AtomicUsize,
}

struct IncognitoContext {
    server: TestServer,
    calls: Arc<UpstreamCalls>,
    upstream_task: JoinHandle<()>,
}

fn gemini_text(text: &str) -> Json<Value> {
    Json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

fn verdict() -> Value {
    json!({
        "verdict": { "label": "occasionally_safe", "headline": "OCCASIONALLY SAFE", "subtext": "High in sugar" },
        "overall_score": { "percent": 55, "interpretation": "Fine now and then" },
        "nutrition_score": { "grade": "C" },
        "key_takeaways": {
            "possible_concern": "Added sugar",
            "generally_safe": "Fortified with vitamins",
            "depends_on_use": "Serving size matters"
        },
        "age_suitability": {
            "children_0_12": "Small servings",
            "young_12_45": "Occasionally",
            "adults_45_plus": "Watch sugar"
        },
        "health_suitability": {
            "diabetes": "Avoid",
            "heart": "Moderate",
            "weight": "Limit",
            "normal": "Occasionally"
        },
        "ai_opinion": { "text": "A treat rather than a staple." }
    })
}

fn classify(prompt: &str) -> &'static str {
    let query = prompt
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix("Input: "))
        .unwrap_or_default();

    match query {
        "Apple" | "Banana" => "natural_food",
        "Bus" | "Laptop" => "non_food",
        _ => "packaged_food",
    }
}

async fn list_models(State(calls): State<Arc<UpstreamCalls>>) -> Json<Value> {
    calls.model_list.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "models": [
            { "name": "models/embedding-001" },
            { "name": "models/gemini-1.5-pro" },
            { "name": "models/gemini-2.0-flash" }
        ]
    }))
}

async fn generate_content(
    State(calls): State<Arc<UpstreamCalls>>,
    Json(request): Json<Value>,
) -> Json<Value> {
    calls.generate.fetch_add(1, Ordering::SeqCst);

    let parts = request["contents"][0]["parts"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    let prompt = parts
        .iter()
        .find_map(|part| part["text"].as_str())
        .unwrap_or_default()
        .to_string();

    if let Some(image) = parts.iter().find_map(|part| part["inline_data"]["data"].as_str()) {
        let answer = if image == HORLICKS_PHOTO_B64 {
            "Horlicks"
        } else {
            "Unknown Product"
        };
        return gemini_text(answer);
    }

    if prompt.starts_with("Classify the input") {
        return gemini_text(classify(&prompt));
    }

    if prompt.contains("natural food item") {
        let estimate = json!({
            "product_info": {
                "brand": "Nature",
                "category": "Fruit",
                "ingredients_text": "100% Apple",
                "image_url": "https://www.google.com/search?tbm=isch&q=Apple"
            },
            "nutrition_per_100g": {
                "energy_kcal": 52, "protein_g": 0.3, "carbs_g": 14, "sugar_g": 10,
                "fat_g": 0.2, "sat_fat_g": 0.0, "sodium_mg": 1
            },
            "analysis": verdict()
        });
        return gemini_text(&format!("```json\n{}\n```", estimate));
    }

    gemini_text(&verdict().to_string())
}

async fn search_products(
    State(calls): State<Arc<UpstreamCalls>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    calls.product_search.fetch_add(1, Ordering::SeqCst);

    let products = match params.get("search_terms").map(String::as_str) {
        Some("Horlicks") => json!([{
            "code": "8901571004025",
            "product_name": "Horlicks Classic Malt",
            "brands": "Horlicks",
            "categories": "Beverages, Malt drinks",
            "countries": "India",
            "ingredients_text": "Malted barley, wheat flour, milk solids",
            "nutriments": {
                "energy-kcal_100g": 377,
                "proteins_100g": 11,
                "carbohydrates_100g": 78,
                "sugars_100g": "32",
                "fat_100g": 2,
                "saturated-fat_100g": 1,
                "salt_100g": 1.2
            },
            "labels_tags": ["en:no-added-preservatives", "en:gluten-free", "en:vegetarian"],
            "additives_tags": [],
            "categories_tags": ["en:beverages", "en:malt-drinks"],
            "nova_group": 4,
            "image_front_url": "https://images.openfoodfacts.org/horlicks-front.jpg"
        }]),
        _ => json!([]),
    };

    Json(json!({ "count": products.as_array().map(Vec::len), "products": products }))
}

impl AsyncTestContext for IncognitoContext {
    async fn setup() -> IncognitoContext {
        let calls = Arc::new(UpstreamCalls::default());

        let upstream = Router::new()
            .route("/v1beta/models", get(list_models))
            .route("/v1beta/models/{action}", post(generate_content))
            .route("/cgi/search.pl", get(search_products))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let upstream_url = format!("http://{}", listener.local_addr().unwrap());
        let upstream_task = tokio::spawn(async move {
            axum::serve(listener, upstream).await.unwrap();
        });

        let args = Args::parse_from([
            "incognito",
            "--gemini-api-key",
            "test-key",
            "--gemini-base-url",
            upstream_url.as_str(),
            "--openfoodfacts-base-url",
            upstream_url.as_str(),
            "--metrics-enabled",
            "false",
        ]);

        let app_state = state(Arc::new(args)).await.unwrap();
        let server = TestServer::new(router(app_state).unwrap()).unwrap();

        IncognitoContext {
            server,
            calls,
            upstream_task,
        }
    }

    async fn teardown(self) {
        self.upstream_task.abort();
    }
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_model_is_discovered_once_at_startup(ctx: &mut IncognitoContext) {
    let response = ctx.server.get("/health/ready").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["model"], "gemini-2.0-flash");
    assert_eq!(ctx.calls.model_list.load(Ordering::SeqCst), 1);

    ctx.server.get("/health/live").await.assert_status_ok();
    assert_eq!(ctx.calls.model_list.load(Ordering::SeqCst), 1);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_missing_input_is_rejected_without_upstream_calls(ctx: &mut IncognitoContext) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_text("product_name", "   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "E_BAD_REQUEST");
    assert_eq!(body["status"], 400);
    assert_eq!(body["message"], "Provide product name or image");

    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 0);
    assert_eq!(ctx.calls.product_search.load(Ordering::SeqCst), 0);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_packaged_product_by_name(ctx: &mut IncognitoContext) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_text("product_name", "Horlicks"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["status"], "success");
    assert_eq!(body["input"]["input_type"], "text");
    assert_eq!(body["input"]["category"], "packaged_food");
    assert_eq!(body["product"]["name"], "Horlicks Classic Malt");
    assert_eq!(body["product"]["brand"], "Horlicks");
    assert_eq!(body["product"]["category"], "Beverages");
    assert_eq!(body["nutrition"]["per_100g"]["sodium_mg"].as_f64(), Some(1200.0));
    assert_eq!(body["nutrition"]["per_100g"]["sugar_g"].as_f64(), Some(32.0));
    assert_eq!(
        body["nutrition"]["source_url"],
        "https://world.openfoodfacts.org/product/8901571004025"
    );
    assert_eq!(
        body["marketing"]["claims"],
        json!(["No Added Preservatives", "Gluten Free"])
    );
    assert_eq!(body["verdict"]["label"], "occasionally_safe");
    assert_eq!(body["meta"]["data_source"], "OpenFoodFacts");
    assert_eq!(body["meta"]["confidence_level"], "medium");

    assert_eq!(ctx.calls.product_search.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 2);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_natural_food_skips_product_lookup(ctx: &mut IncognitoContext) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_text("product_name", "Apple"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["input"]["category"], "natural_food");
    assert_eq!(body["product"]["brand"], "Natural / Generic");
    assert_eq!(body["product"]["category"], "Fruit");
    assert_eq!(body["nutrition"]["per_100g"]["energy_kcal"].as_f64(), Some(52.0));
    assert_eq!(body["nutrition"]["data_confidence"], "high (estimated)");
    assert_eq!(body["meta"]["confidence_level"], "estimated");
    assert_eq!(body["ai_opinion"]["text"], "A treat rather than a staple.");

    assert_eq!(ctx.calls.product_search.load(Ordering::SeqCst), 0);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_non_food_returns_soft_rejection(ctx: &mut IncognitoContext) {
    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_text("product_name", "Bus"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["status"], "error: data not found");
    assert_eq!(body["input"]["category"], "non_food");
    assert!(body.get("product").is_none());

    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.calls.product_search.load(Ordering::SeqCst), 0);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_image_only_is_recognised(ctx: &mut IncognitoContext) {
    let photo = Part::bytes(b"horlicks-photo".to_vec())
        .file_name("shelf.jpg")
        .mime_type("image/jpeg");

    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_part("image", photo))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["input"]["product_name"], "Horlicks");
    assert_eq!(body["input"]["input_type"], "image");
    assert_eq!(body["input"]["image_provided"], true);
    assert_eq!(body["images"]["input_image"], "shelf.jpg");
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_unrecognised_image_is_not_found(ctx: &mut IncognitoContext) {
    let photo = Part::bytes(b"blurry-photo".to_vec())
        .file_name("blurry.jpg")
        .mime_type("image/jpeg");

    let response = ctx
        .server
        .post("/analyze")
        .multipart(MultipartForm::new().add_part("image", photo))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "E_NOT_FOUND");
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_text_wins_over_image(ctx: &mut IncognitoContext) {
    let photo = Part::bytes(b"blurry-photo".to_vec()).mime_type("image/png");

    let response = ctx
        .server
        .post("/analyze")
        .multipart(
            MultipartForm::new()
                .add_text("product_name", "Horlicks")
                .add_part("image", photo),
        )
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["input"]["product_name"], "Horlicks");
    assert_eq!(body["input"]["input_type"], "image");
    assert_eq!(body["input"]["image_provided"], true);

    // the photo is never sent to the model
    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 2);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_openapi_document_is_served(ctx: &mut IncognitoContext) {
    let response = ctx.server.get("/api-docs/openapi.json").await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert!(body["paths"]["/analyze"]["post"].is_object());
}

async fn post_image_of_size(ctx: &IncognitoContext, size: usize) -> axum_test::TestResponse {
    let photo = Part::bytes(vec![0u8; size])
        .file_name("huge.jpg")
        .mime_type("image/jpeg");

    ctx.server
        .post("/analyze")
        .multipart(MultipartForm::new().add_part("image", photo))
        .await
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_image_over_limit_is_payload_too_large(ctx: &mut IncognitoContext) {
    let response = post_image_of_size(ctx, 10 * 1024 * 1024 + 512 * 1024).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["code"], "E_PAYLOAD_TOO_LARGE");
    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 0);
}

#[test_context(IncognitoContext)]
#[tokio::test]
async fn test_body_over_router_limit_is_payload_too_large(ctx: &mut IncognitoContext) {
    let response = post_image_of_size(ctx, 12 * 1024 * 1024).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["code"], "E_PAYLOAD_TOO_LARGE");
    assert_eq!(ctx.calls.generate.load(Ordering::SeqCst), 0);
}
