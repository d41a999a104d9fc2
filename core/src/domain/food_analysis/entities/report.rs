use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::generate_timestamp,
    food_analysis::{
        entities::category::FoodCategory,
        helpers::{clean_list, marketing_claims},
        value_objects::InputType,
    },
    product::entities::{Nutriments, ProductRecord, lenient_f64},
};

pub const OPENFOODFACTS_PRODUCT_URL: &str = "https://world.openfoodfacts.org/product";

/// Keys owned by the envelope; a verdict can never overwrite them.
const RESERVED_KEYS: [&str; 7] = [
    "status",
    "input",
    "product",
    "marketing",
    "images",
    "nutrition",
    "meta",
];

/// Outcome of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Report(Box<AnalysisReport>),
    Rejected(RejectedReport),
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnalysisReport {
    pub status: String,
    pub input: InputEcho,
    pub product: ProductSummary,
    pub marketing: Marketing,
    pub images: ImageReferences,
    pub nutrition: NutritionBlock,
    /// Verdict fields produced by the model, flattened into the envelope.
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub analysis: Map<String, Value>,
    pub meta: ReportMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RejectedReport {
    pub status: String,
    pub message: String,
    pub input: InputEcho,
    pub meta: ReportMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InputEcho {
    pub product_name: String,
    pub input_type: InputType,
    pub image_provided: bool,
    pub category: FoodCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductSummary {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub country: String,
    pub ingredients_text: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Marketing {
    pub labels: Vec<String>,
    pub claims: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImageReferences {
    pub input_image: Option<String>,
    pub reference_images: Vec<String>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NutritionBlock {
    pub per_100g: NutritionPer100g,
    pub source_url: String,
    pub data_confidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionPer100g {
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub energy_kcal: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub protein_g: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub carbs_g: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub sugar_g: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub fat_g: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub sat_fat_g: f64,
    #[serde(default, deserialize_with = "zero_if_absent")]
    pub sodium_mg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportMeta {
    pub data_source: String,
    pub analysis_type: String,
    pub confidence_level: String,
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
}

/// The natural food estimator's answer split into its three sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NaturalFoodEstimate {
    pub product_info: Map<String, Value>,
    pub nutrition_per_100g: NutritionPer100g,
    pub analysis: Map<String, Value>,
}

impl NutritionPer100g {
    pub fn from_nutriments(nutriments: &Nutriments) -> Self {
        Self {
            energy_kcal: nutriments.energy_kcal_100g.unwrap_or(0.0),
            protein_g: nutriments.proteins_100g.unwrap_or(0.0),
            carbs_g: nutriments.carbohydrates_100g.unwrap_or(0.0),
            sugar_g: nutriments.sugars_100g.unwrap_or(0.0),
            fat_g: nutriments.fat_100g.unwrap_or(0.0),
            sat_fat_g: nutriments.saturated_fat_100g.unwrap_or(0.0),
            sodium_mg: salt_to_sodium_mg(nutriments.salt_100g.unwrap_or(0.0)),
        }
    }
}

/// Salt grams per 100g to sodium milligrams, as reported by the service.
pub fn salt_to_sodium_mg(salt_100g: f64) -> f64 {
    salt_100g * 1000.0
}

impl NaturalFoodEstimate {
    /// Missing sections read as empty objects.
    pub fn from_json_object(mut object: Map<String, Value>) -> Self {
        let product_info = take_object(&mut object, "product_info");
        let nutrition = take_object(&mut object, "nutrition_per_100g");
        let analysis = take_object(&mut object, "analysis");

        Self {
            product_info,
            nutrition_per_100g: serde_json::from_value(Value::Object(nutrition))
                .unwrap_or_default(),
            analysis,
        }
    }

    fn info_str(&self, key: &str) -> Option<String> {
        self.product_info
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl ReportMeta {
    fn new(data_source: &str, analysis_type: &str, confidence_level: &str) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            data_source: data_source.to_string(),
            analysis_type: analysis_type.to_string(),
            confidence_level: confidence_level.to_string(),
            analysis_id: Uuid::new_v7(timestamp),
            analyzed_at: now,
        }
    }
}

impl AnalysisReport {
    pub fn packaged(
        input: InputEcho,
        product: &ProductRecord,
        verdict: Map<String, Value>,
        input_image: Option<String>,
    ) -> Self {
        let labels = clean_list(&product.labels_tags);
        let claims = marketing_claims(&labels);
        let name = product
            .product_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| input.product_name.clone());

        Self {
            status: "success".to_string(),
            product: ProductSummary {
                name,
                brand: product.brand().to_string(),
                category: product.primary_category(),
                country: product.country().to_string(),
                ingredients_text: product
                    .ingredients_text
                    .clone()
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| "Ingredients not found.".to_string()),
                image_url: product.front_image_url(),
            },
            marketing: Marketing { labels, claims },
            images: ImageReferences {
                input_image,
                reference_images: product.reference_images(),
                source: "openfoodfacts".to_string(),
            },
            nutrition: NutritionBlock {
                per_100g: NutritionPer100g::from_nutriments(&product.nutriments),
                source_url: format!(
                    "{}/{}",
                    OPENFOODFACTS_PRODUCT_URL,
                    product.code.as_deref().unwrap_or_default()
                ),
                data_confidence: "high".to_string(),
            },
            analysis: without_reserved_keys(verdict),
            meta: ReportMeta::new("OpenFoodFacts", "AI-interpreted", "medium"),
            input,
        }
    }

    pub fn natural(
        input: InputEcho,
        estimate: NaturalFoodEstimate,
        input_image: Option<String>,
    ) -> Self {
        let image_url = estimate.info_str("image_url").unwrap_or_default();
        let encoded_query = urlencoding::encode(&input.product_name).into_owned();

        Self {
            status: "success".to_string(),
            product: ProductSummary {
                name: input.product_name.clone(),
                brand: "Natural / Generic".to_string(),
                category: estimate
                    .info_str("category")
                    .unwrap_or_else(|| "Natural".to_string()),
                country: "Global".to_string(),
                ingredients_text: estimate
                    .info_str("ingredients_text")
                    .unwrap_or_else(|| "Natural - Single Ingredient".to_string()),
                image_url: image_url.clone(),
            },
            marketing: Marketing {
                labels: vec![
                    "Natural".to_string(),
                    "Whole Food".to_string(),
                    "Unprocessed".to_string(),
                ],
                claims: vec!["No additives".to_string(), "Fresh".to_string()],
            },
            images: ImageReferences {
                input_image,
                reference_images: vec![image_url],
                source: "Google Knowledge Graph".to_string(),
            },
            nutrition: NutritionBlock {
                per_100g: estimate.nutrition_per_100g,
                source_url: format!(
                    "https://www.google.com/search?q={}+nutrition",
                    encoded_query
                ),
                data_confidence: "high (estimated)".to_string(),
            },
            analysis: without_reserved_keys(estimate.analysis),
            meta: ReportMeta::new(
                "AI Knowledge Base (Simulated Google Search)",
                "Natural Food Analysis",
                "estimated",
            ),
            input,
        }
    }
}

impl RejectedReport {
    pub fn non_food(input: InputEcho) -> Self {
        Self {
            status: "error: data not found".to_string(),
            message: format!("'{}' does not look like a food item", input.product_name),
            input,
            meta: ReportMeta::new("none", "Rejected", "none"),
        }
    }
}

fn take_object(object: &mut Map<String, Value>, key: &str) -> Map<String, Value> {
    match object.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    }
}

fn without_reserved_keys(mut analysis: Map<String, Value>) -> Map<String, Value> {
    for key in RESERVED_KEYS {
        analysis.remove(key);
    }
    analysis
}

fn zero_if_absent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}
