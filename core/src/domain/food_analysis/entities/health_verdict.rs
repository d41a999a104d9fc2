use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::common::entities::app_errors::CoreError;

/// Typed shape of the verdict the model is asked to produce.
///
/// Verdicts travel through the service as raw JSON objects; this type is only
/// used when strict schema validation is enabled and for the OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthVerdict {
    pub verdict: Verdict,
    pub overall_score: OverallScore,
    pub nutrition_score: NutritionScore,
    pub key_takeaways: KeyTakeaways,
    pub age_suitability: AgeSuitability,
    pub health_suitability: HealthSuitability,
    pub ai_opinion: AiOpinion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub label: VerdictLabel,
    pub headline: String,
    pub subtext: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    Safe,
    OccasionallySafe,
    NotSafe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OverallScore {
    pub percent: f64,
    pub interpretation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NutritionScore {
    pub grade: NutritionGrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum NutritionGrade {
    A,
    B,
    C,
    D,
    E,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeyTakeaways {
    pub possible_concern: String,
    pub generally_safe: String,
    pub depends_on_use: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AgeSuitability {
    pub children_0_12: String,
    pub young_12_45: String,
    pub adults_45_plus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthSuitability {
    pub diabetes: String,
    pub heart: String,
    pub weight: String,
    pub normal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AiOpinion {
    pub text: String,
}

impl HealthVerdict {
    /// Checks a raw verdict object against the typed schema.
    pub fn from_json_object(
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, CoreError> {
        let verdict: HealthVerdict =
            serde_json::from_value(serde_json::Value::Object(object.clone())).map_err(|e| {
                CoreError::GenerationFailed(format!("verdict does not match schema: {}", e))
            })?;

        if !(0.0..=100.0).contains(&verdict.overall_score.percent) {
            return Err(CoreError::GenerationFailed(format!(
                "overall score out of range: {}",
                verdict.overall_score.percent
            )));
        }

        Ok(verdict)
    }
}
