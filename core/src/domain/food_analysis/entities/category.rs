use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::food_analysis::helpers::clean_json_text;

static CATEGORY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(packaged_food|natural_food|non_food)\b").expect("valid category regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    #[default]
    PackagedFood,
    NaturalFood,
    NonFood,
}

impl FoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoodCategory::PackagedFood => "packaged_food",
            FoodCategory::NaturalFood => "natural_food",
            FoodCategory::NonFood => "non_food",
        }
    }

    /// Reads a classifier answer. Code fences are stripped and the first known
    /// category token wins; anything unrecognised falls back to `PackagedFood`.
    pub fn from_classifier_output(raw: &str) -> Self {
        let cleaned = clean_json_text(raw);

        CATEGORY_TOKEN
            .captures(&cleaned)
            .and_then(|caps| caps.get(1))
            .map(|m| match m.as_str().to_ascii_lowercase().as_str() {
                "natural_food" => FoodCategory::NaturalFood,
                "non_food" => FoodCategory::NonFood,
                _ => FoodCategory::PackagedFood,
            })
            .unwrap_or_default()
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_answers() {
        assert_eq!(
            FoodCategory::from_classifier_output("natural_food"),
            FoodCategory::NaturalFood
        );
        assert_eq!(
            FoodCategory::from_classifier_output("  non_food\n"),
            FoodCategory::NonFood
        );
        assert_eq!(
            FoodCategory::from_classifier_output("packaged_food"),
            FoodCategory::PackagedFood
        );
    }

    #[test]
    fn test_fenced_and_noisy_answers() {
        assert_eq!(
            FoodCategory::from_classifier_output("```\nnatural_food\n```"),
            FoodCategory::NaturalFood
        );
        assert_eq!(
            FoodCategory::from_classifier_output("Output: NON_FOOD"),
            FoodCategory::NonFood
        );
    }

    #[test]
    fn test_unknown_answer_defaults_to_packaged() {
        assert_eq!(
            FoodCategory::from_classifier_output("Unknown Product"),
            FoodCategory::PackagedFood
        );
        assert_eq!(
            FoodCategory::from_classifier_output(""),
            FoodCategory::PackagedFood
        );
    }

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&FoodCategory::NaturalFood).unwrap();
        assert_eq!(json, "\"natural_food\"");
    }
}
