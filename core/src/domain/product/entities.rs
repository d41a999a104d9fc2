use serde::{Deserialize, Deserializer, Serialize};

/// A product record as returned by the product database search.
///
/// Only the fields the analysis consumes are kept; everything else in the
/// upstream payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brands: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub categories: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub countries: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ingredients_text: Option<String>,
    #[serde(default, deserialize_with = "lenient_nutriments")]
    pub nutriments: Nutriments,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub labels_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub additives_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub categories_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_u8")]
    pub nova_group: Option<u8>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_front_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_ingredients_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_nutrition_url: Option<String>,
}

/// Per-100g nutrient values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_f64")]
    pub energy_kcal_100g: Option<f64>,
    #[serde(rename = "proteins_100g", default, deserialize_with = "lenient_f64")]
    pub proteins_100g: Option<f64>,
    #[serde(rename = "carbohydrates_100g", default, deserialize_with = "lenient_f64")]
    pub carbohydrates_100g: Option<f64>,
    #[serde(rename = "sugars_100g", default, deserialize_with = "lenient_f64")]
    pub sugars_100g: Option<f64>,
    #[serde(rename = "fat_100g", default, deserialize_with = "lenient_f64")]
    pub fat_100g: Option<f64>,
    #[serde(rename = "saturated-fat_100g", default, deserialize_with = "lenient_f64")]
    pub saturated_fat_100g: Option<f64>,
    #[serde(rename = "salt_100g", default, deserialize_with = "lenient_f64")]
    pub salt_100g: Option<f64>,
}

impl ProductRecord {
    pub fn brand(&self) -> &str {
        non_empty(self.brands.as_deref()).unwrap_or("Unknown")
    }

    /// First entry of the comma separated category string.
    pub fn primary_category(&self) -> String {
        non_empty(self.categories.as_deref())
            .and_then(|c| c.split(',').next())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn country(&self) -> &str {
        non_empty(self.countries.as_deref()).unwrap_or("Unknown")
    }

    pub fn front_image_url(&self) -> String {
        self.image_front_url.clone().unwrap_or_default()
    }

    pub fn reference_images(&self) -> Vec<String> {
        [
            &self.image_front_url,
            &self.image_ingredients_url,
            &self.image_nutrition_url,
        ]
        .into_iter()
        .map(|url| url.clone().unwrap_or_default())
        .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts a JSON number or a numeric string. Anything else reads as absent.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(value
        .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(u8::MAX)).contains(v))
        .map(|v| v as u8))
}

/// Strings pass through, numbers are rendered (barcodes sometimes arrive as
/// numbers). Anything else reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

/// `null` or a non-array reads as no tags; non-string entries are skipped.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Empty records come back as `[]` or `null` instead of an object.
fn lenient_nutriments<'de, D>(deserializer: D) -> Result<Nutriments, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(object @ serde_json::Value::Object(_)) => {
            serde_json::from_value(object).unwrap_or_default()
        }
        _ => Nutriments::default(),
    })
}
