use crate::domain::{food_analysis::helpers::clean_list, product::entities::ProductRecord};

pub const RECOGNITION_PROMPT: &str = "Identify the product name and brand. Return ONLY the name.";

/// Name used when an image cannot be recognised.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

const VERDICT_FORMAT: &str = r#"{
  "verdict": {
    "label": "safe | occasionally_safe | not_safe",
    "headline": "SAFE | OCCASIONALLY SAFE | NOT SAFE",
    "subtext": "short explanation"
  },
  "overall_score": {
    "percent": 0-100,
    "interpretation": "short text"
  },
  "nutrition_score": {
    "grade": "A | B | C | D | E"
  },
  "key_takeaways": {
    "possible_concern": "string",
    "generally_safe": "string",
    "depends_on_use": "string"
  },
  "age_suitability": {
    "children_0_12": "string",
    "young_12_45": "string",
    "adults_45_plus": "string"
  },
  "health_suitability": {
    "diabetes": "string",
    "heart": "string",
    "weight": "string",
    "normal": "string"
  },
  "ai_opinion": {
    "text": "string"
  }
}"#;

pub fn classification_prompt(query: &str) -> String {
    format!(
        r#"Classify the input into exactly one of these categories: natural_food, packaged_food, non_food.

Rules:
1. Output ONLY the category name.
2. Do NOT output "Unknown Product".
3. If unsure, classify as "packaged_food".

Input: Apple
Output: natural_food

Input: Horlicks
Output: packaged_food

Input: Bus
Output: non_food

Input: {query}
Output:"#
    )
}

pub fn health_analysis_prompt(product: &ProductRecord, product_name: &str) -> String {
    let nutriments = &product.nutriments;
    let categories = clean_list(&product.categories_tags).join(", ");
    let additives = clean_list(&product.additives_tags).join(", ");
    let labels = clean_list(&product.labels_tags).join(", ");
    let nova = product
        .nova_group
        .map(|n| n.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let ingredients = product
        .ingredients_text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Unknown");

    format!(
        r#"You are an AI food interpretation assistant.
Your job is to help a user understand whether a food is a good daily choice.

Product: {product_name}
Brand: {brand}
Categories: {categories}

Nutrition per 100g:
Sugar: {sugar} g
Salt: {salt} g
Fat: {fat} g
Calories: {energy} kcal
Processing Level (NOVA): {nova}
Ingredients: {ingredients}
Additives: {additives}
Labels: {labels}

IMPORTANT:
- Interpret, do not list numbers
- No medical advice
- If unsure, be honest
- Reduce cognitive load
- Output MUST contain ALL fields

Return STRICT JSON in this exact format:

{VERDICT_FORMAT}"#,
        brand = product.brand(),
        sugar = figure(nutriments.sugars_100g),
        salt = figure(nutriments.salt_100g),
        fat = figure(nutriments.fat_100g),
        energy = figure(nutriments.energy_kcal_100g),
    )
}

pub fn natural_food_prompt(item_name: &str) -> String {
    let image_query = item_name.split_whitespace().collect::<Vec<_>>().join("+");

    format!(
        r#"You are analyzing a natural food item: "{item_name}".

1. Act as a nutritional database. Estimate the nutritional values for 100g of this item.
2. Then, perform the health analysis.

Return a single JSON object that combines RAW DATA and ANALYSIS.
Structure must match this exactly:

{{
  "product_info": {{
    "brand": "Nature",
    "category": "Natural Food",
    "ingredients_text": "100% {item_name}",
    "image_url": "https://www.google.com/search?tbm=isch&q={image_query}"
  }},
  "nutrition_per_100g": {{
    "energy_kcal": number,
    "protein_g": number,
    "carbs_g": number,
    "sugar_g": number,
    "fat_g": number,
    "sat_fat_g": number,
    "sodium_mg": number
  }},
  "analysis": {VERDICT_FORMAT}
}}"#
    )
}

fn figure(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "?".to_string())
}
