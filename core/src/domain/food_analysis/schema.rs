use serde_json::json;

fn text_fields(fields: &[&str]) -> serde_json::Value {
    let properties: serde_json::Map<String, serde_json::Value> = fields
        .iter()
        .map(|f| (f.to_string(), json!({ "type": "string" })))
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": fields
    })
}

/// Returns the JSON schema for health verdict LLM responses
pub fn get_health_verdict_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "verdict": {
                "type": "object",
                "properties": {
                    "label": {
                        "type": "string",
                        "enum": ["safe", "occasionally_safe", "not_safe"]
                    },
                    "headline": { "type": "string" },
                    "subtext": { "type": "string" }
                },
                "required": ["label", "headline", "subtext"]
            },
            "overall_score": {
                "type": "object",
                "properties": {
                    "percent": { "type": "number" },
                    "interpretation": { "type": "string" }
                },
                "required": ["percent", "interpretation"]
            },
            "nutrition_score": {
                "type": "object",
                "properties": {
                    "grade": { "type": "string", "enum": ["A", "B", "C", "D", "E"] }
                },
                "required": ["grade"]
            },
            "key_takeaways": text_fields(&["possible_concern", "generally_safe", "depends_on_use"]),
            "age_suitability": text_fields(&["children_0_12", "young_12_45", "adults_45_plus"]),
            "health_suitability": text_fields(&["diabetes", "heart", "weight", "normal"]),
            "ai_opinion": text_fields(&["text"])
        },
        "required": [
            "verdict", "overall_score", "nutrition_score", "key_takeaways",
            "age_suitability", "health_suitability", "ai_opinion"
        ]
    })
}

/// Returns the JSON schema for the natural food estimate + verdict response
pub fn get_natural_food_schema() -> serde_json::Value {
    let nutrients = [
        "energy_kcal",
        "protein_g",
        "carbs_g",
        "sugar_g",
        "fat_g",
        "sat_fat_g",
        "sodium_mg",
    ];
    let nutrient_properties: serde_json::Map<String, serde_json::Value> = nutrients
        .iter()
        .map(|n| (n.to_string(), json!({ "type": "number" })))
        .collect();

    json!({
        "type": "object",
        "properties": {
            "product_info": text_fields(&["brand", "category", "ingredients_text", "image_url"]),
            "nutrition_per_100g": {
                "type": "object",
                "properties": nutrient_properties,
                "required": nutrients
            },
            "analysis": get_health_verdict_schema()
        },
        "required": ["product_info", "nutrition_per_100g", "analysis"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_schema_requires_all_sections() {
        let schema = get_health_verdict_schema();
        let required = schema["required"].as_array().unwrap();

        assert_eq!(required.len(), 7);
        assert_eq!(
            schema["properties"]["health_suitability"]["required"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[test]
    fn test_natural_schema_embeds_verdict() {
        let schema = get_natural_food_schema();
        assert_eq!(schema["properties"]["analysis"], get_health_verdict_schema());
        assert_eq!(
            schema["properties"]["nutrition_per_100g"]["required"]
                .as_array()
                .unwrap()
                .len(),
            7
        );
    }
}
