use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Multipart form accepted by `POST /analyze`. Both parts are optional but at
/// least one must be present.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct AnalyzeFoodForm {
    #[validate(length(max = 200, message = "product_name must be at most 200 characters"))]
    #[schema(example = "Horlicks")]
    pub product_name: Option<String>,

    /// Product photo. Used only when `product_name` is empty.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_product_name_is_rejected() {
        let form = AnalyzeFoodForm {
            product_name: Some("x".repeat(201)),
            image: None,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_empty_form_passes_validation() {
        assert!(AnalyzeFoodForm::default().validate().is_ok());
    }
}
