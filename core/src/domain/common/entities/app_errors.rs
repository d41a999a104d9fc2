use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Provide product name or image")]
    MissingInput,

    #[error("Product not found")]
    ProductNotFound,

    #[error("AI analysis failed: {0}")]
    GenerationFailed(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Internal server error")]
    InternalServerError,
}
