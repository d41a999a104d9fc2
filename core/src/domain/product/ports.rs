use std::future::Future;

use crate::domain::{common::entities::app_errors::CoreError, product::entities::ProductRecord};

/// Product database lookups
pub trait ProductRepository: Send + Sync {
    /// Free-text search returning the first match, if any.
    fn search_product(
        &self,
        query: String,
    ) -> impl Future<Output = Result<Option<ProductRecord>, CoreError>> + Send;
}
