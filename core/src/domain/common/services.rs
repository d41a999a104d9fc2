use crate::domain::{
    common::AnalysisConfig, food_analysis::ports::LLMClient, product::ports::ProductRepository,
};

#[derive(Clone)]
pub struct Service<P, LLM>
where
    P: ProductRepository,
    LLM: LLMClient,
{
    pub(crate) product_repository: P,
    pub(crate) llm_client: LLM,
    pub(crate) analysis: AnalysisConfig,
}

impl<P, LLM> Service<P, LLM>
where
    P: ProductRepository,
    LLM: LLMClient,
{
    pub fn new(product_repository: P, llm_client: LLM, analysis: AnalysisConfig) -> Self {
        Self {
            product_repository,
            llm_client,
            analysis,
        }
    }

    pub fn llm_client(&self) -> &LLM {
        &self.llm_client
    }
}
