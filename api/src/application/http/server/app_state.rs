use std::sync::Arc;

use incognito_core::application::IncognitoService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: IncognitoService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: IncognitoService) -> Self {
        Self { args, service }
    }
}
