use std::sync::Arc;

use crate::application::services::RoastService;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub roast_service: Arc<RoastService>,
    pub settings: Settings,
}
