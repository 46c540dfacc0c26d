mod error;
mod health;
mod roast;

pub use error::{ErrorResponse, error_response};
pub use health::{HealthResponse, health_handler, ready_handler};
pub use roast::{AUDIO_FIELD, RoastResponse, roast_audio_handler, roast_text_handler};
