mod audio_clip;
mod category;
mod input_error;
mod model_state;
mod roast;
mod topic;
mod transcript;

pub use audio_clip::{AudioClip, DEFAULT_MAX_AUDIO_BYTES};
pub use category::Category;
pub use input_error::InputError;
pub use model_state::ModelState;
pub use roast::Roast;
pub use topic::Topic;
pub use transcript::Transcript;
