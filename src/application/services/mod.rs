mod roast_classifier;
mod roast_service;
mod transcription_adapter;

pub use roast_classifier::{classify, classify_with};
pub use roast_service::{RoastError, RoastReply, RoastService};
pub use transcription_adapter::{AdapterError, TranscriptionAdapter};
