/// Reasons a caller-supplied input is rejected before it reaches the classifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("text must not be empty")]
    EmptyText,
    #[error("audio file is empty")]
    EmptyAudio,
    #[error("unsupported content type: {0}, expected audio/*")]
    UnsupportedMediaType(String),
    #[error("audio file too large: {size} bytes exceeds limit of {max} bytes")]
    TooLarge { size: usize, max: usize },
}
