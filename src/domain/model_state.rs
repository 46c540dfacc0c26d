use std::fmt;

/// Load state of the speech-recognition model.
///
/// Moves `NotLoaded -> Loading -> Loaded`, or back to `NotLoaded` when a load fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelState {
    NotLoaded,
    Loading,
    Loaded,
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ModelState::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelState::NotLoaded => "NOT_LOADED",
            ModelState::Loading => "LOADING",
            ModelState::Loaded => "LOADED",
        }
    }
}

impl fmt::Display for ModelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
