use serde::Serialize;

use super::Category;

/// Outcome of classifying one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roast {
    pub category: Category,
    pub line: String,
}

impl Roast {
    pub fn new(category: Category, line: String) -> Self {
        Self { category, line }
    }
}
