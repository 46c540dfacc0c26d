use rand::Rng;
use rand::seq::SliceRandom;

use crate::domain::{Category, Roast, Topic};

/// Picks a category for `topic` and draws one of its lines at random.
pub fn classify(topic: &Topic) -> Roast {
    classify_with(topic, &mut rand::thread_rng())
}

/// Same as [`classify`] with a caller-provided random source.
pub fn classify_with<R: Rng + ?Sized>(topic: &Topic, rng: &mut R) -> Roast {
    let category = Category::match_lowercase(&topic.to_lowercase());
    // Every category owns exactly three lines, so the draw always succeeds.
    let line = category.lines().choose(rng).copied().unwrap_or_default();

    let line = if category.interpolates_topic() {
        format!("\"{}\" {}", topic.as_str(), line)
    } else {
        line.to_string()
    };

    Roast::new(category, line)
}
