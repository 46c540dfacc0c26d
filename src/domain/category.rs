use std::fmt;

use serde::Serialize;

/// Fixed roast categories, declared in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fashion,
    Food,
    Tech,
    Talent,
    Default,
}

const FASHION_LINES: [&str; 3] = [
    "Your outfit looks like it lost a fight with a clearance rack.",
    "That style isn't a statement, it's a cry for help.",
    "Even mannequins would refuse to be seen in those clothes.",
];

const FOOD_LINES: [&str; 3] = [
    "Your taste in food is so bad, even the microwave refuses to heat it.",
    "Putting pineapple on that would actually be an improvement.",
    "That dish has more red flags than a bullfighting arena.",
];

const TECH_LINES: [&str; 3] = [
    "Your code has so many bugs it qualifies as a nature reserve.",
    "Your computer skills peaked when you found the power button.",
    "Even a Hello World program would crash if you wrote it.",
];

const TALENT_LINES: [&str; 3] = [
    "Your singing voice could be used as a weapon of mass destruction.",
    "Your hidden talent must be really well hidden, nobody has found it yet.",
    "Calling that a skill is an insult to people who have skills.",
];

/// Sentence fragments appended after the quoted topic.
const DEFAULT_FRAGMENTS: [&str; 3] = [
    "is so disappointing, even my error logs have more personality.",
    "is the human equivalent of a loading screen that never finishes.",
    "is so boring, I fell asleep halfway through hearing about it.",
];

impl Category {
    /// Keyword rules in the order they are evaluated. `Default` has no rule.
    pub const RULES: [Category; 4] = [
        Category::Fashion,
        Category::Food,
        Category::Tech,
        Category::Talent,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Fashion => &["fashion", "cloth", "dress", "style", "outfit"],
            Category::Food => &["food", "pizza", "eat", "dish", "pineapple"],
            Category::Tech => &["tech", "code", "computer", "program"],
            Category::Talent => &["sing", "talent", "skill", "voice"],
            Category::Default => &[],
        }
    }

    /// Complete sentences for the named categories, fragments for `Default`.
    pub fn lines(&self) -> &'static [&'static str; 3] {
        match self {
            Category::Fashion => &FASHION_LINES,
            Category::Food => &FOOD_LINES,
            Category::Tech => &TECH_LINES,
            Category::Talent => &TALENT_LINES,
            Category::Default => &DEFAULT_FRAGMENTS,
        }
    }

    /// Whether lines are fragments that need the topic prepended.
    pub fn interpolates_topic(&self) -> bool {
        matches!(self, Category::Default)
    }

    /// First rule whose keyword occurs in the already lower-cased text.
    pub fn match_lowercase(text: &str) -> Category {
        Self::RULES
            .into_iter()
            .find(|category| category.keywords().iter().any(|kw| text.contains(kw)))
            .unwrap_or(Category::Default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Fashion => "fashion",
            Category::Food => "food",
            Category::Tech => "tech",
            Category::Talent => "talent",
            Category::Default => "default",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_rules_when_listed_then_follow_priority_order() {
        assert_eq!(
            Category::RULES,
            [
                Category::Fashion,
                Category::Food,
                Category::Tech,
                Category::Talent
            ]
        );
    }

    #[test]
    fn given_keyword_inside_word_when_matching_then_substring_counts() {
        assert_eq!(Category::match_lowercase("great"), Category::Food);
        assert_eq!(Category::match_lowercase("stylish"), Category::Fashion);
    }

    #[test]
    fn given_no_keyword_when_matching_then_default() {
        assert_eq!(Category::match_lowercase("my cat"), Category::Default);
    }

    #[test]
    fn given_category_when_serialized_then_matches_display_name() {
        for category in Category::RULES.into_iter().chain([Category::Default]) {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn given_only_default_when_checking_interpolation_then_true() {
        assert!(Category::Default.interpolates_topic());
        assert!(
            Category::RULES
                .iter()
                .all(|category| !category.interpolates_topic())
        );
    }
}
