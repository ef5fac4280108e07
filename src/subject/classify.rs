//! Heuristic classification of subjects.

use crate::config::{CategoryRule, SuiteConfig};

/// A literal pattern matched against the logic file.
struct MechanicPattern {
    needle: &'static str,
    tag: &'static str,
    case_sensitive: bool,
}

/// Patterns in reporting order. The touch pattern matches the engine's event
/// class name, so it is the only case-sensitive one.
const MECHANIC_PATTERNS: &[MechanicPattern] = &[
    MechanicPattern {
        needle: "InputEventScreenTouch",
        tag: "touch",
        case_sensitive: true,
    },
    MechanicPattern {
        needle: "swipe",
        tag: "swipe",
        case_sensitive: false,
    },
    MechanicPattern {
        needle: "drag",
        tag: "drag",
        case_sensitive: false,
    },
    MechanicPattern {
        needle: "gravity",
        tag: "gravity",
        case_sensitive: false,
    },
];

/// Ordered keyword table mapping subject names to categories.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<CategoryRule>,
    default_category: String,
}

impl Classifier {
    pub fn new(rules: Vec<CategoryRule>, default_category: impl Into<String>) -> Self {
        Self {
            rules,
            default_category: default_category.into(),
        }
    }

    /// Classifier using the config's category table.
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self::new(config.categories.clone(), config.default_category.clone())
    }

    /// Category for a subject name. First rule with a matching keyword wins.
    pub fn classify(&self, name: &str) -> String {
        let name = name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| {
                rule.keywords
                    .iter()
                    .any(|k| !k.is_empty() && name.contains(&k.to_lowercase()))
            })
            .map(|rule| rule.name.clone())
            .unwrap_or_else(|| self.default_category.clone())
    }
}

/// Capability tags declared by a logic file's source text.
pub fn detect_mechanics(source: &str) -> Vec<String> {
    let lowered = source.to_lowercase();
    MECHANIC_PATTERNS
        .iter()
        .filter(|pattern| {
            if pattern.case_sensitive {
                source.contains(pattern.needle)
            } else {
                lowered.contains(pattern.needle)
            }
        })
        .map(|pattern| pattern.tag.to_string())
        .collect()
}
