//! Keyword Classifier
//!
//! Assigns a category to a server that does not declare one, from the words
//! in its name and description.

use super::builtin::{BuiltinCategory, BUILTIN_CATEGORIES};
use super::store::CategoryConfig;

/// Keyword table entry
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl From<&BuiltinCategory> for KeywordRule {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            category: builtin.id.to_string(),
            keywords: builtin.keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// First-match keyword classifier
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl KeywordClassifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Classifier over the builtin keyword table
    pub fn builtin() -> Self {
        Self::new(BUILTIN_CATEGORIES.iter().map(KeywordRule::from).collect())
    }

    /// Category whose keywords first appear in `name description`
    ///
    /// Matching is a case-insensitive substring test; rules are tried in
    /// order. Returns `None` when no keyword matches.
    pub fn classify(&self, name: &str, description: &str) -> Option<&str> {
        let text = format!("{} {}", name, description).to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| text.contains(kw.as_str())))
            .map(|rule| rule.category.as_str())
    }

    /// Like [`classify`](Self::classify), falling back to the configured default
    pub fn classify_or_default<'a>(
        &'a self,
        name: &str,
        description: &str,
        config: &'a CategoryConfig,
    ) -> &'a str {
        self.classify(name, description)
            .unwrap_or_else(|| config.default_category())
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}
