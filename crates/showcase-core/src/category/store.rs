//! Category Configuration
//!
//! Validated, read-only view of `config/categories.json`. Key order of the
//! source file is kept so tabs render in the configured order.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{Result, ShowcaseError};

use super::builtin::{BUILTIN_CATEGORIES, BUILTIN_DEFAULT_CATEGORY};

const FALLBACK_DEFAULT_CATEGORY: &str = "general";

/// Display information for one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Display name
    pub name: String,
    /// Icon shown next to the name
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryInfo {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            description: None,
        }
    }
}

/// Anything that carries an optional, free-form category
pub trait Categorized {
    fn category(&self) -> Option<&str>;
}

/// `categories.json` as written on disk
#[derive(Debug, Deserialize)]
struct RawCategoriesFile {
    #[serde(default)]
    categories: Map<String, Value>,
    #[serde(default = "fallback_default_category")]
    default_category: String,
}

fn fallback_default_category() -> String {
    FALLBACK_DEFAULT_CATEGORY.to_string()
}

/// Validated category configuration
///
/// Construction fails when `default_category` is not itself a configured
/// key, so every id returned by [`CategoryConfig::resolve`] has display info.
#[derive(Debug, Clone)]
pub struct CategoryConfig {
    entries: Vec<(String, CategoryInfo)>,
    index: HashMap<String, usize>,
    default_category: String,
}

impl CategoryConfig {
    /// Build from ordered entries and a default id
    pub fn new(
        entries: impl IntoIterator<Item = (String, CategoryInfo)>,
        default_category: impl Into<String>,
    ) -> Result<Self> {
        let mut ordered: Vec<(String, CategoryInfo)> = Vec::new();
        let mut index = HashMap::new();
        for (id, info) in entries {
            match index.get(&id) {
                Some(&pos) => ordered[pos] = (id, info),
                None => {
                    index.insert(id.clone(), ordered.len());
                    ordered.push((id, info));
                }
            }
        }

        let default_category = default_category.into();
        if !index.contains_key(&default_category) {
            return Err(ShowcaseError::UnknownDefaultCategory {
                id: default_category,
            });
        }

        Ok(Self {
            entries: ordered,
            index,
            default_category,
        })
    }

    /// Builtin categories only
    pub fn builtin() -> Self {
        let entries: Vec<(String, CategoryInfo)> = BUILTIN_CATEGORIES
            .iter()
            .map(|b| {
                (
                    b.id.to_string(),
                    CategoryInfo {
                        name: b.name.to_string(),
                        icon: b.icon.to_string(),
                        description: Some(b.description.to_string()),
                    },
                )
            })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        Self {
            entries,
            index,
            default_category: BUILTIN_DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Parse and validate a `categories.json` document
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: RawCategoriesFile = serde_json::from_str(content)?;
        let mut entries = Vec::with_capacity(raw.categories.len());
        for (id, value) in raw.categories {
            let info: CategoryInfo = serde_json::from_value(value)?;
            entries.push((id, info));
        }
        Self::new(entries, raw.default_category)
    }

    /// Load from a file, falling back to the builtin set when it is absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Category config {} not found, using builtin categories",
                path.display()
            );
            return Ok(Self::builtin());
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Resolve the bucket a record belongs to
    ///
    /// The record's own category when it is configured, the default otherwise.
    /// Never fails.
    pub fn resolve<R: Categorized + ?Sized>(&self, record: &R) -> &str {
        let category = record.category().unwrap_or("");
        match self.index.get(category) {
            Some(&pos) => &self.entries[pos].0,
            None => &self.default_category,
        }
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CategoryInfo> {
        self.index.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// All categories in configured order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryInfo)> {
        self.entries.iter().map(|(id, info)| (id.as_str(), info))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entries.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Categories as an ordered JSON object, for embedding in `TOOLS.json`
    pub fn to_json_map(&self) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        for (id, info) in &self.entries {
            map.insert(id.clone(), serde_json::to_value(info)?);
        }
        Ok(map)
    }
}
