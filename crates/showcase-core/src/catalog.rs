//! Tool catalog (`TOOLS.json`)
//!
//! Records are normalised once while deserializing: a missing or `null`
//! author becomes [`UNKNOWN_AUTHOR`], missing sub-tools become an empty list
//! and a non-string category is treated as absent.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::category::Categorized;
use crate::error::{Result, ShowcaseError};

/// Author recorded for tools that do not name one
pub const UNKNOWN_AUTHOR: &str = "@unknown";

pub const CATALOG_VERSION: &str = "1.0.0";
pub const CATALOG_DESCRIPTION: &str =
    "AI4S Agent Tools Registry - A collection of MCP servers for scientific computing";

/// One catalog entry: an installable tool collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,

    #[serde(default = "unknown_author", deserialize_with = "author_or_unknown")]
    pub author: String,

    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// Free-form; validated only when resolved against a `CategoryConfig`
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,

    /// Sub-tool (function) names
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,

    /// Any other descriptor fields, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: unknown_author(),
            description: None,
            category: None,
            tools: Vec::new(),
            path: None,
            start_command: None,
            install_command: None,
            extra: Map::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Install command shown in the detail view
    pub fn install_hint(&self) -> Option<String> {
        self.install_command
            .clone()
            .or_else(|| self.path.as_ref().map(|p| format!("cd {} && uv sync", p)))
    }
}

impl Categorized for ToolRecord {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

fn unknown_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

fn author_or_unknown<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(unknown_author))
}

fn string_or_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The full `TOOLS.json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: String,

    /// Category definitions embedded by the registry scanner
    #[serde(default)]
    pub categories: Map<String, Value>,

    #[serde(default)]
    pub tools: Vec<ToolRecord>,
}

fn default_version() -> String {
    CATALOG_VERSION.to_string()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            version: default_version(),
            description: CATALOG_DESCRIPTION.to_string(),
            categories: Map::new(),
            tools: Vec::new(),
        }
    }
}

impl Catalog {
    /// Parse a catalog document and check tool names are unique
    pub fn from_json(content: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ShowcaseError::CatalogNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.name.as_str()) {
                return Err(ShowcaseError::DuplicateTool {
                    name: tool.name.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_defaults() {
        let record: ToolRecord = serde_json::from_str(r#"{"name": "A"}"#).unwrap();
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert!(record.description.is_none());
        assert!(record.category.is_none());
        assert!(record.tools.is_empty());
    }

    #[test]
    fn test_record_null_fields() {
        let record: ToolRecord = serde_json::from_str(
            r#"{"name": "A", "author": null, "tools": null, "category": null, "description": null}"#,
        )
        .unwrap();
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert!(record.tools.is_empty());
        assert!(record.category.is_none());
        assert!(record.description.is_none());
    }

    #[test]
    fn test_non_string_category_is_absent() {
        let record: ToolRecord =
            serde_json::from_str(r#"{"name": "A", "category": 42}"#).unwrap();
        assert!(record.category.is_none());
    }

    #[test]
    fn test_extra_fields_preserved() {
        let json = r#"{"name": "A", "dependencies": ["numpy"], "path": "servers/A"}"#;
        let record: ToolRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.path.as_deref(), Some("servers/A"));
        assert_eq!(record.extra["dependencies"], serde_json::json!(["numpy"]));

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["dependencies"], serde_json::json!(["numpy"]));
        assert!(out.get("description").is_none());
    }

    #[test]
    fn test_install_hint() {
        let mut record = ToolRecord::new("A");
        assert!(record.install_hint().is_none());

        record.path = Some("servers/A".to_string());
        assert_eq!(
            record.install_hint().as_deref(),
            Some("cd servers/A && uv sync")
        );

        record.install_command = Some("pip install a".to_string());
        assert_eq!(record.install_hint().as_deref(), Some("pip install a"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let json = r#"{"tools": [{"name": "A"}, {"name": "B"}, {"name": "A"}]}"#;
        let err = Catalog::from_json(json).unwrap_err();
        assert!(matches!(err, ShowcaseError::DuplicateTool { name } if name == "A"));
    }

    #[test]
    fn test_load_missing_catalog() {
        let tmp = TempDir::new().unwrap();
        let err = Catalog::load(&tmp.path().join("TOOLS.json")).unwrap_err();
        assert!(matches!(err, ShowcaseError::CatalogNotFound { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_save_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out").join("TOOLS.json");

        let mut catalog = Catalog::default();
        catalog.tools.push(
            ToolRecord::new("PubChem")
                .with_author("@deepmodeling")
                .with_category("chemistry")
                .with_tools(["get_pubchem_data", "download_structure"]),
        );
        catalog.save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.version, CATALOG_VERSION);
        assert_eq!(loaded.tools, catalog.tools);
    }
}
