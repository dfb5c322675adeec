//! Registry scanner
//!
//! Builds `TOOLS.json` from a directory of MCP servers. Each server lives in
//! its own sub-directory with a `metadata.json`; sub-tools are read from the
//! Python sources and missing categories are filled in by keyword.

mod extract;

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, ToolRecord, CATALOG_DESCRIPTION, CATALOG_VERSION, UNKNOWN_AUTHOR};
use crate::category::{CategoryConfig, KeywordClassifier};
use crate::error::{Result, ShowcaseError};

pub use extract::{
    extract_server_tools, extract_tool_names, tool_source_files, SERVER_FILE_PATTERNS,
};

const METADATA_FILE: &str = "metadata.json";
const PYPROJECT_FILE: &str = "pyproject.toml";
const DEFAULT_SERVERS_PREFIX: &str = "servers";

/// The parts of `pyproject.toml` the scanner reads
#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    project: Option<ProjectTable>,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectTable {
    #[serde(default)]
    description: Option<String>,
}

fn read_pyproject_description(server_dir: &Path) -> Option<String> {
    let path = server_dir.join(PYPROJECT_FILE);
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str::<PyProject>(&content) {
        Ok(pyproject) => pyproject.project.and_then(|p| p.description),
        Err(e) => {
            debug!("Failed to read {}: {}", path.display(), e);
            None
        }
    }
}

/// Insert `value` when `key` is missing or null
fn set_default(meta: &mut Map<String, Value>, key: &str, value: impl Into<Value>) {
    if meta.get(key).map_or(true, Value::is_null) {
        meta.insert(key.to_string(), value.into());
    }
}

/// Scans server directories into a [`Catalog`]
pub struct RegistryScanner<'a> {
    config: &'a CategoryConfig,
    classifier: KeywordClassifier,
}

impl<'a> RegistryScanner<'a> {
    pub fn new(config: &'a CategoryConfig) -> Self {
        Self {
            config,
            classifier: KeywordClassifier::builtin(),
        }
    }

    /// Scan every server under `servers_dir`
    ///
    /// Directories starting with `_` are templates and are skipped. Tools in
    /// the result are sorted by name; two servers declaring the same name
    /// fail with `DuplicateTool`.
    pub fn scan(&self, servers_dir: &Path) -> Result<Catalog> {
        if !servers_dir.is_dir() {
            return Err(ShowcaseError::ServersDirNotFound {
                path: servers_dir.to_path_buf(),
            });
        }

        let mut dirs: Vec<_> = fs::read_dir(servers_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        dirs.sort();

        let mut tools = Vec::new();
        for dir in dirs {
            let Some(dir_name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if dir_name.starts_with('_') {
                continue;
            }

            info!("Scanning {}...", dir_name);
            if let Some(record) = self.scan_server(&dir)? {
                info!(
                    "  Found: {} with {} tools (category: {})",
                    record.name,
                    record.tools.len(),
                    record.category.as_deref().unwrap_or_default()
                );
                tools.push(record);
            }
        }

        if tools.is_empty() {
            return Err(ShowcaseError::NoToolsFound {
                path: servers_dir.to_path_buf(),
            });
        }

        tools.sort_by(|a, b| a.name.cmp(&b.name));

        let catalog = Catalog {
            version: CATALOG_VERSION.to_string(),
            description: CATALOG_DESCRIPTION.to_string(),
            categories: self.config.to_json_map()?,
            tools,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Scan one server directory
    ///
    /// Returns `None` (with a warning) when the server has no usable
    /// `metadata.json`.
    pub fn scan_server(&self, server_dir: &Path) -> Result<Option<ToolRecord>> {
        let Some(dir_name) = server_dir.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };

        let metadata_path = server_dir.join(METADATA_FILE);
        if !metadata_path.exists() {
            warn!("No {} found in {}", METADATA_FILE, server_dir.display());
            return Ok(None);
        }

        let mut meta = match fs::read_to_string(&metadata_path)
            .map_err(ShowcaseError::from)
            .and_then(|c| Ok(serde_json::from_str::<Value>(&c)?))
        {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("  {} is not a JSON object", metadata_path.display());
                return Ok(None);
            }
            Err(e) => {
                warn!("  Failed to read {}: {}", metadata_path.display(), e);
                return Ok(None);
            }
        };

        let prefix = server_dir
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_SERVERS_PREFIX);
        let path = format!("{}/{}", prefix, dir_name);
        meta.insert("path".to_string(), Value::String(path.clone()));

        if meta.get("description").map_or(true, Value::is_null) {
            if let Some(description) = read_pyproject_description(server_dir) {
                meta.insert("description".to_string(), Value::String(description));
            }
        }

        // A present category key, even null, disables keyword classification
        let declares_category = meta.contains_key("category");

        set_default(&mut meta, "name", dir_name);
        set_default(&mut meta, "description", format!("{} MCP server", dir_name));
        set_default(&mut meta, "author", UNKNOWN_AUTHOR);
        meta.insert(
            "start_command".to_string(),
            Value::String(format!("cd {} && python server.py --port <PORT>", path)),
        );

        let mut record: ToolRecord = match serde_json::from_value(Value::Object(meta)) {
            Ok(record) => record,
            Err(e) => {
                warn!("  Invalid {}: {}", metadata_path.display(), e);
                return Ok(None);
            }
        };

        record.tools = extract_server_tools(server_dir)?;
        record.category = Some(self.categorize(&record, declares_category));

        Ok(Some(record))
    }

    fn categorize(&self, record: &ToolRecord, declares_category: bool) -> String {
        let category = match record.category.as_deref() {
            Some(declared) => declared.to_lowercase(),
            None if declares_category => {
                warn!("  Non-string category for {}, using default", record.name);
                return self.config.default_category().to_string();
            }
            None => self
                .classifier
                .classify_or_default(
                    &record.name,
                    record.description.as_deref().unwrap_or_default(),
                    self.config,
                )
                .to_string(),
        };

        if self.config.contains(&category) {
            category
        } else {
            warn!(
                "  Unknown category '{}' for {}, using default",
                category, record.name
            );
            self.config.default_category().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_server(root: &Path, name: &str, metadata: Option<&str>, server_py: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        if let Some(metadata) = metadata {
            fs::write(dir.join(METADATA_FILE), metadata).unwrap();
        }
        fs::write(dir.join("server.py"), server_py).unwrap();
        dir
    }

    #[test]
    fn test_scan_server_defaults() {
        let tmp = TempDir::new().unwrap();
        let servers = tmp.path().join("servers");
        let dir = write_server(
            &servers,
            "zotero",
            Some("{}"),
            "@mcp.tool()\ndef list_items():\n    pass\n",
        );

        let config = CategoryConfig::builtin();
        let record = RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .unwrap();

        assert_eq!(record.name, "zotero");
        assert_eq!(record.author, UNKNOWN_AUTHOR);
        assert_eq!(record.description.as_deref(), Some("zotero MCP server"));
        assert_eq!(record.path.as_deref(), Some("servers/zotero"));
        assert_eq!(
            record.start_command.as_deref(),
            Some("cd servers/zotero && python server.py --port <PORT>")
        );
        assert_eq!(record.tools, vec!["list_items"]);
        // No keyword matches, so the default category applies
        assert_eq!(record.category.as_deref(), Some("research"));
    }

    #[test]
    fn test_scan_server_pyproject_description() {
        let tmp = TempDir::new().unwrap();
        let dir = write_server(tmp.path(), "rdkit", Some(r#"{"name": "RDKit"}"#), "");
        fs::write(
            dir.join(PYPROJECT_FILE),
            "[project]\nname = \"rdkit-mcp\"\ndescription = \"Cheminformatics toolkit wrapper\"\n",
        )
        .unwrap();

        let config = CategoryConfig::builtin();
        let record = RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .unwrap();
        assert_eq!(
            record.description.as_deref(),
            Some("Cheminformatics toolkit wrapper")
        );
    }

    #[test]
    fn test_scan_server_declared_category() {
        let tmp = TempDir::new().unwrap();
        let dir = write_server(
            tmp.path(),
            "pubchem",
            Some(r#"{"name": "PubChem", "category": "Materials", "author": "@deepmodeling"}"#),
            "",
        );
        let config = CategoryConfig::builtin();
        let record = RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .unwrap();
        assert_eq!(record.category.as_deref(), Some("materials"));
        assert_eq!(record.author, "@deepmodeling");
    }

    #[test]
    fn test_scan_server_unknown_category_uses_default() {
        let tmp = TempDir::new().unwrap();
        let dir = write_server(
            tmp.path(),
            "example",
            Some(r#"{"category": "General Tools"}"#),
            "",
        );
        let config = CategoryConfig::builtin();
        let record = RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .unwrap();
        assert_eq!(record.category.as_deref(), Some("research"));
    }

    #[test]
    fn test_scan_server_null_category_uses_default() {
        let tmp = TempDir::new().unwrap();
        // "pubchem" alone would classify as chemistry
        let null_dir = write_server(
            tmp.path(),
            "pubchem",
            Some(r#"{"name": "pubchem", "category": null}"#),
            "",
        );
        let number_dir = write_server(
            tmp.path(),
            "pubchem2",
            Some(r#"{"name": "pubchem2", "category": 7}"#),
            "",
        );
        let config = CategoryConfig::builtin();
        let scanner = RegistryScanner::new(&config);

        let record = scanner.scan_server(&null_dir).unwrap().unwrap();
        assert_eq!(record.category.as_deref(), Some("research"));
        let record = scanner.scan_server(&number_dir).unwrap().unwrap();
        assert_eq!(record.category.as_deref(), Some("research"));
    }

    #[test]
    fn test_scan_rejects_duplicate_names() {
        let tmp = TempDir::new().unwrap();
        let servers = tmp.path().join("servers");
        write_server(&servers, "pubchem_a", Some(r#"{"name": "PubChem"}"#), "");
        write_server(&servers, "pubchem_b", Some(r#"{"name": "PubChem"}"#), "");

        let config = CategoryConfig::builtin();
        let err = RegistryScanner::new(&config).scan(&servers).unwrap_err();
        assert_eq!(err.exit_code(), 6);
        assert!(matches!(err, ShowcaseError::DuplicateTool { name } if name == "PubChem"));
    }

    #[test]
    fn test_scan_server_without_metadata() {
        let tmp = TempDir::new().unwrap();
        let dir = write_server(tmp.path(), "bare", None, "");
        let config = CategoryConfig::builtin();
        assert!(RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_scan_server_invalid_metadata() {
        let tmp = TempDir::new().unwrap();
        let dir = write_server(tmp.path(), "broken", Some("[1, 2"), "");
        let config = CategoryConfig::builtin();
        assert!(RegistryScanner::new(&config)
            .scan_server(&dir)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_scan_sorts_and_skips_templates() {
        let tmp = TempDir::new().unwrap();
        let servers = tmp.path().join("servers");
        write_server(&servers, "_example", Some(r#"{"name": "Example"}"#), "");
        write_server(
            &servers,
            "b_dir",
            Some(r#"{"name": "Alpha", "description": "crystal structure search"}"#),
            "@mcp.tool()\ndef relax():\n    pass\n",
        );
        write_server(&servers, "a_dir", Some(r#"{"name": "Zeta"}"#), "");
        write_server(&servers, "no_meta", None, "");
        fs::write(servers.join("README.md"), "not a server").unwrap();

        let config = CategoryConfig::builtin();
        let catalog = RegistryScanner::new(&config).scan(&servers).unwrap();

        let names: Vec<&str> = catalog.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(catalog.tools[0].category.as_deref(), Some("materials"));
        assert_eq!(catalog.version, CATALOG_VERSION);
        assert_eq!(catalog.categories.len(), config.len());
    }

    #[test]
    fn test_scan_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let config = CategoryConfig::builtin();
        let err = RegistryScanner::new(&config)
            .scan(&tmp.path().join("servers"))
            .unwrap_err();
        assert!(matches!(err, ShowcaseError::ServersDirNotFound { .. }));
    }

    #[test]
    fn test_scan_no_tools() {
        let tmp = TempDir::new().unwrap();
        let servers = tmp.path().join("servers");
        write_server(&servers, "_example", Some("{}"), "");
        let config = CategoryConfig::builtin();
        let err = RegistryScanner::new(&config).scan(&servers).unwrap_err();
        assert!(matches!(err, ShowcaseError::NoToolsFound { .. }));
    }
}
