use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShowcaseError};

const CONFIG_FILE: &str = "showcase.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# showcase configuration file
# Location: <project root>/showcase.toml
# All paths are relative to the project root.

[paths]
# Tool catalog read by `showcase render` and written by `showcase scan`
catalog = "TOOLS.json"

# Category definitions and default category
categories = "config/categories.json"

# Directory holding one sub-directory per MCP server
servers = "servers"

# Generated page
output = "showcase/index.html"

# Custom Handlebars template (optional; the builtin page is used otherwise)
# template = "showcase/template.html.hbs"

[site]
title = "AI4S Agent Tools"
tagline = "Building intelligent tools for scientific research"
repository = "https://github.com/deepmodeling/AI4S-agent-tools"
organization = "DeepModeling"
organization_url = "https://github.com/deepmodeling"
"#;

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShowcaseConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub site: SiteConfig,
}

/// Input and output locations, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    #[serde(default = "default_categories")]
    pub categories: PathBuf,

    #[serde(default = "default_servers")]
    pub servers: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("TOOLS.json")
}

fn default_categories() -> PathBuf {
    PathBuf::from("config").join("categories.json")
}

fn default_servers() -> PathBuf {
    PathBuf::from("servers")
}

fn default_output() -> PathBuf {
    PathBuf::from("showcase").join("index.html")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            categories: default_categories(),
            servers: default_servers(),
            output: default_output(),
            template: None,
        }
    }
}

/// Text and links shown on the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_tagline")]
    pub tagline: String,

    #[serde(default = "default_repository")]
    pub repository: String,

    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_organization_url")]
    pub organization_url: String,
}

fn default_title() -> String {
    "AI4S Agent Tools".to_string()
}

fn default_tagline() -> String {
    "Building intelligent tools for scientific research".to_string()
}

fn default_repository() -> String {
    "https://github.com/deepmodeling/AI4S-agent-tools".to_string()
}

fn default_organization() -> String {
    "DeepModeling".to_string()
}

fn default_organization_url() -> String {
    "https://github.com/deepmodeling".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            tagline: default_tagline(),
            repository: default_repository(),
            organization: default_organization(),
            organization_url: default_organization_url(),
        }
    }
}

impl ShowcaseConfig {
    /// Load config from the project root
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: ShowcaseConfig =
            toml::from_str(&content).map_err(|e| ShowcaseError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(config)
    }

    /// Save config to the project root
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = root.join(CONFIG_FILE);
        fs::create_dir_all(root)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(root: &Path) -> Result<PathBuf> {
        let path = root.join(CONFIG_FILE);
        fs::create_dir_all(root)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "paths.catalog" => self.paths.catalog = PathBuf::from(value),
            "paths.categories" => self.paths.categories = PathBuf::from(value),
            "paths.servers" => self.paths.servers = PathBuf::from(value),
            "paths.output" => self.paths.output = PathBuf::from(value),
            "paths.template" => {
                self.paths.template = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "site.title" => self.site.title = value.to_string(),
            "site.tagline" => self.site.tagline = value.to_string(),
            "site.repository" => self.site.repository = value.to_string(),
            "site.organization" => self.site.organization = value.to_string(),
            "site.organization_url" => self.site.organization_url = value.to_string(),
            _ => {
                return Err(ShowcaseError::ConfigKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        let template = self
            .paths
            .template
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        vec![
            (
                "paths.catalog".to_string(),
                self.paths.catalog.display().to_string(),
            ),
            (
                "paths.categories".to_string(),
                self.paths.categories.display().to_string(),
            ),
            (
                "paths.servers".to_string(),
                self.paths.servers.display().to_string(),
            ),
            (
                "paths.output".to_string(),
                self.paths.output.display().to_string(),
            ),
            ("paths.template".to_string(), template),
            ("site.title".to_string(), self.site.title.clone()),
            ("site.tagline".to_string(), self.site.tagline.clone()),
            ("site.repository".to_string(), self.site.repository.clone()),
            (
                "site.organization".to_string(),
                self.site.organization.clone(),
            ),
            (
                "site.organization_url".to_string(),
                self.site.organization_url.clone(),
            ),
        ]
    }
}

/// Resolve a configured path against the project root
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = ShowcaseConfig::load(tmp.path()).unwrap();
        assert_eq!(config.paths.catalog, PathBuf::from("TOOLS.json"));
        assert_eq!(config.paths.output, PathBuf::from("showcase/index.html"));
        assert!(config.paths.template.is_none());
        assert_eq!(config.site.title, "AI4S Agent Tools");
    }

    #[test]
    fn test_init_template_parses_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = ShowcaseConfig::init(tmp.path()).unwrap();
        assert!(path.exists());

        let config = ShowcaseConfig::load(tmp.path()).unwrap();
        let defaults = ShowcaseConfig::default();
        assert_eq!(config.list(), defaults.list());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[site]\ntitle = \"Materials Toolbox\"\n",
        )
        .unwrap();
        let config = ShowcaseConfig::load(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Materials Toolbox");
        assert_eq!(config.site.organization, "DeepModeling");
        assert_eq!(config.paths.servers, PathBuf::from("servers"));
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[paths\n").unwrap();
        let err = ShowcaseConfig::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ShowcaseError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_get_set() {
        let mut config = ShowcaseConfig::default();

        config.set("paths.output", "docs/index.html").unwrap();
        assert_eq!(config.paths.output, PathBuf::from("docs/index.html"));
        assert_eq!(config.get("paths.output").unwrap(), "docs/index.html");

        config.set("paths.template", "page.hbs").unwrap();
        assert_eq!(config.paths.template, Some(PathBuf::from("page.hbs")));
        config.set("paths.template", "").unwrap();
        assert!(config.paths.template.is_none());

        assert!(matches!(
            config.set("site.colour", "blue"),
            Err(ShowcaseError::ConfigKeyNotFound { .. })
        ));
        assert!(config.get("site.colour").is_none());
    }

    #[test]
    fn test_save_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = ShowcaseConfig::default();
        config.set("site.tagline", "Tools for science").unwrap();
        config.save(tmp.path()).unwrap();

        let loaded = ShowcaseConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.site.tagline, "Tools for science");
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(
            resolve_path(root, Path::new("TOOLS.json")),
            PathBuf::from("/project/TOOLS.json")
        );
        assert_eq!(
            resolve_path(root, Path::new("/tmp/out.html")),
            PathBuf::from("/tmp/out.html")
        );
    }
}
