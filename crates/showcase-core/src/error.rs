use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShowcaseError {
    #[error("Catalog not found: {path}")]
    CatalogNotFound { path: PathBuf },

    #[error("Servers directory not found: {path}")]
    ServersDirNotFound { path: PathBuf },

    #[error("No tools found under {path}")]
    NoToolsFound { path: PathBuf },

    #[error("Default category '{id}' is not one of the configured categories")]
    UnknownDefaultCategory { id: String },

    #[error("Duplicate tool name in catalog: {name}")]
    DuplicateTool { name: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Render error: {0}")]
    Render(#[from] Box<handlebars::RenderError>),
}

pub type Result<T> = std::result::Result<T, ShowcaseError>;

impl ShowcaseError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CatalogNotFound { .. } => 2,
            Self::ServersDirNotFound { .. } => 3,
            Self::NoToolsFound { .. } => 4,
            Self::UnknownDefaultCategory { .. } => 5,
            Self::DuplicateTool { .. } => 6,
            Self::ConfigParse { .. } | Self::ConfigKeyNotFound { .. } => 7,
            _ => 1,
        }
    }
}

impl From<handlebars::TemplateError> for ShowcaseError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(err))
    }
}

impl From<handlebars::RenderError> for ShowcaseError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Render(Box::new(err))
    }
}
