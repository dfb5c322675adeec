pub mod aggregate;
pub mod catalog;
pub mod category;
pub mod config;
pub mod error;
pub mod render;
pub mod scan;

pub use aggregate::{
    aggregate, category_fallbacks, Aggregation, CatalogSummary, CategorizedView, CategoryBucket,
    Fallback, FallbackReason,
};
pub use catalog::{Catalog, ToolRecord, UNKNOWN_AUTHOR};
pub use config::{resolve_path, PathsConfig, ShowcaseConfig, SiteConfig};
pub use error::{Result, ShowcaseError};
pub use render::{ShowcasePage, ShowcaseRenderer, BUILTIN_TEMPLATE};
pub use scan::RegistryScanner;

// Category system
pub use category::{
    Categorized, CategoryConfig, CategoryInfo, KeywordClassifier, KeywordRule,
    BUILTIN_CATEGORIES, BUILTIN_DEFAULT_CATEGORY,
};
