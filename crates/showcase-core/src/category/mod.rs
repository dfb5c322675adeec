//! # Category Module
//!
//! Maps tool records onto a fixed, configured set of categories.
//!
//! - `builtin`: categories and keyword table used without a config file
//! - `store`: validated [`CategoryConfig`] and the resolver
//! - `classifier`: keyword classifier for servers that declare no category
//!
//! ## Example
//!
//! ```rust
//! use showcase_core::category::{Categorized, CategoryConfig};
//!
//! struct Entry(Option<&'static str>);
//!
//! impl Categorized for Entry {
//!     fn category(&self) -> Option<&str> {
//!         self.0
//!     }
//! }
//!
//! let config = CategoryConfig::builtin();
//! assert_eq!(config.resolve(&Entry(Some("chemistry"))), "chemistry");
//! assert_eq!(config.resolve(&Entry(Some("astrology"))), "research");
//! assert_eq!(config.resolve(&Entry(None)), "research");
//! ```

mod builtin;
mod classifier;
mod store;

pub use builtin::{BuiltinCategory, BUILTIN_CATEGORIES, BUILTIN_DEFAULT_CATEGORY};
pub use classifier::{KeywordClassifier, KeywordRule};
pub use store::{Categorized, CategoryConfig, CategoryInfo};
