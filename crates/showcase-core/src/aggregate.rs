//! Grouping of catalog records by resolved category
//!
//! Pure and deterministic: the same input order always yields the same
//! buckets in the same order.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::catalog::ToolRecord;
use crate::category::CategoryConfig;

/// Records sharing one resolved category, in input order
#[derive(Debug, Clone)]
pub struct CategoryBucket<'a> {
    pub id: &'a str,
    pub tools: Vec<&'a ToolRecord>,
}

/// Records grouped by category; buckets ordered by first appearance
#[derive(Debug, Clone, Default)]
pub struct CategorizedView<'a> {
    buckets: Vec<CategoryBucket<'a>>,
    index: HashMap<&'a str, usize>,
}

impl<'a> CategorizedView<'a> {
    fn push(&mut self, id: &'a str, record: &'a ToolRecord) {
        match self.index.get(id) {
            Some(&pos) => self.buckets[pos].tools.push(record),
            None => {
                self.index.insert(id, self.buckets.len());
                self.buckets.push(CategoryBucket {
                    id,
                    tools: vec![record],
                });
            }
        }
    }

    pub fn buckets(&self) -> &[CategoryBucket<'a>] {
        &self.buckets
    }

    pub fn get(&self, id: &str) -> Option<&CategoryBucket<'a>> {
        self.index.get(id).map(|&pos| &self.buckets[pos])
    }

    /// Bucket ids in first-appearance order
    pub fn ids(&self) -> Vec<&'a str> {
        self.buckets.iter().map(|b| b.id).collect()
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Headline numbers for the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogSummary {
    /// Number of tool collections (records)
    pub collections: usize,
    /// Sum of sub-tools over all records
    pub tools: usize,
    /// Distinct authors, all author-less records counted as one
    pub contributors: usize,
}

impl CatalogSummary {
    pub fn from_records(records: &[ToolRecord]) -> Self {
        let authors: HashSet<&str> = records.iter().map(|r| r.author.as_str()).collect();
        Self {
            collections: records.len(),
            tools: records.iter().map(|r| r.tools.len()).sum(),
            contributors: authors.len(),
        }
    }
}

/// Result of [`aggregate`]
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    pub view: CategorizedView<'a>,
    pub summary: CatalogSummary,
}

/// Group records by resolved category and compute the summary
pub fn aggregate<'a>(records: &'a [ToolRecord], config: &'a CategoryConfig) -> Aggregation<'a> {
    let mut view = CategorizedView::default();
    for record in records {
        view.push(config.resolve(record), record);
    }
    Aggregation {
        view,
        summary: CatalogSummary::from_records(records),
    }
}

/// Why a record was routed to the default category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason<'a> {
    /// No category, or an empty one
    Missing,
    /// A category that is not configured
    Unknown(&'a str),
}

/// A record that [`aggregate`] places in the default bucket by fallback
#[derive(Debug, Clone, Copy)]
pub struct Fallback<'a> {
    pub record: &'a ToolRecord,
    pub reason: FallbackReason<'a>,
}

/// Records whose own category is not used, in input order
pub fn category_fallbacks<'a>(
    records: &'a [ToolRecord],
    config: &CategoryConfig,
) -> Vec<Fallback<'a>> {
    records
        .iter()
        .filter_map(|record| {
            let reason = match record.category.as_deref() {
                None | Some("") => FallbackReason::Missing,
                Some(id) if config.contains(id) => return None,
                Some(id) => FallbackReason::Unknown(id),
            };
            Some(Fallback { record, reason })
        })
        .collect()
}
