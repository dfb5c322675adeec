//! Showcase page rendering with Handlebars
//!
//! The aggregation is flattened into a serializable [`ShowcasePage`] and fed
//! to a single Handlebars template. Catalog text is HTML-escaped by the
//! template engine; the embedded JSON for the detail modal is escaped here.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{Aggregation, CatalogSummary};
use crate::catalog::ToolRecord;
use crate::category::CategoryConfig;
use crate::config::SiteConfig;
use crate::error::Result;

/// Page template compiled into the binary
pub const BUILTIN_TEMPLATE: &str = include_str!("../templates/showcase.html.hbs");

const TEMPLATE_NAME: &str = "showcase";

/// Sub-tools shown on a card before collapsing into "+N more"
pub const CARD_FEATURE_LIMIT: usize = 3;

const NO_DESCRIPTION: &str = "No description available";

/// Category filter tab
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTab<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon: &'a str,
    pub count: usize,
}

/// One tool card
#[derive(Debug, Clone, Serialize)]
pub struct ToolCard<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub features: Vec<&'a str>,
    pub more: usize,
}

impl<'a> ToolCard<'a> {
    pub fn from_record(record: &'a ToolRecord) -> Self {
        Self {
            name: &record.name,
            author: &record.author,
            description: record.description.as_deref().unwrap_or(NO_DESCRIPTION),
            features: record
                .tools
                .iter()
                .take(CARD_FEATURE_LIMIT)
                .map(String::as_str)
                .collect(),
            more: record.tools.len().saturating_sub(CARD_FEATURE_LIMIT),
        }
    }
}

/// Detail-modal entry for one tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolDetail<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub tools: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_command: Option<&'a str>,
}

impl<'a> ToolDetail<'a> {
    pub fn from_record(record: &'a ToolRecord) -> Self {
        Self {
            name: &record.name,
            author: &record.author,
            description: record.description.as_deref().unwrap_or(NO_DESCRIPTION),
            tools: &record.tools,
            install: record.install_hint(),
            start_command: record.start_command.as_deref(),
        }
    }
}

/// Cards of one category, in catalog order
#[derive(Debug, Clone, Serialize)]
pub struct CategorySection<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub icon: &'a str,
    pub cards: Vec<ToolCard<'a>>,
}

/// Everything the template sees
#[derive(Debug, Clone, Serialize)]
pub struct ShowcasePage<'a> {
    pub site: &'a SiteConfig,
    pub summary: CatalogSummary,
    pub tabs: Vec<CategoryTab<'a>>,
    pub sections: Vec<CategorySection<'a>>,
    pub generated_on: String,
    /// [`ToolDetail`]s as JSON, safe to place inside a `<script>` element
    pub tools_json: String,
}

impl<'a> ShowcasePage<'a> {
    /// Flatten an aggregation into template data
    ///
    /// Tabs follow the configured category order and only list categories
    /// that hold at least one tool. Sections follow bucket order. A bucket
    /// whose id has no configured display entry is left out and logged.
    pub fn build(
        records: &'a [ToolRecord],
        aggregation: &Aggregation<'a>,
        categories: &'a CategoryConfig,
        site: &'a SiteConfig,
        generated_on: NaiveDate,
    ) -> Result<Self> {
        let view = &aggregation.view;

        let tabs = categories
            .iter()
            .filter_map(|(id, info)| {
                view.get(id).map(|bucket| CategoryTab {
                    id,
                    name: &info.name,
                    icon: &info.icon,
                    count: bucket.tools.len(),
                })
            })
            .collect();

        let mut sections = Vec::with_capacity(view.len());
        for bucket in view.buckets() {
            let Some(info) = categories.get(bucket.id) else {
                warn!(
                    "Category '{}' has no display entry; {} tool(s) not rendered",
                    bucket.id,
                    bucket.tools.len()
                );
                continue;
            };
            sections.push(CategorySection {
                id: bucket.id,
                name: &info.name,
                icon: &info.icon,
                cards: bucket.tools.iter().map(|&r| ToolCard::from_record(r)).collect(),
            });
        }

        Ok(Self {
            site,
            summary: aggregation.summary,
            tabs,
            sections,
            generated_on: generated_on.format("%Y-%m-%d").to_string(),
            tools_json: script_safe_json(
                &records
                    .iter()
                    .map(ToolDetail::from_record)
                    .collect::<Vec<_>>(),
            )?,
        })
    }
}

/// Serialize for embedding in an inline script
///
/// `<` only occurs inside JSON strings, where `\u003c` is equivalent and
/// cannot close the surrounding `<script>` element.
fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?.replace('<', "\\u003c"))
}

/// Renders [`ShowcasePage`]s through a Handlebars template
pub struct ShowcaseRenderer {
    handlebars: Handlebars<'static>,
}

impl ShowcaseRenderer {
    /// Renderer using the builtin page template
    pub fn new() -> Result<Self> {
        Self::with_template(BUILTIN_TEMPLATE)
    }

    /// Renderer using a custom template string
    pub fn with_template(template: &str) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { handlebars })
    }

    /// Renderer using a template file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading template {}", path.display());
        let template = fs::read_to_string(path)?;
        Self::with_template(&template)
    }

    pub fn render(&self, page: &ShowcasePage<'_>) -> Result<String> {
        Ok(self.handlebars.render(TEMPLATE_NAME, page)?)
    }

    /// Render and write, creating parent directories as needed
    pub fn render_to_file(&self, page: &ShowcasePage<'_>, path: &Path) -> Result<()> {
        let html = self.render(page)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, html)?;
        Ok(())
    }
}
