//! Builtin Category Definitions
//!
//! Categories available when no `categories.json` is present, together with
//! the keywords used to auto-classify servers that declare no category.

/// Category used when nothing else matches
pub const BUILTIN_DEFAULT_CATEGORY: &str = "research";

/// Builtin categories, in keyword-matching order
pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        id: "simulation",
        name: "Simulation",
        icon: "⚛️",
        description: "Molecular dynamics, atomistic simulation and force fields.",
        keywords: &[
            "molecule",
            "atom",
            "simulation",
            "dpa",
            "deepmd",
            "dynamics",
            "md",
        ],
    },
    BuiltinCategory {
        id: "materials",
        name: "Materials Science",
        icon: "💎",
        description: "Material property prediction, crystal structures, thermoelectrics.",
        keywords: &[
            "material",
            "thermoelectric",
            "property",
            "crystal",
            "structure",
        ],
    },
    BuiltinCategory {
        id: "chemistry",
        name: "Chemistry",
        icon: "🧪",
        description: "Compound databases, reactions, catalysis and adsorption.",
        keywords: &[
            "compound",
            "pubchem",
            "chemical",
            "catalysis",
            "reaction",
            "adsorption",
        ],
    },
    BuiltinCategory {
        id: "research",
        name: "Research Tools",
        icon: "📚",
        description: "Literature search, paper retrieval and document RAG.",
        keywords: &["paper", "search", "arxiv", "document", "rag", "literature"],
    },
    BuiltinCategory {
        id: "data",
        name: "Data Analysis",
        icon: "📊",
        description: "Data processing, analysis and visualization.",
        keywords: &["data", "analysis", "visualization", "plot", "graph"],
    },
    BuiltinCategory {
        id: "machine-learning",
        name: "Machine Learning",
        icon: "🤖",
        description: "Model training, inference and neural networks.",
        keywords: &[
            "ml",
            "machine learning",
            "ai",
            "model",
            "neural",
            "network",
        ],
    },
];

/// Static definition of a builtin category
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// Category id (unique key)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Icon shown next to the name
    pub icon: &'static str,
    pub description: &'static str,
    /// Lower-case substrings that route a server into this category
    pub keywords: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_categories_exist() {
        assert!(!BUILTIN_CATEGORIES.is_empty());
        for id in ["simulation", "materials", "chemistry", "research", "data"] {
            assert!(BUILTIN_CATEGORIES.iter().any(|c| c.id == id), "missing {id}");
        }
    }

    #[test]
    fn test_builtin_default_is_builtin() {
        assert!(BUILTIN_CATEGORIES
            .iter()
            .any(|c| c.id == BUILTIN_DEFAULT_CATEGORY));
    }

    #[test]
    fn test_keywords_are_lowercase() {
        for cat in BUILTIN_CATEGORIES {
            for kw in cat.keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }
}
