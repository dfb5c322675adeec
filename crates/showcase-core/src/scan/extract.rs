//! Sub-tool extraction from Python server sources
//!
//! A sub-tool is any function whose decorator list contains `@<name>.tool`
//! or `@<name>.tool(...)`, at module level or nested in a factory function.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::Result;

/// Server entry points searched for tool definitions
pub const SERVER_FILE_PATTERNS: &[&str] = &["server.py", "*_server.py", "*_mcp_server.py"];

/// Module files that never define tools
const SKIPPED_MODULE_FILES: &[&str] = &["utils.py", "comm.py"];

static TOOL_DECORATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@\w+\.tool\b").expect("valid decorator regex"));

static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)\s*\(").expect("valid def regex")
});

/// Function names decorated as tools in one source text, in order of appearance
///
/// A tool decorator applies to the next `def` only across blank lines,
/// comments, other decorators and decorator argument lines.
pub fn extract_tool_names(source: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut pending = false;
    let mut open_parens = 0i32;

    for line in source.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if open_parens > 0 {
            open_parens += paren_balance(line);
            continue;
        }
        if trimmed.starts_with('@') {
            pending |= TOOL_DECORATOR.is_match(line);
            open_parens = paren_balance(line).max(0);
            continue;
        }
        if let Some(caps) = FUNCTION_DEF.captures(line) {
            if pending {
                names.push(caps[1].to_string());
            }
        }
        pending = false;
    }

    names
}

fn paren_balance(line: &str) -> i32 {
    line.chars().fold(0, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

/// Source files of a server that may declare tools
pub fn tool_source_files(server_dir: &Path) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&server_dir.to_string_lossy());
    let mut files = BTreeSet::new();

    for pattern in SERVER_FILE_PATTERNS {
        for entry in glob::glob(&format!("{}/{}", base, pattern))?.flatten() {
            files.insert(entry);
        }
    }

    for entry in glob::glob(&format!("{}/src/*/modules/*.py", base))?.flatten() {
        let skip = entry
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('_') || SKIPPED_MODULE_FILES.contains(&n))
            .unwrap_or(true);
        if !skip {
            files.insert(entry);
        }
    }

    Ok(files.into_iter().collect())
}

/// All tool names declared by a server, de-duplicated and sorted
///
/// Unreadable files are skipped.
pub fn extract_server_tools(server_dir: &Path) -> Result<Vec<String>> {
    let mut tools = BTreeSet::new();

    for file in tool_source_files(server_dir)? {
        match fs::read_to_string(&file) {
            Ok(source) => {
                let found = extract_tool_names(&source);
                debug!("{}: {} tool(s)", file.display(), found.len());
                tools.extend(found);
            }
            Err(e) => debug!("Failed to read {}: {}", file.display(), e),
        }
    }

    Ok(tools.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FACTORY_SERVER: &str = r#"
from server_utils import mcp_server

@mcp_server("PubChem", "Chemical compound data retrieval", author="@deepmodeling", category="chemistry")
def create_server(host="0.0.0.0", port=50001):
    mcp = FastMCP("pubchem", host=host, port=port)

    @mcp.tool()
    def get_pubchem_data(query: str) -> str:
        return query

    def helper():
        pass

    @mcp.tool
    async def download_structure(cid: str) -> str:
        return cid

    return mcp
"#;

    #[test]
    fn test_nested_tools() {
        let names = extract_tool_names(FACTORY_SERVER);
        assert_eq!(names, vec!["get_pubchem_data", "download_structure"]);
    }

    #[test]
    fn test_module_level_tools_with_stacked_decorators() {
        let source = r#"
mcp = FastMCP("rdkit")

@mcp.tool(
    name="smiles_to_mol",
)
@log_calls
def smiles_to_mol(smiles):
    ...

@other.decorator
def not_a_tool():
    ...
"#;
        assert_eq!(extract_tool_names(source), vec!["smiles_to_mol"]);
    }

    #[test]
    fn test_decorator_in_docstring_not_carried() {
        let source = r#"
def usage():
    """
    @mcp.tool
    """
    return 1

def helper():
    pass
"#;
        assert!(extract_tool_names(source).is_empty());
    }

    #[test]
    fn test_decorated_class_not_carried() {
        let source = r#"
@mcp.tool
class Registry:
    def lookup(self):
        pass

@mcp.tool()
# comment between decorator and def
def search():
    pass
"#;
        assert_eq!(extract_tool_names(source), vec!["search"]);
    }

    #[test]
    fn test_tool_attribute_prefix_not_matched() {
        let source = "@mcp.toolbox()\ndef nope():\n    pass\n";
        assert!(extract_tool_names(source).is_empty());
    }

    #[test]
    fn test_extract_server_tools_scans_patterns() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("server.py"), "@mcp.tool()\ndef b_tool():\n    pass\n").unwrap();
        fs::write(
            dir.join("thermo_mcp_server.py"),
            "@mcp.tool()\ndef a_tool():\n    pass\n@mcp.tool()\ndef b_tool():\n    pass\n",
        )
        .unwrap();
        fs::write(dir.join("other.py"), "@mcp.tool()\ndef ignored():\n    pass\n").unwrap();

        let modules = dir.join("src").join("abacus").join("modules");
        fs::create_dir_all(&modules).unwrap();
        fs::write(modules.join("relax.py"), "@mcp.tool()\ndef relax():\n    pass\n").unwrap();
        fs::write(modules.join("utils.py"), "@mcp.tool()\ndef util():\n    pass\n").unwrap();
        fs::write(modules.join("_private.py"), "@mcp.tool()\ndef hidden():\n    pass\n").unwrap();

        let tools = extract_server_tools(dir).unwrap();
        assert_eq!(tools, vec!["a_tool", "b_tool", "relax"]);
    }

    #[test]
    fn test_extract_server_tools_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert!(extract_server_tools(tmp.path()).unwrap().is_empty());
    }
}
