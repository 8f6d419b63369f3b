//! Dependency resolution from include directives.
//!
//! Only quoted includes are considered: angle-bracket includes name system
//! headers that never map to project sources. Resolution is deliberately one
//! level deep; headers included by a resolved source are not chased further,
//! which is sufficient for the small modules this tool builds.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::ToolResult;

fn include_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*#include\s+"\s*(.+\.[hH])\s*""#).expect("include pattern is valid")
    })
}

/// Header names a source file pulls in through quoted include directives, in
/// line order, at most one per line.
pub fn extract_headers(file: &Path) -> ToolResult<Vec<String>> {
    let text = fs::read_to_string(file)?;
    Ok(text
        .lines()
        .filter_map(|line| include_pattern().captures(line))
        .map(|caps| caps[1].to_string())
        .collect())
}

/// First directory on the ordered candidate list holding a `.c` counterpart
/// for `header`. `None` is not an error: pure-declaration headers have no
/// source and are skipped by the caller.
pub fn find_source_file(header: &str, include_dirs: &[String]) -> Option<PathBuf> {
    let source_name = Path::new(header).with_extension("c");
    include_dirs
        .iter()
        .map(|dir| Path::new(dir).join(&source_name))
        .find(|candidate| candidate.is_file())
}
