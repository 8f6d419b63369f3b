//! Aggregation of marker files into a run summary.
//!
//! The task layer hands this a root path (for relativizing report paths) and
//! the marker files it globbed from the build directory; it never re-derives
//! build decisions from them, it only reports.

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::outcome::{FAIL_EXTENSION, PASS_EXTENSION};
use crate::utils::ToolResult;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Per-test result lines the framework prints, e.g.
/// `test_widget.c:12:test_grows:FAIL: Expected 2 Was 3`.
fn result_line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.+:\d+:\w+:(FAIL|IGNORE)").expect("result line pattern is valid")
    })
}

#[derive(Debug, Default)]
pub struct SummaryAggregator {
    root_path: PathBuf,
    targets: Vec<PathBuf>,
    colour: bool,
}

impl SummaryAggregator {
    pub fn new(colour: bool) -> Self {
        SummaryAggregator {
            colour,
            ..SummaryAggregator::default()
        }
    }

    pub fn set_root_path(&mut self, path: impl Into<PathBuf>) {
        self.root_path = path.into();
    }

    pub fn set_targets(&mut self, targets: Vec<PathBuf>) {
        self.targets = targets;
    }

    /// Reads every target marker file and renders the report: failed and
    /// ignored test sections, then the overall counts. One marker file is one
    /// test executable.
    pub fn run(&self) -> ToolResult<String> {
        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut failures: Vec<String> = Vec::new();
        let mut ignores: Vec<String> = Vec::new();

        for target in &self.targets {
            let name = target
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if name.ends_with(PASS_EXTENSION) {
                passed += 1;
            } else if name.ends_with(FAIL_EXTENSION) {
                failed += 1;
            } else {
                continue;
            }

            let content = fs::read_to_string(target)?;
            for line in content.lines() {
                if let Some(caps) = result_line_pattern().captures(line) {
                    let entry = self.relativize(line);
                    match &caps[1] {
                        "FAIL" => failures.push(entry),
                        _ => ignores.push(entry),
                    }
                }
            }
        }

        let mut report = String::new();
        if !ignores.is_empty() {
            push_section(&mut report, "IGNORED TEST SUMMARY", &ignores);
        }
        if !failures.is_empty() {
            push_section(&mut report, "FAILED TEST SUMMARY", &failures);
        }

        let total = passed + failed;
        let overall = format!(
            "TOTAL TESTS: {} PASSED: {} FAILED: {}",
            total, passed, failed
        );
        report.push_str("--------------------------\n");
        report.push_str("OVERALL TEST SUMMARY\n");
        report.push_str("--------------------------\n");
        if self.colour {
            let tint = if failed > 0 { RED } else { GREEN };
            report.push_str(&format!("{}{}{}\n", tint, overall, RESET));
        } else {
            report.push_str(&overall);
            report.push('\n');
        }
        Ok(report)
    }

    fn relativize(&self, line: &str) -> String {
        let root = format!("{}/", self.root_path.display());
        line.strip_prefix(&root).unwrap_or(line).to_string()
    }
}

fn push_section(report: &mut String, title: &str, entries: &[String]) {
    report.push_str("--------------------------\n");
    report.push_str(title);
    report.push('\n');
    report.push_str("--------------------------\n");
    for entry in entries {
        report.push_str(entry);
        report.push('\n');
    }
    report.push('\n');
}

/// Marker files under the build path, i.e. the `<build_path>*.test*` set,
/// sorted for a stable report.
pub fn collect_result_files(build_path: &str) -> ToolResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(build_path)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if path.is_file() && name.contains(".test") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
