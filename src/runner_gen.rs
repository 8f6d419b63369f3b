//! Test-runner source generation.
//!
//! Each test file gets a synthesized `<base>_Runner.c` providing `main`,
//! which invokes every discovered `test_*` function through the framework's
//! begin/conclude bookkeeping. The orchestrator only calls `generate` and
//! compiles the result; swapping in another generator is a matter of
//! implementing [`RunnerGenerator`].

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::utils::ToolResult;

/// Generator options, read from the profile's `runner:` section. Cloned per
/// test file before the parameterized override is applied, so the shared
/// defaults never change mid-run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunnerOptions {
    pub use_param_tests: bool,
    pub framework_header: String,
    pub setup_name: String,
    pub teardown_name: String,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        RunnerOptions {
            use_param_tests: false,
            framework_header: "unity.h".to_string(),
            setup_name: "setUp".to_string(),
            teardown_name: "tearDown".to_string(),
        }
    }
}

/// How a test file's runner is generated, decided once per file from the
/// filename and threaded through as a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    Standard,
    Parameterized,
}

/// Files following the `*parameterized*` naming convention get
/// parameterized-case support in their runner.
pub fn classify_test_kind(test_file: &Path) -> TestKind {
    let name = test_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.contains("parameterized") {
        TestKind::Parameterized
    } else {
        TestKind::Standard
    }
}

pub trait RunnerGenerator {
    /// Writes a runner source file for `test_file` to `out_path`.
    fn generate(&self, options: &RunnerOptions, test_file: &Path, out_path: &Path)
        -> ToolResult<()>;
}

/// Scans the test source for `void test_*` functions (plus `TEST_CASE`
/// argument lists when parameterized support is on) and emits a runner with
/// one `RUN_TEST` per case.
pub struct DefaultRunnerGenerator;

struct DiscoveredTest {
    name: String,
    line: usize,
    cases: Vec<String>,
}

fn test_function_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*void\s+(test\w+)\s*\(").expect("test pattern is valid"))
}

fn test_case_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*TEST_CASE\s*\((.*)\)\s*$").expect("case pattern is valid"))
}

fn scan_tests(source: &str, use_param_tests: bool) -> Vec<DiscoveredTest> {
    let mut tests = Vec::new();
    let mut pending_cases: Vec<String> = Vec::new();

    for (index, line) in source.lines().enumerate() {
        if use_param_tests {
            if let Some(caps) = test_case_pattern().captures(line) {
                pending_cases.push(caps[1].trim().to_string());
                continue;
            }
        }
        if let Some(caps) = test_function_pattern().captures(line) {
            tests.push(DiscoveredTest {
                name: caps[1].to_string(),
                line: index + 1,
                cases: std::mem::take(&mut pending_cases),
            });
        }
    }

    tests
}

impl RunnerGenerator for DefaultRunnerGenerator {
    fn generate(
        &self,
        options: &RunnerOptions,
        test_file: &Path,
        out_path: &Path,
    ) -> ToolResult<()> {
        let source = fs::read_to_string(test_file)?;
        let tests = scan_tests(&source, options.use_param_tests);
        let file_name = test_file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let mut runner = String::new();
        runner.push_str("/* AUTOGENERATED FILE. DO NOT EDIT. */\n");
        runner.push_str(&format!("#include \"{}\"\n\n", options.framework_header));
        runner.push_str(&format!("extern void {}(void);\n", options.setup_name));
        runner.push_str(&format!("extern void {}(void);\n\n", options.teardown_name));

        for test in &tests {
            runner.push_str(&format!("extern void {}();\n", test.name));
        }

        let macro_lines = [
            "".to_string(),
            "#define RUN_TEST(TestFunc, TestLineNum, ...) \\".to_string(),
            "{ \\".to_string(),
            "  Unity.CurrentTestName = #TestFunc; \\".to_string(),
            "  Unity.CurrentTestLineNumber = TestLineNum; \\".to_string(),
            "  Unity.NumberOfTests++; \\".to_string(),
            "  if (TEST_PROTECT()) \\".to_string(),
            "  { \\".to_string(),
            format!("    {}(); \\", options.setup_name),
            "    TestFunc(__VA_ARGS__); \\".to_string(),
            "  } \\".to_string(),
            "  if (TEST_PROTECT()) \\".to_string(),
            "  { \\".to_string(),
            format!("    {}(); \\", options.teardown_name),
            "  } \\".to_string(),
            "  UnityConcludeTest(); \\".to_string(),
            "}".to_string(),
            "".to_string(),
        ];
        for line in &macro_lines {
            runner.push_str(line);
            runner.push('\n');
        }

        runner.push_str("int main(void)\n{\n");
        runner.push_str(&format!("  UnityBegin(\"{}\");\n", file_name));
        for test in &tests {
            if test.cases.is_empty() {
                runner.push_str(&format!("  RUN_TEST({}, {});\n", test.name, test.line));
            } else {
                for case in &test.cases {
                    runner.push_str(&format!(
                        "  RUN_TEST({}, {}, {});\n",
                        test.name, test.line, case
                    ));
                }
            }
        }
        runner.push_str("  return UnityEnd();\n}\n");

        fs::write(out_path, runner)?;
        Ok(())
    }
}
