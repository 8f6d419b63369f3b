//! Pass/fail classification of captured test output and the marker files
//! recording it.

use std::fs;
use std::path::PathBuf;

use crate::utils::ToolResult;

/// Trailing line a fully passing run ends with.
pub const SUCCESS_MARKER: &str = "OK";

pub const PASS_EXTENSION: &str = ".testpass";
pub const FAIL_EXTENSION: &str = ".testfail";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn extension(self) -> &'static str {
        match self {
            Verdict::Pass => PASS_EXTENSION,
            Verdict::Fail => FAIL_EXTENSION,
        }
    }

    fn opposite(self) -> Verdict {
        match self {
            Verdict::Pass => Verdict::Fail,
            Verdict::Fail => Verdict::Pass,
        }
    }
}

/// PASS iff the last nonblank line of the output is exactly the success
/// marker. A trailing-line match, not a substring search: a test named
/// `test_OK` or output ending in `OKAY` must not pass.
pub fn classify(output: &str) -> Verdict {
    match output.trim_end().lines().next_back() {
        Some(line) if line.trim() == SUCCESS_MARKER => Verdict::Pass,
        _ => Verdict::Fail,
    }
}

/// The durable artifact of one test run: the raw captured output, stored
/// under a name that encodes the verdict.
#[derive(Debug)]
pub struct TestOutcome {
    pub test_base: String,
    pub verdict: Verdict,
    pub output: String,
}

impl TestOutcome {
    pub fn new(test_base: String, output: String) -> Self {
        let verdict = classify(&output);
        TestOutcome {
            test_base,
            verdict,
            output,
        }
    }

    /// Writes the output verbatim to `<build_path><test_base><extension>`.
    /// A stale marker of the opposite verdict from an earlier run is removed
    /// first, so at most one marker per test base exists afterwards.
    pub fn write(&self, build_path: &str) -> ToolResult<PathBuf> {
        let stale = marker_path(build_path, &self.test_base, self.verdict.opposite());
        if stale.is_file() {
            fs::remove_file(&stale)?;
        }

        let path = marker_path(build_path, &self.test_base, self.verdict);
        fs::write(&path, &self.output)?;
        Ok(path)
    }
}

fn marker_path(build_path: &str, test_base: &str, verdict: Verdict) -> PathBuf {
    PathBuf::from(format!(
        "{}{}{}",
        build_path,
        test_base,
        verdict.extension()
    ))
}
