//! Per-test build-unit assembly: compilation of every source a test needs,
//! in a fixed deterministic order, and the final link.

use std::path::{Path, PathBuf};

use log::debug;

use crate::command::{CommandExecutor, CommandLine};
use crate::config::ToolchainConfig;
use crate::deps;
use crate::runner_gen::{classify_test_kind, RunnerGenerator, TestKind};
use crate::utils::{ToolError, ToolResult};

/// Redirects the framework's character output into the spy the framework's
/// own self-tests link against.
pub const OUTPUT_CHAR_DEFINE: &str = "UNITY_OUTPUT_CHAR=putcharSpy";

/// Everything needed to link and run one test file. Created at the start of
/// processing a test, discarded once linked.
#[derive(Debug)]
pub struct BuildUnit {
    pub test_file: PathBuf,
    pub test_base: String,
    pub kind: TestKind,
    pub runner_path: PathBuf,
    /// Object file names (not paths), in link order: aux sources, resolved
    /// dependencies, runner, test.
    pub objects: Vec<String>,
}

pub struct TestBuilder<'a> {
    cfg: &'a ToolchainConfig,
    exec: &'a dyn CommandExecutor,
}

impl<'a> TestBuilder<'a> {
    pub fn new(cfg: &'a ToolchainConfig, exec: &'a dyn CommandExecutor) -> Self {
        TestBuilder { cfg, exec }
    }

    /// Compiles one source file to an object under the configured object
    /// directory and returns the bare object file name, reused as-is by the
    /// link step. A nonzero compiler exit aborts the whole run.
    pub fn compile(&self, source: &Path, extra_defines: &[String]) -> ToolResult<String> {
        let c = &self.cfg.compiler;
        let object_file = format!("{}{}", base_name(source), c.object_files.extension);

        let mut defines = c.defines.items.clone();
        defines.push(OUTPUT_CHAR_DEFINE.to_string());
        defines.extend(extra_defines.iter().cloned());

        let cmd = CommandLine::new(&c.path)
            .prefixed(&c.defines.prefix, &defines)
            .args(&c.options)
            .prefixed(&c.includes.prefix, &c.includes.items)
            .arg(source.display().to_string())
            .arg(format!(
                "{}{}{}",
                c.object_files.prefix, c.object_files.destination, object_file
            ));

        debug!("compile: {}", cmd);
        let out = self.exec.execute(&cmd)?;
        if out.code != 0 {
            return Err(ToolError::BuildFailed {
                command: cmd.to_string(),
                code: out.code,
            });
        }
        Ok(object_file)
    }

    /// Builds the full object list for one test file: auxiliary sources
    /// first, then the source counterpart of each quoted include that has
    /// one, then the generated runner, then the test itself.
    pub fn assemble(
        &self,
        test_file: &Path,
        generator: &dyn RunnerGenerator,
    ) -> ToolResult<BuildUnit> {
        let c = &self.cfg.compiler;
        let test_base = base_name(test_file);
        let kind = classify_test_kind(test_file);
        let mut objects = Vec::new();

        for aux in &c.aux_sources {
            objects.push(self.compile(Path::new(aux), &[])?);
        }

        for header in deps::extract_headers(test_file)? {
            if let Some(source) = deps::find_source_file(&header, &c.includes.items) {
                objects.push(self.compile(&source, &[])?);
            }
        }

        let runner_path =
            Path::new(self.cfg.runner_source_dir()).join(format!("{test_base}_Runner.c"));
        // Copy-then-override: the shared runner options must not carry one
        // file's parameterized flag into the next.
        let mut options = self.cfg.runner.clone();
        options.use_param_tests = kind == TestKind::Parameterized;
        generator.generate(&options, test_file, &runner_path)?;
        objects.push(self.compile(&runner_path, &[])?);

        objects.push(self.compile(test_file, &[])?);

        Ok(BuildUnit {
            test_file: test_file.to_path_buf(),
            test_base,
            kind,
            runner_path,
            objects,
        })
    }

    /// Links an object list into `<destination><exe_base><extension>` and
    /// returns the executable path. Same fatal-on-nonzero policy as compile.
    pub fn link(&self, exe_base: &str, objects: &[String]) -> ToolResult<PathBuf> {
        let l = &self.cfg.linker;
        let exe_path = format!(
            "{}{}{}",
            l.bin_files.destination, exe_base, l.bin_files.extension
        );

        let mut cmd = CommandLine::new(&l.path)
            .args(&l.options)
            .prefixed(&l.includes.prefix, &l.includes.items);
        for object in objects {
            cmd = cmd.arg(format!("{}{}", l.object_files.path, object));
        }
        if !l.bin_files.prefix.is_empty() {
            cmd = cmd.arg(&l.bin_files.prefix);
        }
        let cmd = cmd.arg(&exe_path);

        debug!("link: {}", cmd);
        let out = self.exec.execute(&cmd)?;
        if out.code != 0 {
            return Err(ToolError::BuildFailed {
                command: cmd.to_string(),
                code: out.code,
            });
        }
        Ok(PathBuf::from(exe_path))
    }
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
