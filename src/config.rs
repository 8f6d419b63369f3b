//! Toolchain profile loading.
//!
//! Profiles are YAML files, one per target toolchain, normally kept under
//! `targets/`. A profile is loaded once by the setup phase and passed by
//! reference into the task layer; nothing mutates it afterwards except the
//! one-time `TEST` define injection.

use std::path::{Path, PathBuf};

use figment::providers::{Format, Yaml};
use figment::Figment;
use serde::Deserialize;

use crate::runner_gen::RunnerOptions;
use crate::utils::{ToolError, ToolResult};

/// Define injected once per run so unit-test sources see `#ifdef TEST`.
pub const TEST_DEFINE: &str = "TEST";

/// An option category: a per-item flag prefix plus its items.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PrefixedList {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Object-file naming: `<prefix><destination><source-base><extension>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectNaming {
    #[serde(default)]
    pub prefix: String,
    pub destination: String,
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    pub path: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub defines: PrefixedList,
    #[serde(default)]
    pub includes: PrefixedList,
    pub object_files: ObjectNaming,
    /// Where objects, marker files and (by default) runners land. Treated as
    /// a filename prefix, so it wants a trailing separator.
    pub build_path: String,
    #[serde(default)]
    pub runner_path: Option<String>,
    pub unit_tests_path: String,
    /// Sources compiled into every test executable regardless of what the
    /// test includes.
    #[serde(default)]
    pub aux_sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LinkerObjects {
    #[serde(default)]
    pub path: String,
}

/// Executable naming: prefix token, then `<destination><base><extension>`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinNaming {
    #[serde(default)]
    pub prefix: String,
    pub destination: String,
    #[serde(default)]
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkerConfig {
    pub path: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub includes: PrefixedList,
    #[serde(default)]
    pub object_files: LinkerObjects,
    pub bin_files: BinNaming,
}

/// Optional wrapper for running cross-compiled executables on the host,
/// e.g. an instruction-set emulator. A profile may configure support
/// arguments without a wrapper binary; the first token then acts as the
/// program.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub pre_support: Vec<String>,
    #[serde(default)]
    pub post_support: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolchainConfig {
    pub compiler: CompilerConfig,
    pub linker: LinkerConfig,
    #[serde(default)]
    pub simulator: Option<SimulatorConfig>,
    #[serde(default)]
    pub runner: RunnerOptions,
    #[serde(default)]
    pub colour: bool,
}

impl ToolchainConfig {
    /// Loads a profile. A bare name resolves to `targets/<name>.yaml`;
    /// anything containing a path separator is used as an explicit path.
    pub fn load(target: &str) -> ToolResult<Self> {
        let path = resolve_profile(target);
        if !path.is_file() {
            return Err(ToolError::ConfigNotFound(path.display().to_string()));
        }
        let cfg = Figment::new().merge(Yaml::file(&path)).extract()?;
        Ok(cfg)
    }

    /// Appends the `TEST` define if absent. Idempotent: the define appears
    /// exactly once per run no matter how often this is called.
    pub fn inject_test_define(&mut self) {
        let items = &mut self.compiler.defines.items;
        if !items.iter().any(|d| d == TEST_DEFINE) {
            items.push(TEST_DEFINE.to_string());
        }
    }

    /// Directory the generated runners are written to.
    pub fn runner_source_dir(&self) -> &str {
        self.compiler
            .runner_path
            .as_deref()
            .unwrap_or(&self.compiler.build_path)
    }
}

fn resolve_profile(target: &str) -> PathBuf {
    if target.contains('/') || target.contains('\\') {
        PathBuf::from(target)
    } else if target.ends_with(".yaml") || target.ends_with(".yml") {
        Path::new("targets").join(target)
    } else {
        Path::new("targets").join(format!("{target}.yaml"))
    }
}
