//! Whole-pipeline scenario against fake toolchain scripts: discovery,
//! dependency resolution, runner generation, compile, link, execution,
//! classification and summary, with no real C compiler involved.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use ctask::config::ToolchainConfig;
use ctask::summary::{collect_result_files, SummaryAggregator};
use ctask::tasks::test::TestTask;

const PASSING_OUTPUT: &str = "test_foo.c:4:test_foo_works:PASS\n\n-----------------------\n1 Tests 0 Failures 0 Ignored\nOK\n";
const FAILING_OUTPUT: &str = "test_bar_parameterized.c:3:test_bar:FAIL: Expected 1 Was 2\n\n-----------------------\n1 Tests 1 Failures 0 Ignored\nFAIL\n";

/// Parses `-o<path>` glued tokens the way the compiler profile emits them and
/// creates the object file.
const FAKE_CC: &str = r#"#!/bin/sh
out=""
for a in "$@"; do
  case "$a" in
    -o*) out="${a#-o}" ;;
  esac
done
[ -n "$out" ] || exit 2
: > "$out"
"#;

/// Takes the output path as the token after `-o` and emits an "executable"
/// that prints the canned output stored next to it.
const FAKE_LD: &str = r#"#!/bin/sh
out=""
prev=""
for a in "$@"; do
  if [ "$prev" = "-o" ]; then out="$a"; fi
  prev="$a"
done
[ -n "$out" ] || exit 2
printf '#!/bin/sh\ncat "$0.out"\n' > "$out"
chmod +x "$out"
"#;

struct Project {
    _dir: tempfile::TempDir,
    root: PathBuf,
    cfg: ToolchainConfig,
}

fn write_script(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn set_up_project() -> Project {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();

    for sub in ["bin", "src", "test", "build", "build/runners"] {
        fs::create_dir_all(root.join(sub)).unwrap();
    }

    write_script(&root.join("bin/cc"), FAKE_CC);
    write_script(&root.join("bin/ld"), FAKE_LD);

    fs::write(root.join("src/foo.h"), "int foo(void);\n").unwrap();
    fs::write(root.join("src/foo.c"), "int foo(void) { return 1; }\n").unwrap();
    fs::write(
        root.join("test/test_foo.c"),
        "#include \"unity.h\"\n#include \"foo.h\"\n\nvoid test_foo_works(void)\n{\n  TEST_ASSERT_EQUAL(1, foo());\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("test/test_bar_parameterized.c"),
        "#include \"unity.h\"\n\nTEST_CASE(2)\nvoid test_bar(int n)\n{\n  TEST_ASSERT_EQUAL(1, n);\n}\n",
    )
    .unwrap();

    // Canned executable output, one file per test binary.
    fs::write(root.join("build/test_foo.exe.out"), PASSING_OUTPUT).unwrap();
    fs::write(
        root.join("build/test_bar_parameterized.exe.out"),
        FAILING_OUTPUT,
    )
    .unwrap();

    let profile = format!(
        r#"
compiler:
  path: {root}/bin/cc
  unit_tests_path: {root}/test/
  build_path: {root}/build/
  runner_path: {root}/build/runners/
  options: [-c]
  includes:
    prefix: '-I'
    items: ['{root}/src/', '{root}/test/']
  defines:
    prefix: '-D'
    items: []
  object_files:
    prefix: '-o'
    destination: {root}/build/
    extension: .o
linker:
  path: {root}/bin/ld
  object_files:
    path: {root}/build/
  bin_files:
    prefix: '-o'
    destination: {root}/build/
    extension: .exe
"#,
        root = root.display()
    );
    let profile_path = root.join("profile.yaml");
    fs::write(&profile_path, profile).unwrap();

    let cfg = ToolchainConfig::load(&profile_path.display().to_string()).unwrap();
    Project {
        _dir: dir,
        root,
        cfg,
    }
}

#[test]
fn full_run_builds_runs_and_classifies_both_tests() {
    let project = set_up_project();
    let root = &project.root;

    TestTask::new(project.cfg.clone(), false).execute().unwrap();

    // Two executables, with objects for the dependency, runners and tests.
    assert!(root.join("build/test_foo.exe").is_file());
    assert!(root.join("build/test_bar_parameterized.exe").is_file());
    assert!(root.join("build/foo.o").is_file());
    assert!(root.join("build/test_foo.o").is_file());
    assert!(root.join("build/test_foo_Runner.o").is_file());

    // Runners were generated where the profile says, with the parameterized
    // case expanded only for the parameterized test.
    let foo_runner = fs::read_to_string(root.join("build/runners/test_foo_Runner.c")).unwrap();
    assert!(foo_runner.contains("RUN_TEST(test_foo_works, 4);"));
    let bar_runner =
        fs::read_to_string(root.join("build/runners/test_bar_parameterized_Runner.c")).unwrap();
    assert!(bar_runner.contains("RUN_TEST(test_bar, 4, 2);"));

    // One marker per test, raw output preserved bit-exact (modulo the
    // executor's single-newline chomp).
    let pass = fs::read_to_string(root.join("build/test_foo.testpass")).unwrap();
    assert_eq!(pass, PASSING_OUTPUT.trim_end_matches('\n'));
    let fail = fs::read_to_string(root.join("build/test_bar_parameterized.testfail")).unwrap();
    assert_eq!(fail, FAILING_OUTPUT.trim_end_matches('\n'));
    assert!(!root.join("build/test_foo.testfail").exists());

    // Aggregation over the written markers matches the per-file verdicts.
    let build_path = format!("{}/build/", root.display());
    let mut summary = SummaryAggregator::new(false);
    summary.set_root_path(root);
    summary.set_targets(collect_result_files(&build_path).unwrap());
    let report = summary.run().unwrap();
    assert!(report.contains("TOTAL TESTS: 2 PASSED: 1 FAILED: 1"));
    assert!(report.contains("test_bar_parameterized.c:3:test_bar:FAIL: Expected 1 Was 2"));
}

#[test]
fn rerun_replaces_stale_markers() {
    let project = set_up_project();
    let root = &project.root;

    TestTask::new(project.cfg.clone(), false).execute().unwrap();
    assert!(root.join("build/test_bar_parameterized.testfail").is_file());

    // The test is "fixed" by swapping its canned output, then re-run.
    fs::write(
        root.join("build/test_bar_parameterized.exe.out"),
        PASSING_OUTPUT,
    )
    .unwrap();
    TestTask::new(project.cfg.clone(), false).execute().unwrap();

    assert!(root.join("build/test_bar_parameterized.testpass").is_file());
    assert!(!root.join("build/test_bar_parameterized.testfail").exists());
}

#[test]
fn broken_compiler_aborts_the_run_before_linking() {
    let project = set_up_project();
    let root = &project.root;

    write_script(&root.join("bin/cc"), "#!/bin/sh\nexit 1\n");

    let err = TestTask::new(project.cfg.clone(), false)
        .execute()
        .unwrap_err();
    assert!(matches!(
        err,
        ctask::utils::ToolError::BuildFailed { code: 1, .. }
    ));
    assert!(!root.join("build/test_bar_parameterized.exe").exists());
    assert!(!root.join("build/test_foo.exe").exists());
}
