//! Pipeline integration tests
//!
//! These tests drive the full resolve, link and bundle pipeline against temporary
//! directories, with the external tools replaced by a MockProcessRunner:
//! - Executable archive selection and classpath generation
//! - Short-circuiting when no platform modules are needed
//! - Failing before the output directory is touched
//! - Idempotent reruns

use linkpack::bundler::{BundleError, SEPARATOR};
use linkpack::{
    BuildConfig, MockProcessRunner, MockResponse, PipelineContext, PipelineOrchestrator,
    PipelineReport,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn with_archives(names: &[&str]) -> Self {
        let temp = TempDir::new().unwrap();
        let libs = temp.path().join("build").join("libs");
        fs::create_dir_all(&libs).unwrap();
        for name in names {
            fs::write(libs.join(name), format!("PK archive {}", name)).unwrap();
        }
        Self { temp }
    }

    fn root(&self) -> &Path {
        self.temp.path()
    }

    fn output_dir(&self) -> PathBuf {
        self.root().join("build").join("app")
    }

    fn config(&self) -> linkpack::BuildConfigBuilder {
        BuildConfig::builder().java_home(self.root().join("jdk"))
    }
}

/// Mock runner whose linker materialises the image layout at `--output`
fn runner_with_deps(jdeps_output: &str) -> Arc<MockProcessRunner> {
    let runner = Arc::new(MockProcessRunner::new());
    runner.respond("jdeps", MockResponse::stdout(jdeps_output));
    runner.respond(
        "jlink",
        MockResponse::success().with_side_effect(|command| {
            let output = command
                .arg_after("--output")
                .map(PathBuf::from)
                .unwrap_or_default();
            fs::create_dir_all(output.join("lib"))?;
            fs::create_dir_all(output.join("bin"))?;
            fs::write(output.join("lib").join("modules"), "image")
        }),
    );
    runner
}

async fn run(config: BuildConfig, runner: &Arc<MockProcessRunner>) -> anyhow::Result<PipelineReport> {
    let context = PipelineContext::new(config, runner.clone());
    PipelineOrchestrator::new(context).execute().await
}

#[tokio::test]
async fn test_single_archive_bundles_without_classpath() {
    let ws = Workspace::with_archives(&["only.jar"]);
    let runner = runner_with_deps("   java.base\n   java.logging\n");
    let config = ws.config().main_class("app.Main").build_relative_to(ws.root()).unwrap();

    let report = run(config, &runner).await.unwrap();

    assert_eq!(report.modules, vec!["java.base", "java.logging"]);
    assert_eq!(report.executable_archive.as_deref(), Some("only.jar"));

    let launcher = ws.output_dir().join("bin").join("app");
    let script = fs::read_to_string(&launcher).unwrap();
    let lib = ws.output_dir().join("lib");
    assert!(script.starts_with("#!/usr/bin/env bash\n"));
    assert!(script.contains(&format!("-jar {} app.Main", lib.join("only.jar").display())));
    assert!(!script.contains("-cp"));
    assert!(script.trim_end().ends_with("\"$@\""));
    assert!(lib.join("only.jar").is_file());
}

#[tokio::test]
async fn test_explicit_archive_puts_others_on_classpath() {
    let ws = Workspace::with_archives(&["a.jar", "b.jar"]);
    let runner = runner_with_deps("java.base\n");
    let config = ws
        .config()
        .main_class("app.Main")
        .executable_jar("a.jar")
        .build_relative_to(ws.root())
        .unwrap();

    let report = run(config, &runner).await.unwrap();

    let b = ws.output_dir().join("lib").join("b.jar");
    assert_eq!(report.classpath.as_deref(), Some(b.display().to_string().as_str()));

    let script = fs::read_to_string(ws.output_dir().join("bin").join("app")).unwrap();
    assert!(script.contains(&format!("-cp {} ", b.display())));
    assert!(!script.contains(&format!("{}{}", SEPARATOR, ws.output_dir().join("lib").join("a.jar").display())));
}

#[tokio::test]
async fn test_ambiguous_archives_fail_before_linking() {
    let ws = Workspace::with_archives(&["a.jar", "b.jar"]);
    let runner = runner_with_deps("java.base\n");
    let config = ws.config().main_class("app.Main").build_relative_to(ws.root()).unwrap();

    let err = run(config, &runner).await.unwrap_err();

    let bundle_error = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<BundleError>())
        .expect("bundle error in chain");
    assert!(matches!(
        bundle_error,
        BundleError::ExecutableArchiveCount { count: 2, .. }
    ));
    assert!(format!("{:#}", err).contains("found 2"));
    assert!(runner.calls_to("jlink").is_empty());
    assert!(!ws.output_dir().exists());
}

#[tokio::test]
async fn test_no_platform_modules_skips_link_and_bundle() {
    let ws = Workspace::with_archives(&["a.jar", "b.jar"]);
    let runner = runner_with_deps("   com.acme.util\n   org.slf4j\n");
    let config = ws.config().main_class("app.Main").build_relative_to(ws.root()).unwrap();

    let report = run(config, &runner).await.unwrap();

    assert!(report.skipped);
    assert!(report.modules.is_empty());
    assert_eq!(report.archives.len(), 2);
    assert!(runner.calls_to("jlink").is_empty());
    assert!(!ws.output_dir().exists());
}

#[tokio::test]
async fn test_empty_libs_dir_skips() {
    let ws = Workspace::with_archives(&[]);
    let runner = runner_with_deps("java.base\n");
    let config = ws.config().build_relative_to(ws.root()).unwrap();

    let report = run(config, &runner).await.unwrap();

    assert!(report.skipped);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let ws = Workspace::with_archives(&["app.jar", "dep.jar"]);
    let runner = runner_with_deps("java.base\n");
    let config = ws
        .config()
        .main_class("app.Main")
        .executable_jar("app.jar")
        .jvm_args("-Xmx64m")
        .build_relative_to(ws.root())
        .unwrap();

    run(config.clone(), &runner).await.unwrap();
    let launcher = ws.output_dir().join("bin").join("app");
    let first_script = fs::read(&launcher).unwrap();
    let first_lib = listing(&ws.output_dir().join("lib"));

    fs::write(ws.output_dir().join("lib").join("leftover.jar"), "stale").unwrap();
    run(config, &runner).await.unwrap();

    assert_eq!(fs::read(&launcher).unwrap(), first_script);
    assert_eq!(listing(&ws.output_dir().join("lib")), first_lib);
    assert_eq!(runner.calls_to("jlink").len(), 2);
}

#[tokio::test]
async fn test_link_only_without_main_class() {
    let ws = Workspace::with_archives(&["a.jar", "b.jar"]);
    let runner = runner_with_deps("java.base\n");
    let config = ws.config().build_relative_to(ws.root()).unwrap();

    let report = run(config, &runner).await.unwrap();

    assert_eq!(report.runtime_dir, Some(ws.output_dir()));
    assert!(report.launchers.is_empty());
    assert!(!ws.output_dir().join("bin").join("app").exists());
    assert!(!ws.output_dir().join("lib").join("a.jar").exists());
}

#[tokio::test]
async fn test_all_modules_bypasses_analysis() {
    let ws = Workspace::with_archives(&["app.jar"]);
    let runner = runner_with_deps("java.base\n");
    runner.respond(
        "java",
        MockResponse::stdout("java.base@21\njava.desktop@21\njdk.httpserver@21\n"),
    );
    let config = ws
        .config()
        .all_modules(true)
        .main_class("app.Main")
        .build_relative_to(ws.root())
        .unwrap();

    let report = run(config, &runner).await.unwrap();

    assert_eq!(report.modules, vec!["java.base", "java.desktop", "jdk.httpserver"]);
    assert!(runner.calls_to("jdeps").is_empty());
    let list = &runner.calls_to("java")[0];
    assert!(list.has_arg("--list-modules"));
    assert_eq!(
        list.arg_after("--module-path").map(PathBuf::from),
        Some(ws.root().join("jdk").join("jmods"))
    );
}

#[tokio::test]
async fn test_fat_jar_analyses_only_executable_archive() {
    let ws = Workspace::with_archives(&["app-all.jar", "thin.jar"]);
    let runner = runner_with_deps("java.base\n");
    let config = ws
        .config()
        .fat_jar(true)
        .executable_jar("app-all.jar")
        .main_class("app.Main")
        .build_relative_to(ws.root())
        .unwrap();

    run(config, &runner).await.unwrap();

    let analysed = runner.calls_to("jdeps");
    assert_eq!(analysed.len(), 1);
    assert!(analysed[0].has_arg(ws.root().join("build").join("libs").join("app-all.jar")));
}

#[tokio::test]
async fn test_analysis_failure_aborts_pipeline() {
    let ws = Workspace::with_archives(&["good.jar", "corrupt.jar"]);
    let runner = runner_with_deps("java.base\n");
    runner.respond_for("jdeps", "corrupt.jar", MockResponse::failure(1, "Error: not a jar"));
    let config = ws.config().main_class("app.Main").build_relative_to(ws.root()).unwrap();

    let err = run(config, &runner).await.unwrap_err();

    assert!(err.to_string().contains("ResolvePhase"));
    assert!(format!("{:#}", err).contains("corrupt.jar"));
    assert!(!ws.output_dir().exists());
}

fn listing(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            (
                p.file_name().unwrap().to_string_lossy().into_owned(),
                fs::read(&p).unwrap(),
            )
        })
        .collect();
    entries.sort();
    entries
}
