//! Tests for the bundling pipeline.

use super::*;
use crate::fetch::INSTALLERS;
use crate::source::{JASECI_BRANCH, JASECI_REPO_URL};
use crate::test_utils::{
    ExpectedCall, StubExecutor, SyntheticSource, failure_output, success_output,
};
use rstest::{fixture, rstest};
use std::fs;
use std::io::Read;

#[fixture]
fn synthetic() -> SyntheticSource {
    SyntheticSource::new()
}

fn local_request<'a>(
    source: &'a SyntheticSource,
    output: &'a Utf8Path,
    quiet: bool,
) -> BundleRequest<'a> {
    BundleRequest {
        source_dir: Some(source.source_dir()),
        remote: RemoteRepository::default(),
        output,
        quiet,
    }
}

fn read_entry(output: &Utf8Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(output).expect("open")).expect("zip");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut content = String::new();
    entry.read_to_string(&mut content).expect("read entry");
    content
}

fn entry_names(output: &Utf8Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(fs::File::open(output).expect("open")).expect("zip");
    archive.file_names().map(str::to_owned).collect()
}

#[rstest]
fn local_source_produces_clean_patched_archive(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("dist/jaclang.zip");
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    let outcome = run_bundle(&executor, &local_request(&synthetic, &output, false), &mut stderr)
        .expect("bundle should succeed");

    executor.assert_finished();
    assert_eq!(outcome.package_root, synthetic.package_root());
    assert_eq!(outcome.fetch, FetchOutcome::AlreadyPresent);
    assert_eq!(outcome.copy.files_patched, 2);

    let names = entry_names(&output);
    assert!(names.iter().all(|name| name.starts_with("jaclang/")));
    assert!(!names.iter().any(|name| name.contains("/native/")));
    assert!(names.contains(&"jaclang/vendor/lark/lark.py".to_owned()));

    assert_eq!(
        read_entry(&output, "jaclang/runtimelib/machine.py"),
        "class Machine:\n    pass\n"
    );
    let compiler = read_entry(&output, "jaclang/jac0core/compiler.jac");
    assert!(!compiler.contains("NaIRGenPass"));
    assert!(compiler.contains("PyastGenPass"));
    let init = read_entry(&output, "jaclang/__init__.py");
    assert!(init.contains("    except Exception:\n        pass"));

    let report = outcome.report.expect("archive should verify");
    assert!(report.is_clean());
    assert_eq!(report.total_files, names.len());
}

#[rstest]
fn progress_lines_follow_pipeline_order(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("jaclang.zip");
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    run_bundle(&executor, &local_request(&synthetic, &output, false), &mut stderr)
        .expect("bundle should succeed");

    let text = String::from_utf8(stderr).expect("utf8 stderr");
    let found = text.find("Found jaclang at:").expect("found line");
    let copying = text.find("Copying and patching files...").expect("copy line");
    let zipping = text.find("Creating zip:").expect("zip line");
    let created = text.find("Bundle created:").expect("created line");
    assert!(found < copying && copying < zipping && zipping < created);
    assert!(!text.contains("WARNING"));
}

#[rstest]
fn quiet_suppresses_progress(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("jaclang.zip");
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    run_bundle(&executor, &local_request(&synthetic, &output, true), &mut stderr)
        .expect("bundle should succeed");

    assert!(stderr.is_empty());
    assert!(output.is_file());
}

#[rstest]
fn missing_marker_is_fatal_and_writes_nothing(synthetic: SyntheticSource) {
    synthetic.remove("jac0.py");
    let output = synthetic.scratch_path("jaclang.zip");
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    let err = run_bundle(&executor, &local_request(&synthetic, &output, false), &mut stderr)
        .expect_err("missing marker should fail");

    assert!(
        matches!(err, BundlerError::PackageNotFound { ref path } if path == synthetic.source_dir())
    );
    assert!(!output.exists());
}

#[rstest]
fn failed_lark_install_is_a_warning(synthetic: SyntheticSource) {
    synthetic.remove("vendor/lark/lark.py");
    synthetic.write("vendor/lark/lark.cpython-312.pyc", "bytecode");
    let output = synthetic.scratch_path("jaclang.zip");
    let calls = INSTALLERS
        .iter()
        .map(|installer| {
            let (cmd, prefix) = installer.split_first().expect("non-empty installer");
            let mut args: Vec<&'static str> = prefix.to_vec();
            args.extend([
                "install",
                "lark==1.2.2",
                "--target",
                "*",
                "--no-deps",
                "--no-cache-dir",
                "--quiet",
            ]);
            ExpectedCall {
                cmd: *cmd,
                args,
                result: Ok(failure_output("no pip")),
            }
        })
        .collect();
    let executor = StubExecutor::new(calls);
    let mut stderr = Vec::new();

    let outcome = run_bundle(&executor, &local_request(&synthetic, &output, true), &mut stderr)
        .expect("fetch failure should not abort the bundle");

    executor.assert_finished();
    assert_eq!(outcome.fetch, FetchOutcome::InstallFailed);
    let text = String::from_utf8(stderr).expect("utf8 stderr");
    assert_eq!(text, "  WARNING: Could not install lark via pip\n");
    assert!(output.is_file());
}

#[rstest]
fn clone_failure_propagates(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("jaclang.zip");
    let executor = StubExecutor::new(vec![ExpectedCall {
        cmd: "git",
        args: vec![
            "clone",
            "--depth",
            "1",
            "--branch",
            JASECI_BRANCH,
            JASECI_REPO_URL,
            "*",
        ],
        result: Ok(failure_output("fatal: repository not found")),
    }]);
    let request = BundleRequest {
        source_dir: None,
        remote: RemoteRepository::default(),
        output: &output,
        quiet: true,
    };
    let mut stderr = Vec::new();

    let err = run_bundle(&executor, &request, &mut stderr).expect_err("clone should fail");

    assert!(matches!(
        err,
        BundlerError::Git { operation: "clone", ref message } if message == "fatal: repository not found"
    ));
    assert!(!output.exists());
}

#[rstest]
fn clone_directory_is_removed_after_failure(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("jaclang.zip");
    let executor = StubExecutor::new(vec![ExpectedCall {
        cmd: "git",
        args: vec![
            "clone",
            "--depth",
            "1",
            "--branch",
            JASECI_BRANCH,
            JASECI_REPO_URL,
            "*",
        ],
        result: Ok(success_output()),
    }]);
    let request = BundleRequest {
        source_dir: None,
        remote: RemoteRepository::default(),
        output: &output,
        quiet: true,
    };
    let mut stderr = Vec::new();

    let err = run_bundle(&executor, &request, &mut stderr)
        .expect_err("an empty clone holds no package");

    let BundlerError::PackageNotFound { path } = err else {
        panic!("expected PackageNotFound, got {err:?}");
    };
    assert!(path.ends_with("jac"));
    let clone_dir = path.parent().expect("clone dir");
    assert!(!clone_dir.exists(), "clone dir should be cleaned up");
}

#[rstest]
#[case::progress_shown(false)]
#[case::quiet(true)]
fn unreadable_archive_is_a_warning(synthetic: SyntheticSource, #[case] quiet: bool) {
    let output = synthetic.scratch_path("jaclang.zip");
    fs::write(&output, "not a zip").expect("write");
    let request = local_request(&synthetic, &output, quiet);
    let mut stderr = Vec::new();

    let report = report_verification(inspect_archive(&output), &request, &mut stderr);

    assert!(report.is_none());
    let text = String::from_utf8(stderr).expect("utf8 stderr");
    assert!(text.starts_with(&format!("WARNING: could not verify {output}: ")));
    assert!(!text.contains("Bundle created:"));
}

#[rstest]
fn readable_archive_reports_size(synthetic: SyntheticSource) {
    let output = synthetic.scratch_path("jaclang.zip");
    let request = local_request(&synthetic, &output, false);
    let report = ArchiveReport {
        total_files: 1,
        native_entries: 0,
        typeshed_entries: 0,
        size_bytes: 1024 * 1024,
        sha256: "00".repeat(32),
    };
    let mut stderr = Vec::new();

    let verified = report_verification(Ok(report.clone()), &request, &mut stderr);

    assert_eq!(verified, Some(report));
    let text = String::from_utf8(stderr).expect("utf8 stderr");
    assert_eq!(text, format!("Bundle created: {output} (1.0 MB)\n"));
}
