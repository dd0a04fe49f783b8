//! Shared test utilities for the bundler crate.

use crate::command::CommandExecutor;
use crate::error::{BundlerError, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// An expected command invocation.
///
/// Arguments are matched exactly, except that an expected argument of `"*"`
/// matches any value (temporary directory paths are not known up front).
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "git").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations and returns predefined results,
/// allowing tests to verify command execution without side effects.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        assert!(
            self.expected.borrow().is_empty(),
            "expected no further command invocations"
        );
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let Some(call) = self.expected.borrow_mut().pop_front() else {
            return Err(BundlerError::StubMismatch {
                message: format!("unexpected invocation: {cmd} {}", args.join(" ")),
            });
        };

        let args_match = call.args.len() == args.len()
            && call
                .args
                .iter()
                .zip(args)
                .all(|(expected, actual)| *expected == "*" || expected == actual);

        if call.cmd != cmd || !args_match {
            return Err(BundlerError::StubMismatch {
                message: format!(
                    "expected `{} {}`, got `{cmd} {}`",
                    call.cmd,
                    call.args.join(" "),
                    args.join(" ")
                ),
            });
        }

        call.result
    }
}

/// Unpatched `compiler.jac` lines that the compiler patch removes.
pub const NATIVE_COMPILER_JAC: &str = concat!(
    "import from jaclang.compiler.passes.main { PyastGenPass }\n",
    "import from jaclang.compiler.passes.native.ir_gen {\n",
    "    NaIRGenPass\n",
    "}\n",
    "obj JacCompiler {}\n",
);

/// Unpatched `__init__.py` holding the unguarded entry point loader.
pub const PLUGIN_INIT_PY: &str = concat!(
    "def _load_plugins() -> None:\n",
    "    plugin_manager.load_setuptools_entrypoints(\"jac\")\n",
);

/// A synthetic jaclang source tree in a temporary directory.
///
/// The tree holds the marker file, a normal module, a native pass file, both
/// patch targets and a source-form vendored `lark`, so a full bundling run
/// needs no external commands.
#[derive(Debug)]
pub struct SyntheticSource {
    _temp_dir: tempfile::TempDir,
    source_dir: camino::Utf8PathBuf,
}

impl SyntheticSource {
    /// Creates the tree at `<tmp>/jac/jaclang`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary tree cannot be written.
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let base = camino::Utf8PathBuf::try_from(temp_dir.path().to_path_buf())
            .expect("non-UTF8 temp path");
        let source = Self {
            source_dir: base.join("jac"),
            _temp_dir: temp_dir,
        };
        source.write("jac0.py", "# marker\n");
        source.write("runtimelib/machine.py", "class Machine:\n    pass\n");
        source.write("compiler/passes/native/ir_gen.jac", "native\n");
        source.write("jac0core/compiler.jac", NATIVE_COMPILER_JAC);
        source.write("__init__.py", PLUGIN_INIT_PY);
        source.write("vendor/lark/lark.py", "class Lark: ...\n");
        source
    }

    /// Directory containing the `jaclang` package.
    #[must_use]
    pub fn source_dir(&self) -> &camino::Utf8Path {
        &self.source_dir
    }

    /// The `jaclang` package root.
    #[must_use]
    pub fn package_root(&self) -> camino::Utf8PathBuf {
        self.source_dir.join("jaclang")
    }

    /// A scratch path next to the tree, for archive output.
    #[must_use]
    pub fn scratch_path(&self, rel: &str) -> camino::Utf8PathBuf {
        self.source_dir
            .parent()
            .map_or_else(|| self.source_dir.join(rel), |base| base.join(rel))
    }

    /// Writes `content` at `rel` under the package root.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.package_root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent");
        }
        std::fs::write(path, content).expect("failed to write file");
    }

    /// Removes `rel` under the package root, file or directory.
    ///
    /// # Panics
    ///
    /// Panics if the path cannot be removed.
    pub fn remove(&self, rel: &str) {
        let path = self.package_root().join(rel);
        if path.is_dir() {
            std::fs::remove_dir_all(path).expect("failed to remove dir");
        } else {
            std::fs::remove_file(path).expect("failed to remove file");
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}
