//! In-memory text patches applied to two files during the copy.
//!
//! The native IR pass cannot run under Pyodide, and setuptools entry points
//! are unavailable there. Both patches are pure `&str -> String` functions.

use camino::Utf8Path;

/// Compiler source patched by [`patch_compiler_jac`], relative to the package root.
pub const COMPILER_JAC: &str = "jac0core/compiler.jac";

/// Package init patched by [`patch_init_py`], relative to the package root.
pub const INIT_PY: &str = "__init__.py";

const NATIVE_PASS_MODULE: &str = "jaclang.compiler.passes.native";
const NATIVE_PASS_CLASS: &str = "NaIRGenPass";

const ENTRYPOINT_CALL: &str = "    plugin_manager.load_setuptools_entrypoints(\"jac\")";
const GUARDED_ENTRYPOINT_CALL: &str = concat!(
    "    try:\n",
    "        plugin_manager.load_setuptools_entrypoints(\"jac\")\n",
    "    except Exception:\n",
    "        pass"
);

/// One of the two patched files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTarget {
    /// `jac0core/compiler.jac`.
    CompilerJac,
    /// The package `__init__.py`.
    InitPy,
}

impl PatchTarget {
    /// Returns the patch for a path relative to the package root, if any.
    #[must_use]
    pub fn for_relative_path(rel: &Utf8Path) -> Option<Self> {
        if rel == Utf8Path::new(COMPILER_JAC) {
            Some(Self::CompilerJac)
        } else if rel == Utf8Path::new(INIT_PY) {
            Some(Self::InitPy)
        } else {
            None
        }
    }

    /// Applies this target's patch to `content`.
    ///
    /// Line endings are normalised to `\n` first, so patched files are
    /// always written with LF endings.
    #[must_use]
    pub fn apply(self, content: &str) -> String {
        let content = normalise_line_endings(content);
        match self {
            Self::CompilerJac => patch_compiler_jac(&content),
            Self::InitPy => patch_init_py(&content),
        }
    }
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
fn normalise_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Removes native-pass imports from `compiler.jac`.
///
/// A line mentioning the native pass module is dropped. The line right after
/// it is also dropped if it mentions `NaIRGenPass`; otherwise it is kept and
/// the lookahead ends.
///
/// # Examples
///
/// ```
/// use jaclang_bundler::patch::patch_compiler_jac;
///
/// let src = "import a;\nimport from jaclang.compiler.passes.native {\n    NaIRGenPass\n}\n";
/// assert_eq!(patch_compiler_jac(src), "import a;\n}\n");
/// ```
#[must_use]
pub fn patch_compiler_jac(content: &str) -> String {
    let mut patched = Vec::new();
    let mut skip_next = false;

    for line in content.split('\n') {
        if line.contains(NATIVE_PASS_MODULE) {
            skip_next = true;
            continue;
        }
        if skip_next && line.contains(NATIVE_PASS_CLASS) {
            skip_next = false;
            continue;
        }
        skip_next = false;
        patched.push(line);
    }

    patched.join("\n")
}

/// Guards the setuptools entry point loader in `__init__.py`.
///
/// Returns `content` unchanged when the guarded form is already present.
///
/// # Examples
///
/// ```
/// use jaclang_bundler::patch::patch_init_py;
///
/// let src = "def setup():\n    plugin_manager.load_setuptools_entrypoints(\"jac\")\n";
/// let once = patch_init_py(src);
/// assert!(once.contains("    except Exception:\n        pass"));
/// assert_eq!(patch_init_py(&once), once);
/// ```
#[must_use]
pub fn patch_init_py(content: &str) -> String {
    if content.contains(GUARDED_ENTRYPOINT_CALL) {
        return content.to_owned();
    }
    content.replace(ENTRYPOINT_CALL, GUARDED_ENTRYPOINT_CALL)
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
