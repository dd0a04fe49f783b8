//! Command-line argument definitions for the jaclang bundler.

use crate::source::{JASECI_BRANCH, JASECI_REPO_URL, RemoteRepository};
use camino::Utf8PathBuf;
use clap::Parser;

/// Default location of the produced archive.
pub const DEFAULT_OUTPUT: &str = "jac_playground/assets/jaclang.zip";

/// Bundle JacLang source for Pyodide.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "jaclang-bundler")]
#[command(version, about)]
#[command(long_about = concat!(
    "Bundle JacLang source into a zip for Pyodide.\n\n",
    "Copies the jaclang package, minus caches, tests, bytecode, the native ",
    "compiler pass and vendored type stubs, patches the two files that cannot ",
    "run in the browser, and writes a deflate-compressed zip.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Clone jaseci and bundle its jaclang package:\n",
    "    $ jaclang-bundler\n\n",
    "  Bundle a local checkout:\n",
    "    $ jaclang-bundler /path/to/jaseci/jac\n\n",
    "  Write the archive elsewhere:\n",
    "    $ jaclang-bundler -o dist/jaclang.zip",
))]
pub struct Cli {
    /// Path to JacLang source. If omitted, clones from GitHub.
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<Utf8PathBuf>,

    /// Output zip path.
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: Utf8PathBuf,

    /// Repository cloned when SOURCE_DIR is omitted.
    #[arg(long, value_name = "URL", default_value = JASECI_REPO_URL)]
    pub repo_url: String,

    /// Branch cloned when SOURCE_DIR is omitted.
    #[arg(long, value_name = "BRANCH", default_value = JASECI_BRANCH)]
    pub branch: String,

    /// Print the verification report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output (warnings and errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Returns the clone coordinates selected on the command line.
    #[must_use]
    pub fn remote(&self) -> RemoteRepository {
        RemoteRepository {
            url: self.repo_url.clone(),
            branch: self.branch.clone(),
        }
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            source_dir: None,
            output: Utf8PathBuf::from(DEFAULT_OUTPUT),
            repo_url: JASECI_REPO_URL.to_owned(),
            branch: JASECI_BRANCH.to_owned(),
            json: false,
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_match_default_impl() {
        let cli = Cli::parse_from(["jaclang-bundler"]);
        assert_eq!(cli, Cli::default());
        assert_eq!(cli.remote(), RemoteRepository::default());
    }

    #[rstest]
    #[case::short(["jaclang-bundler", "-o", "dist/out.zip"])]
    #[case::long(["jaclang-bundler", "--output", "dist/out.zip"])]
    fn output_flag_overrides_default(#[case] args: [&str; 3]) {
        let cli = Cli::parse_from(args);
        assert_eq!(cli.output, Utf8PathBuf::from("dist/out.zip"));
    }

    #[test]
    fn positional_source_dir_is_optional() {
        let cli = Cli::parse_from(["jaclang-bundler", "/work/jaseci/jac", "--quiet"]);
        assert_eq!(cli.source_dir, Some(Utf8PathBuf::from("/work/jaseci/jac")));
        assert!(cli.quiet);
    }

    #[test]
    fn remote_can_be_overridden() {
        let cli = Cli::parse_from([
            "jaclang-bundler",
            "--repo-url",
            "https://example.com/fork.git",
            "--branch",
            "dev",
        ]);
        let remote = cli.remote();
        assert_eq!(remote.url, "https://example.com/fork.git");
        assert_eq!(remote.branch, "dev");
    }

    #[test]
    fn rejects_second_positional() {
        Cli::try_parse_from(["jaclang-bundler", "a", "b"])
            .expect_err("expected clap to reject a second source dir");
    }
}
