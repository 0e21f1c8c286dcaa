//! CLI entry point for the repo-local architecture lint.

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

fn main() -> ExitCode {
    let client_dir = match repo_root() {
        Ok(root) => root.join("client"),
        Err(err) => {
            writeln!(io::stderr().lock(), "{err}").ok();
            return ExitCode::FAILURE;
        }
    };
    match architecture_lint::lint_client_sources(&client_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            writeln!(io::stderr().lock(), "{err}").ok();
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy, Error)]
#[error("unable to locate workspace root (directory containing a workspace Cargo.toml)")]
struct RepoRootError;

fn repo_root() -> Result<Utf8PathBuf, RepoRootError> {
    let from_env = std::env::var("CARGO_WORKSPACE_DIR").ok().map(Utf8PathBuf::from);
    let from_cwd = std::env::current_dir()
        .ok()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());
    let from_manifest = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));

    from_env
        .as_deref()
        .and_then(find_workspace_root)
        .or_else(|| from_cwd.as_deref().and_then(find_workspace_root))
        .or_else(|| find_workspace_root(&from_manifest))
        .ok_or(RepoRootError)
}

fn find_workspace_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| declares_workspace(&dir.join("Cargo.toml")))
        .map(Utf8Path::to_path_buf)
}

fn declares_workspace(manifest: &Utf8Path) -> bool {
    fs::read_to_string(manifest)
        .ok()
        .is_some_and(|contents| contents.contains("[workspace]"))
}
