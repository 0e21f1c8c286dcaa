//! Repo-local architectural lint for the client's hexagonal boundaries.
//!
//! The AMEP client keeps its session model, executor and catalog in
//! `domain`, drives them from `inbound` (the CLI) and implements their ports
//! in `outbound` (reqwest, the session file). This crate parses every source
//! file under those layers and rejects:
//!
//! - `domain` code importing adapter modules or transport, storage and
//!   terminal crates
//! - `inbound` adapters importing `outbound` modules or the crates those
//!   adapters wrap
//! - `outbound` adapters importing `inbound` modules or CLI crates
//!
//! The lint runs via `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use syn::visit::Visit;
use thiserror::Error;

/// Name the client library is imported under from integration code.
const CLIENT_CRATE: &str = "amep_client";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed, or the file sits outside a known layer.
    #[error("failed to parse Rust source while linting architecture ({file}): {message}")]
    Parse {
        /// File that could not be read as Rust.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    let mut out = String::from("Architecture boundary violations:\n");
    for violation in violations {
        out.push_str("- ");
        out.push_str(&violation.to_string());
        out.push('\n');
    }
    out
}

/// Lint the client crate sources on disk.
///
/// `client_dir` must be the `client/` directory at the repository root.
///
/// # Errors
///
/// Returns [`ArchitectureLintError::Violations`] listing every boundary
/// crossing, or an I/O or parse error when the sources cannot be read.
pub fn lint_client_sources(client_dir: &Utf8Path) -> Result<(), ArchitectureLintError> {
    let sources = collect_lint_sources(&client_dir.join("src"))?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
///
/// # Errors
///
/// See [`lint_client_sources`].
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Rust source text.
    pub contents: String,
}

/// The architectural layer inferred from a file path under `client/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Inbound,
    Outbound,
}

impl ModuleLayer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    fn infer_from_path(relative_path: &Utf8Path) -> Option<Self> {
        let first = relative_path.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.name() == first)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    const fn forbidden_module_roots(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound", "settings"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound", "settings"],
        }
    }

    const fn forbidden_crate_roots(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "camino",
                "cap_std",
                "clap",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
                "wiremock",
            ],
            Self::Inbound => &["cap_std", "reqwest", "wiremock"],
            Self::Outbound => &["clap", "ortho_config", "tracing_subscriber"],
        }
    }
}

fn lint_parsed_source(file: &Utf8Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(root) = internal_module_root(segments)
            .filter(|root| layer.forbidden_module_roots().iter().any(|forbidden| forbidden == root))
        {
            messages.insert(format!(
                "{} module must not depend on crate::{root}",
                layer.name()
            ));
        }

        if let Some(root) = external_crate_root(segments)
            .filter(|root| layer.forbidden_crate_roots().iter().any(|forbidden| forbidden == root))
        {
            messages.insert(format!(
                "{} module must not depend on external crate `{root}`",
                layer.name()
            ));
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

fn is_top_level_module(segment: &str) -> bool {
    matches!(segment, "domain" | "inbound" | "outbound" | "settings")
}

fn internal_module_root(segments: &[String]) -> Option<&str> {
    let first = segments.first()?.as_str();
    if is_top_level_module(first) {
        return Some(first);
    }
    let start_index = if is_relative_module_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment))?
    } else if first == CLIENT_CRATE {
        1
    } else {
        return None;
    };
    segments
        .get(start_index)
        .map(String::as_str)
        .filter(|segment| is_top_level_module(segment))
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CLIENT_CRATE {
        return None;
    }
    Some(root)
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if !segments.is_empty() {
            self.paths.insert(segments);
        }
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, mut prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                prefix.push(path.ident.to_string());
                self.record_use_tree(&path.tree, prefix);
            }
            syn::UseTree::Name(name) => {
                prefix.push(name.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Rename(rename) => {
                prefix.push(rename.ident.to_string());
                self.paths.insert(prefix);
            }
            syn::UseTree::Glob(_) => {
                prefix.push("*".to_owned());
                self.paths.insert(prefix);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        self.record_use_tree(&node.tree, Vec::new());
    }
}

fn collect_lint_sources(src_dir: &Utf8Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let root = Dir::open_ambient_dir(src_dir, ambient_authority())?;
    let mut sources = Vec::new();
    for layer in ModuleLayer::ALL {
        let dir = match root.open_dir(layer.name()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => return Err(err.into()),
        };
        collect_sources_under(&dir, Utf8Path::new(layer.name()), &mut sources)?;
    }
    Ok(sources)
}

fn collect_sources_under(
    dir: &Dir,
    relative: &Utf8Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in dir.entries()? {
        let entry = entry?;
        let name = entry.file_name().into_string().map_err(|name| {
            ArchitectureLintError::Parse {
                file: relative.to_path_buf(),
                message: format!("non UTF-8 file name {name:?}"),
            }
        })?;
        let path = relative.join(&name);
        if entry.file_type()?.is_dir() {
            collect_sources_under(&entry.open_dir()?, &path, sources)?;
            continue;
        }
        if path.extension() != Some("rs") {
            continue;
        }
        let contents = dir.read_to_string(&name)?;
        sources.push(LintSource {
            file: path,
            contents,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests;
