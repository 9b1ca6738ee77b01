//! Per-unit options, file directives and eligibility.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use weft_ast::{NodeArena, NodeData, NodeIndex};
use weft_common::Comment;
use weft_common::comments::leading_comments;

/// Package name of the runtime adapters.
pub const RUNTIME_PACKAGE: &str = "weft-runtime";

/// Root the runtime module path is built from.
pub const DEFAULT_ADAPTER_ROOT: &str = "weft-runtime/lib";

/// Filename suffixes that opt a unit in.
pub const ELIGIBLE_SUFFIXES: &[&str] = &["._js", "._ts"];

/// Comment prefix of per-file directives.
pub const DIRECTIVE_PREFIX: &str = "@weft-";

/// File name used when the host does not provide one.
pub const ANONYMOUS_FILE: &str = "<anonymous>";

/// Options record supplied by the host for one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    /// Profile name; `None` selects the default profile with a warning.
    pub runtime: Option<String>,
    /// Skip the eligibility check.
    pub force_transform: bool,
    /// Suppress warnings.
    pub quiet: bool,
    pub filename: Option<String>,
    pub adapter_root: Option<String>,
    /// Rewrite marker iteration calls to native iteration under `fibers`.
    pub fast_iteration: bool,
    /// Host project manifest, consulted for runtime-import eligibility.
    pub manifest: Option<PackageManifest>,
}

impl TransformOptions {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = Some(runtime.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn file_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(ANONYMOUS_FILE)
    }

    pub fn adapter_root(&self) -> &str {
        self.adapter_root.as_deref().unwrap_or(DEFAULT_ADAPTER_ROOT)
    }
}

/// The parts of a `package.json` eligibility looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageManifest {
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageManifest {
    pub fn depends_on(&self, package: &str) -> bool {
        self.dependencies.contains_key(package) || self.dev_dependencies.contains_key(package)
    }
}

/// `@weft-<name>` flags found in the comments before the first statement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileDirectives {
    flags: IndexMap<String, bool>,
}

impl FileDirectives {
    pub fn from_comments(comments: &[Comment], first_statement_start: Option<u32>) -> Self {
        let mut flags = IndexMap::new();
        for comment in leading_comments(comments, first_statement_start) {
            let mut rest = comment.text.as_str();
            while let Some(pos) = rest.find(DIRECTIVE_PREFIX) {
                rest = &rest[pos + DIRECTIVE_PREFIX.len()..];
                let end = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
                    .unwrap_or(rest.len());
                let name = &rest[..end];
                rest = &rest[end..];
                if name.is_empty() {
                    continue;
                }
                match name.strip_prefix("no-") {
                    Some(cleared) => flags.insert(cleared.to_string(), false),
                    None => flags.insert(name.to_string(), true),
                };
            }
        }
        Self { flags }
    }

    /// Directives of a program node.
    pub fn from_program(arena: &NodeArena, program: NodeIndex) -> Self {
        let Some(NodeData::Program { body, comments, .. }) = arena.data(program) else {
            return Self::default();
        };
        let first_start = body
            .get(0)
            .map(|stmt| arena.span(stmt))
            .filter(|span| !span.is_synthetic())
            .map(|span| span.start);
        Self::from_comments(comments, first_start)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Whether the unit should be transformed at all.
///
/// A unit without a filename is eligible, as are units with a recognized
/// suffix, forced units, and units that load the runtime package declared in
/// the host manifest.
pub fn is_eligible(
    arena: &NodeArena,
    program: NodeIndex,
    options: &TransformOptions,
    directives: &FileDirectives,
) -> bool {
    if options.force_transform || directives.is_set("force") {
        return true;
    }
    let Some(filename) = options.filename.as_deref() else {
        return true;
    };
    if ELIGIBLE_SUFFIXES.iter().any(|s| filename.ends_with(s)) {
        return true;
    }
    options
        .manifest
        .as_ref()
        .is_some_and(|m| m.depends_on(RUNTIME_PACKAGE))
        && loads_runtime_package(arena, program)
}

fn is_runtime_module(source: &str) -> bool {
    source == RUNTIME_PACKAGE
        || source
            .strip_prefix(RUNTIME_PACKAGE)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// True when the unit imports or requires the runtime package.
pub fn loads_runtime_package(arena: &NodeArena, program: NodeIndex) -> bool {
    let mut stack = vec![program];
    while let Some(idx) = stack.pop() {
        match arena.data(idx) {
            Some(NodeData::ImportDeclaration { source, .. }) if is_runtime_module(source) => {
                return true;
            }
            Some(NodeData::Call {
                callee, arguments, ..
            }) if arena.is_identifier_named(*callee, "require")
                && arguments
                    .get(0)
                    .and_then(|arg| arena.string_literal(arg))
                    .is_some_and(is_runtime_module) =>
            {
                return true;
            }
            _ => stack.extend(arena.children(idx)),
        }
    }
    false
}

#[cfg(test)]
#[path = "../tests/options.rs"]
mod tests;
