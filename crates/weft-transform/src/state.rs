//! Per-unit transform state.
//!
//! Everything the pass mutates besides the arena lives here: the active
//! profile, generated names, scope stack, collected warnings and the
//! annotation side table. One instance per unit, never shared.

use crate::options::{FileDirectives, TransformOptions};
use crate::runtime::RuntimeProfile;
use bitflags::bitflags;
use rustc_hash::{FxHashMap, FxHashSet};
use weft_ast::{NodeArena, NodeData, NodeIndex};
use weft_common::diagnostics::diagnostic_codes;
use weft_common::limits::MAX_UNIQUE_NAME_ATTEMPTS;
use weft_common::{Diagnostic, SourceLocation};

bitflags! {
    /// Transient per-node flags, valid for one pass.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Annotation: u8 {
        /// A marker identifier already turned into something else.
        const CONSUMED_MARKER = 1 << 0;
        /// A function whose scope may contain suspending calls.
        const TRANSFORMED = 1 << 1;
        /// A function that must become a coroutine under the profile.
        const COROUTINE = 1 << 2;
        /// A call already wrapped in a suspension form.
        const ENTRY_WRAPPED = 1 << 3;
        /// A block whose function declarations were hoisted.
        const HOISTED = 1 << 4;
    }
}

/// Side table of annotations keyed by node.
#[derive(Clone, Debug, Default)]
pub struct NodeAnnotations {
    flags: FxHashMap<NodeIndex, Annotation>,
}

impl NodeAnnotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, idx: NodeIndex) -> Annotation {
        self.flags.get(&idx).copied().unwrap_or_default()
    }

    pub fn has(&self, idx: NodeIndex, flag: Annotation) -> bool {
        self.get(idx).contains(flag)
    }

    pub fn insert(&mut self, idx: NodeIndex, flag: Annotation) {
        if idx.is_some() {
            *self.flags.entry(idx).or_default() |= flag;
        }
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// One lexical function on the scope stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeRecord {
    pub function: NodeIndex,
    pub is_transformed: bool,
}

/// Generator of identifiers that do not collide with any name in the unit.
#[derive(Clone, Debug, Default)]
pub struct UniqueNames {
    used: FxHashSet<String>,
}

impl UniqueNames {
    /// Seed with every identifier already present in the arena.
    pub fn from_arena(arena: &NodeArena) -> Self {
        let mut used = FxHashSet::default();
        for i in 0..arena.len() {
            if let Some(NodeData::Identifier { name }) = arena.data(NodeIndex(i as u32)) {
                used.insert(name.clone());
            }
        }
        Self { used }
    }

    /// `base` if free, otherwise `base1`, `base2`, ...
    pub fn unique(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        for n in 1..MAX_UNIQUE_NAME_ATTEMPTS {
            let candidate = format!("{base}{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
        format!("{base}{MAX_UNIQUE_NAME_ATTEMPTS}")
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }
}

pub struct TransformState {
    pub profile: &'static RuntimeProfile,
    pub file: String,
    pub adapter_root: String,
    /// Binding of the required runtime module
    pub runtime_binding: String,
    /// Binding holding the unit's file name
    pub filename_binding: String,
    pub program_async: bool,
    pub quiet: bool,
    pub fast_iteration: bool,
    pub directives: FileDirectives,
    pub annotations: NodeAnnotations,
    pub scopes: Vec<ScopeRecord>,
    pub names: UniqueNames,
    /// Lines of deprecated marker forms, reported once at unit exit
    pub deprecated_lines: Vec<u32>,
    warnings: Vec<Diagnostic>,
}

impl TransformState {
    pub fn new(
        arena: &NodeArena,
        profile: &'static RuntimeProfile,
        options: &TransformOptions,
        directives: FileDirectives,
    ) -> Self {
        let mut names = UniqueNames::from_arena(arena);
        let runtime_binding = names.unique("_weft");
        let filename_binding = names.unique("_filename");
        Self {
            profile,
            file: options.file_name().to_string(),
            adapter_root: options.adapter_root().to_string(),
            runtime_binding,
            filename_binding,
            program_async: false,
            quiet: options.quiet || directives.is_set("quiet"),
            fast_iteration: options.fast_iteration || directives.is_set("fast-iteration"),
            directives,
            annotations: NodeAnnotations::new(),
            scopes: Vec::new(),
            names,
            deprecated_lines: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: Diagnostic) {
        if self.quiet {
            return;
        }
        tracing::warn!(code = warning.code, "{warning}");
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Nearest enclosing function, `None` at top level.
    pub fn current_scope(&self) -> Option<&ScopeRecord> {
        self.scopes.last()
    }

    pub fn in_transformed_scope(&self) -> bool {
        self.current_scope().is_some_and(|s| s.is_transformed)
    }

    /// Module path of the runtime adapter for the active profile.
    pub fn runtime_module(&self) -> String {
        format!("{}/{}/runtime", self.adapter_root, self.profile.name)
    }

    pub fn record_deprecated(&mut self, location: SourceLocation) {
        self.deprecated_lines.push(location.line);
    }

    /// Emit the deprecated-syntax summary and return all warnings.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        if !self.deprecated_lines.is_empty() {
            let count = self.deprecated_lines.len().to_string();
            let lines = self
                .deprecated_lines
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let file = self.file.clone();
            self.warn(Diagnostic::from_code(
                diagnostic_codes::DEPRECATED_MARKER_SYNTAX,
                file,
                SourceLocation::default(),
                &[count.as_str(), lines.as_str()],
            ));
        }
        self.warnings
    }
}

#[cfg(test)]
#[path = "../tests/state.rs"]
mod tests;
