//! The marker rewrite pass.
//!
//! `TransformPass` walks the program once, depth first, dispatching on
//! [`SyntaxKind`]. Blocks are hoisted before their statements are visited,
//! functions push a scope record before their parameters and body are
//! visited, and call sites are rewritten after their arguments.
//!
//! Every rewrite happens in place through [`NodeArena::set_data`], so a
//! parent never needs to be told that its child changed shape.

use crate::call_site::{self, CallPlan, Dispatch, plan_call};
use crate::errors::{TransformError, TransformResult};
use crate::fast_iteration;
use crate::function_wrapper::{make_coroutine, wrap_function};
use crate::hoist::{has_marker_declaration, hoist_block};
use crate::marker::{is_marker, marker_params};
use crate::state::{Annotation, ScopeRecord, TransformState};
use weft_ast::{FunctionData, FunctionKind, NodeArena, NodeData, NodeIndex, SyntaxKind};
use weft_common::diagnostics::diagnostic_codes;
use weft_common::limits::{MAX_AST_DEPTH, MAX_MARKERS_PER_CALL};
use weft_common::{Diagnostic, SourceLocation};

pub struct TransformPass<'a> {
    arena: &'a mut NodeArena,
    state: &'a mut TransformState,
    visit_depth: u32,
    /// Name for the next anonymous function visited, from the enclosing
    /// declarator, assignment or property key
    name_hint: Option<String>,
    /// Inside a top-level import or export. These stay outside the entry
    /// coroutine, so they cannot suspend.
    in_module_item: bool,
}

impl<'a> TransformPass<'a> {
    pub fn new(arena: &'a mut NodeArena, state: &'a mut TransformState) -> Self {
        Self {
            arena,
            state,
            visit_depth: 0,
            name_hint: None,
            in_module_item: false,
        }
    }

    pub fn run(&mut self, program: NodeIndex) -> TransformResult<()> {
        self.visit(program)
    }

    fn location(&self, idx: NodeIndex) -> SourceLocation {
        self.arena.span(idx).loc
    }

    fn file(&self) -> String {
        self.state.file.clone()
    }

    fn unexpected_marker(&self, idx: NodeIndex) -> TransformError {
        TransformError::UnexpectedMarker {
            file: self.file(),
            location: self.location(idx),
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    fn visit(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let hint = self.name_hint.take();
        let Some(kind) = self.arena.get(idx).map(|n| n.kind()) else {
            return Ok(());
        };
        if self.visit_depth >= MAX_AST_DEPTH {
            return Err(TransformError::NestingTooDeep {
                file: self.file(),
                location: self.location(idx),
                limit: MAX_AST_DEPTH,
            });
        }

        self.visit_depth += 1;
        let result = self.visit_kind(idx, kind, hint);
        self.visit_depth -= 1;
        result
    }

    fn visit_kind(
        &mut self,
        idx: NodeIndex,
        kind: SyntaxKind,
        hint: Option<String>,
    ) -> TransformResult<()> {
        match kind {
            SyntaxKind::Program | SyntaxKind::BlockStatement => self.visit_block(idx),
            k if k.is_function_like() => self.visit_function(idx, hint),
            SyntaxKind::CallExpression => self.visit_call(idx, false),
            SyntaxKind::NewExpression => self.visit_call(idx, true),
            SyntaxKind::Identifier => {
                if is_marker(self.arena, &self.state.annotations, idx) {
                    return Err(self.unexpected_marker(idx));
                }
                Ok(())
            }
            SyntaxKind::MemberExpression => self.visit_member(idx),
            SyntaxKind::Property | SyntaxKind::MethodDefinition => self.visit_keyed(idx),
            SyntaxKind::VariableDeclarator => self.visit_declarator(idx),
            SyntaxKind::AssignmentExpression => self.visit_assignment(idx),
            SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression => self.visit_class(idx),
            SyntaxKind::ImportDeclaration
            | SyntaxKind::ExportNamedDeclaration
            | SyntaxKind::ExportDefaultDeclaration
                if self.state.current_scope().is_none() =>
            {
                self.in_module_item = true;
                let result = self.visit_children(idx);
                self.in_module_item = false;
                result
            }
            _ => self.visit_children(idx),
        }
    }

    fn visit_children(&mut self, idx: NodeIndex) -> TransformResult<()> {
        for child in self.arena.children(idx) {
            self.visit(child)?;
        }
        Ok(())
    }

    fn visit_block(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let needs_hoist = self
            .arena
            .statements(idx)
            .is_some_and(|stmts| has_marker_declaration(self.arena, &self.state.annotations, stmts));
        if needs_hoist {
            hoist_block(self.arena, &mut self.state.annotations, idx);
        }
        self.visit_children(idx)
    }

    fn visit_member(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let Some(NodeData::Member {
            object,
            property,
            computed,
            ..
        }) = self.arena.data(idx)
        else {
            return Ok(());
        };
        let (object, property, computed) = (*object, *property, *computed);
        self.visit(object)?;
        if computed {
            self.visit(property)?;
        }
        Ok(())
    }

    /// Object properties and class members: static keys are names, not
    /// references.
    fn visit_keyed(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let (key, value, computed) = match self.arena.data(idx) {
            Some(
                NodeData::Property {
                    key,
                    value,
                    computed,
                    ..
                }
                | NodeData::MethodDefinition {
                    key,
                    value,
                    computed,
                    ..
                },
            ) => (*key, *value, *computed),
            _ => return Ok(()),
        };
        if computed {
            self.visit(key)?;
        }
        self.name_hint = self.arena.property_key_name(key, computed);
        self.visit(value)
    }

    fn visit_declarator(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let Some(NodeData::VariableDeclarator { id, init }) = self.arena.data(idx) else {
            return Ok(());
        };
        let (id, init) = (*id, *init);
        self.visit(id)?;
        self.name_hint = self.arena.identifier_name(id).map(str::to_string);
        self.visit(init)
    }

    fn visit_assignment(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let Some(NodeData::Assignment { left, right, .. }) = self.arena.data(idx) else {
            return Ok(());
        };
        let (left, right) = (*left, *right);
        self.visit(left)?;
        self.name_hint = match self.arena.data(left) {
            Some(NodeData::Identifier { name }) => Some(name.clone()),
            Some(NodeData::Member {
                property,
                computed: false,
                ..
            }) => self.arena.identifier_name(*property).map(str::to_string),
            _ => None,
        };
        self.visit(right)
    }

    fn visit_class(&mut self, idx: NodeIndex) -> TransformResult<()> {
        let Some(NodeData::Class {
            super_class, body, ..
        }) = self.arena.data(idx)
        else {
            return Ok(());
        };
        let super_class = *super_class;
        let members = body.clone();
        self.visit(super_class)?;
        for member in members.iter() {
            self.visit(member)?;
        }
        Ok(())
    }

    // =========================================================================
    // Functions and scopes
    // =========================================================================

    fn in_scope(
        &mut self,
        function: NodeIndex,
        is_transformed: bool,
        f: impl FnOnce(&mut Self) -> TransformResult<()>,
    ) -> TransformResult<()> {
        self.state.scopes.push(ScopeRecord {
            function,
            is_transformed,
        });
        let result = f(self);
        self.state.scopes.pop();
        result
    }

    fn visit_params_and_body(&mut self, func: &FunctionData) -> TransformResult<()> {
        for param in func.params.iter() {
            self.visit(param)?;
        }
        self.visit(func.body)
    }

    fn visit_function(&mut self, idx: NodeIndex, hint: Option<String>) -> TransformResult<()> {
        let Some(func) = self.arena.get_function(idx).cloned() else {
            return Ok(());
        };
        let markers = marker_params(self.arena, &self.state.annotations, idx);

        let Some(&marker_index) = markers.first() else {
            let transformed = self.state.annotations.has(idx, Annotation::TRANSFORMED);
            self.in_scope(idx, transformed, |pass| pass.visit_params_and_body(&func))?;
            if self.state.annotations.has(idx, Annotation::COROUTINE) {
                make_coroutine(self.arena, self.state.profile, idx);
            }
            return Ok(());
        };

        let marker = func.params.get(marker_index).unwrap_or(NodeIndex::NONE);
        if let Some(&second) = markers.get(1) {
            let extra = func.params.get(second).unwrap_or(NodeIndex::NONE);
            return Err(self.unexpected_marker(extra));
        }
        let modifier = if func.is_generator {
            Some("generator")
        } else if func.is_async {
            Some("async")
        } else {
            None
        };
        if let Some(modifier) = modifier {
            return Err(TransformError::IncompatibleModifiers {
                file: self.file(),
                location: self.location(marker),
                modifier,
            });
        }
        if func.kind == FunctionKind::Declaration {
            return Err(TransformError::NestedDeclaration {
                file: self.file(),
                location: self.location(idx),
                name: self.arena.identifier_name(func.id).unwrap_or_default().to_string(),
            });
        }

        self.state.annotations.insert(marker, Annotation::CONSUMED_MARKER);
        self.state.annotations.insert(idx, Annotation::TRANSFORMED);
        self.in_scope(idx, true, |pass| pass.visit_params_and_body(&func))?;
        wrap_function(self.arena, self.state, idx, marker_index, hint.as_deref());
        Ok(())
    }

    /// A suspending call needs a transformed enclosing function. At top level
    /// the unit becomes program-async instead, except inside imports and
    /// exports.
    fn require_transformed_scope(&mut self, location: SourceLocation) -> TransformResult<()> {
        match self.state.current_scope() {
            Some(scope) if scope.is_transformed => Ok(()),
            Some(_) => Err(TransformError::ScopeError {
                file: self.file(),
                location,
            }),
            None if self.in_module_item => Err(TransformError::ScopeError {
                file: self.file(),
                location,
            }),
            None => {
                if !self.state.program_async {
                    self.state.program_async = true;
                    let warning = Diagnostic::from_code(
                        diagnostic_codes::ASYNC_CALL_AT_TOP_LEVEL,
                        self.file(),
                        location,
                        &[],
                    );
                    self.state.warn(warning);
                }
                Ok(())
            }
        }
    }

    // =========================================================================
    // Call sites
    // =========================================================================

    fn visit_call(&mut self, idx: NodeIndex, construct: bool) -> TransformResult<()> {
        if self.state.annotations.has(idx, Annotation::ENTRY_WRAPPED) {
            return self.visit_children(idx);
        }

        if !construct && self.state.fast_iteration && self.state.profile.is_fibers() {
            if let Some(fast) = fast_iteration::match_call(self.arena, &self.state.annotations, idx)
            {
                self.require_transformed_scope(self.location(fast.marker))?;
                fast_iteration::rewrite(self.arena, &mut self.state.annotations, idx, fast);
                return self.visit_children(idx);
            }
        }

        let plan = plan_call(
            self.arena,
            &self.state.annotations,
            idx,
            construct,
            self.state.in_transformed_scope(),
        );
        self.apply_plan(idx, plan, construct)
    }

    fn marker_location(&self, idx: NodeIndex, position: usize) -> SourceLocation {
        self.location(call_site::marker_at(
            self.arena,
            &self.state.annotations,
            idx,
            position,
        ))
    }

    fn apply_plan(
        &mut self,
        idx: NodeIndex,
        plan: CallPlan,
        construct: bool,
    ) -> TransformResult<()> {
        match plan {
            CallPlan::Suspend { positions, batched } => {
                let first = positions.first().copied().unwrap_or_default();
                let location = self.marker_location(idx, first);
                call_site::consume_markers(
                    self.arena,
                    &mut self.state.annotations,
                    idx,
                    &positions,
                    true,
                );
                self.require_transformed_scope(location)?;
                self.visit_children(idx)?;
                let dispatch = if construct { Dispatch::New } else { Dispatch::Await };
                call_site::emit_dispatch(self.arena, self.state, idx, dispatch, &positions, batched);
                Ok(())
            }
            CallPlan::TooManyMarkers { position } => Err(TransformError::TooManyMarkers {
                file: self.file(),
                location: self.marker_location(idx, position),
                limit: MAX_MARKERS_PER_CALL,
            }),
            CallPlan::Future { position, promise } => {
                call_site::consume_markers(
                    self.arena,
                    &mut self.state.annotations,
                    idx,
                    &[position],
                    false,
                );
                self.visit_children(idx)?;
                let dispatch = if promise { Dispatch::Promise } else { Dispatch::Future };
                call_site::emit_dispatch(self.arena, self.state, idx, dispatch, &[position], false);
                Ok(())
            }
            CallPlan::Shift { position } => {
                let location = self.marker_location(idx, position);
                self.state.record_deprecated(location);
                call_site::unshift(self.arena, idx, position);
                self.visit_children(idx)
            }
            CallPlan::BareCallee { first } => {
                let location = match self.arena.data(idx) {
                    Some(NodeData::Call { callee, .. }) => self.location(*callee),
                    _ => self.location(idx),
                };
                self.state.record_deprecated(location);
                if let Some(data) = self.arena.data(first).cloned() {
                    self.arena.set_data(idx, data);
                }
                self.visit(idx)
            }
            CallPlan::Iife { function } => {
                call_site::prepare_iife(self.arena, self.state, idx, function);
                self.visit_children(idx)?;
                call_site::wrap_suspension(self.arena, self.state, idx);
                Ok(())
            }
            CallPlan::Unexpected { position } => Err(TransformError::UnexpectedMarker {
                file: self.file(),
                location: self.marker_location(idx, position),
            }),
            CallPlan::Untouched => self.visit_children(idx),
        }
    }
}

#[cfg(test)]
#[path = "../tests/pass.rs"]
mod tests;
