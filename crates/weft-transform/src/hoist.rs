//! Function declaration hoisting.
//!
//! The wrapper turns a declaration into an expression-valued binding, which
//! loses declaration hoisting. Before a block is visited, its direct function
//! declarations become `var name = function name(...) {...};` statements
//! placed ahead of everything else, so earlier references keep working.
//!
//! ```text
//! g();                         var f = function f(_) { ... };
//! function f(_) { ... }   =>   g();
//! export default function h(_) {}   var h = function h(_) {};
//!                                   export default h;
//! ```

use crate::marker::marker_params;
use crate::state::{Annotation, NodeAnnotations};
use weft_ast::{
    FunctionData, FunctionKind, LiteralValue, NodeArena, NodeData, NodeIndex, NodeList,
    SyntaxKind, VariableKind,
};

/// A hoistable function declaration reachable from a statement.
enum Hoistable {
    /// `function f() {}`
    Declaration,
    /// `export function f() {}`
    NamedExport(NodeIndex),
    /// `export default function f() {}`
    DefaultExport(NodeIndex),
}

fn is_named_declaration(arena: &NodeArena, idx: NodeIndex) -> bool {
    arena
        .get(idx)
        .is_some_and(|n| n.kind() == SyntaxKind::FunctionDeclaration)
        && arena.function_name(idx).is_some()
}

fn hoistable(arena: &NodeArena, stmt: NodeIndex) -> Option<Hoistable> {
    match arena.data(stmt)? {
        NodeData::Function(_) if is_named_declaration(arena, stmt) => Some(Hoistable::Declaration),
        NodeData::ExportNamed { declaration, .. } if is_named_declaration(arena, *declaration) => {
            Some(Hoistable::NamedExport(*declaration))
        }
        NodeData::ExportDefault { declaration } if is_named_declaration(arena, *declaration) => {
            Some(Hoistable::DefaultExport(*declaration))
        }
        _ => None,
    }
}

/// The function declared by `stmt`, directly or through an export.
fn declared_function(arena: &NodeArena, stmt: NodeIndex) -> Option<NodeIndex> {
    match hoistable(arena, stmt)? {
        Hoistable::Declaration => Some(stmt),
        Hoistable::NamedExport(func) | Hoistable::DefaultExport(func) => Some(func),
    }
}

/// True when a direct declaration of the list has a marker parameter.
pub fn has_marker_declaration(
    arena: &NodeArena,
    annotations: &NodeAnnotations,
    statements: &NodeList,
) -> bool {
    statements.iter().any(|stmt| {
        declared_function(arena, stmt)
            .is_some_and(|func| !marker_params(arena, annotations, func).is_empty())
    })
}

/// A directive prologue entry such as `"use strict";`.
pub(crate) fn is_directive(arena: &NodeArena, stmt: NodeIndex) -> bool {
    matches!(
        arena.data(stmt),
        Some(NodeData::ExpressionStatement { expression })
            if matches!(arena.data(*expression), Some(NodeData::Literal(LiteralValue::String(_))))
    )
}

/// `var name = function name(...) {...}` payload for a named declaration.
fn var_binding(arena: &mut NodeArena, func_idx: NodeIndex) -> Option<NodeData> {
    let func = arena.get_function(func_idx)?.clone();
    let name = arena.identifier_name(func.id)?.to_string();
    let span = arena.span(func_idx);
    let id_span = arena.span(func.id);

    let expr = arena.add(
        NodeData::Function(FunctionData {
            kind: FunctionKind::Expression,
            ..func
        }),
        span,
    );
    let binding = arena.add(NodeData::Identifier { name }, id_span);
    let declarator = arena.add(
        NodeData::VariableDeclarator {
            id: binding,
            init: expr,
        },
        span,
    );
    Some(NodeData::VariableDeclaration {
        kind: VariableKind::Var,
        declarations: NodeList::from(vec![declarator]),
    })
}

/// Hoist the direct function declarations of a program or block.
///
/// Leading directive strings stay first. Returns whether anything moved.
/// A block already annotated `HOISTED` is left alone.
pub fn hoist_block(
    arena: &mut NodeArena,
    annotations: &mut NodeAnnotations,
    block: NodeIndex,
) -> bool {
    if annotations.has(block, Annotation::HOISTED) {
        return false;
    }
    let Some(statements) = arena.statements(block).cloned() else {
        return false;
    };

    let mut prologue = Vec::new();
    let mut hoisted = Vec::new();
    let mut rest = Vec::new();
    let mut in_prologue = true;

    for stmt in statements.iter() {
        if in_prologue && is_directive(arena, stmt) {
            prologue.push(stmt);
            continue;
        }
        in_prologue = false;

        match hoistable(arena, stmt) {
            Some(Hoistable::Declaration) => {
                if let Some(binding) = var_binding(arena, stmt) {
                    arena.set_data(stmt, binding);
                }
                hoisted.push(stmt);
            }
            Some(Hoistable::NamedExport(func)) => {
                if let Some(binding) = var_binding(arena, func) {
                    arena.set_data(func, binding);
                }
                hoisted.push(stmt);
            }
            Some(Hoistable::DefaultExport(func)) => {
                let name = arena.function_name(func).unwrap_or_default().to_string();
                let id_span = arena.get_function(func).map(|f| arena.span(f.id));
                if let Some(binding) = var_binding(arena, func) {
                    let span = arena.span(func);
                    hoisted.push(arena.add(binding, span));
                    let reference =
                        arena.add(NodeData::Identifier { name }, id_span.unwrap_or_default());
                    arena.set_data(
                        stmt,
                        NodeData::ExportDefault {
                            declaration: reference,
                        },
                    );
                }
                rest.push(stmt);
            }
            None => rest.push(stmt),
        }
    }

    annotations.insert(block, Annotation::HOISTED);
    if hoisted.is_empty() {
        return false;
    }

    tracing::debug!(block = block.0, count = hoisted.len(), "hoisted function declarations");
    let reordered: NodeList = prologue.into_iter().chain(hoisted).chain(rest).collect();
    arena.set_statements(block, reordered);
    true
}

#[cfg(test)]
#[path = "../tests/hoist.rs"]
mod tests;
