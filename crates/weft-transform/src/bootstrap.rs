//! Program prologue and the program-async entry wrapper.
//!
//! ```text
//! "use strict";
//! var _weft = require("weft-runtime/lib/callbacks/runtime");
//! var _filename = "lib/a._js";
//! var regeneratorRuntime = _weft.regeneratorRuntime;
//! import ... / export ...
//! _weft.async(function* _$$$$() { ...top level... }, 0, 1).call(this, function (e) {
//!     if (e) throw e;
//! });
//! ```

use crate::function_wrapper::inner_name;
use crate::hoist::is_directive;
use crate::state::{Annotation, TransformState};
use weft_ast::{
    FunctionData, FunctionKind, NodeArena, NodeData, NodeIndex, SyntaxKind, VariableKind,
};

const POLYFILL_BINDING: &str = "regeneratorRuntime";

fn is_module_item(arena: &NodeArena, stmt: NodeIndex) -> bool {
    arena.get(stmt).is_some_and(|n| {
        matches!(
            n.kind(),
            SyntaxKind::ImportDeclaration
                | SyntaxKind::ExportNamedDeclaration
                | SyntaxKind::ExportDefaultDeclaration
        )
    })
}

/// True when a generator function is reachable from any of `roots`.
fn contains_generator(arena: &NodeArena, roots: &[NodeIndex]) -> bool {
    let mut stack = roots.to_vec();
    while let Some(idx) = stack.pop() {
        if arena.get_function(idx).is_some_and(|f| f.is_generator) {
            return true;
        }
        stack.extend(arena.children(idx));
    }
    false
}

/// `<rt>.async(<coroutine>, 0, 1).call(this, function (e) { if (e) throw e; });`
fn entry_wrapper(
    arena: &mut NodeArena,
    state: &mut TransformState,
    body: Vec<NodeIndex>,
) -> NodeIndex {
    let profile = state.profile;
    let name = state.names.unique(&inner_name(""));
    let id = arena.identifier(name);
    let block = arena.block(body);
    let coroutine = arena.add_synthetic(NodeData::Function(FunctionData {
        kind: FunctionKind::Expression,
        id,
        params: Default::default(),
        body: block,
        is_async: profile.uses_native_coroutine,
        is_generator: profile.uses_generator_coroutine,
        expression_body: false,
    }));
    state.annotations.insert(coroutine, Annotation::TRANSFORMED);

    let rt = arena.identifier(state.runtime_binding.clone());
    let adapt = arena.member(rt, "async");
    let callback_index = arena.number(0.0);
    let arity = arena.number(1.0);
    let adapted = arena.call(adapt, vec![coroutine, callback_index, arity]);
    let invoke = arena.member(adapted, "call");

    let test = arena.identifier("e");
    let thrown = arena.identifier("e");
    let rethrow = arena.throw(thrown);
    let check = arena.if_stmt(test, rethrow, None);
    let param = arena.identifier("e");
    let callback = arena.function_expr(None, vec![param], vec![check]);

    let this = arena.this();
    let call = arena.call(invoke, vec![this, callback]);
    arena.expr_stmt(call)
}

/// Prepend the prologue and, for program-async units, move the top level
/// into the entry coroutine.
pub fn bootstrap(arena: &mut NodeArena, state: &mut TransformState, program: NodeIndex) {
    let Some(statements) = arena.statements(program).cloned() else {
        return;
    };
    let prologue_len = statements
        .iter()
        .take_while(|&stmt| is_directive(arena, stmt))
        .count();

    let mut out: Vec<NodeIndex> = statements.iter().take(prologue_len).collect();
    let body: Vec<NodeIndex> = statements.iter().skip(prologue_len).collect();

    let require = arena.identifier("require");
    let module = arena.string(state.runtime_module());
    let load = arena.call(require, vec![module]);
    out.push(arena.var_decl(VariableKind::Var, state.runtime_binding.clone(), Some(load)));
    let file = arena.string(state.file.clone());
    out.push(arena.var_decl(VariableKind::Var, state.filename_binding.clone(), Some(file)));
    let polyfill_at = out.len();

    if state.program_async {
        let (module_items, rest): (Vec<_>, Vec<_>) =
            body.into_iter().partition(|&stmt| is_module_item(arena, stmt));
        out.extend(module_items);
        let wrapper = entry_wrapper(arena, state, rest);
        out.push(wrapper);
        tracing::debug!(file = %state.file, "wrapped top level in entry coroutine");
    } else {
        out.extend(body);
    }

    if state.profile.needs_generator_polyfill && contains_generator(arena, &out) {
        let rt = arena.identifier(state.runtime_binding.clone());
        let polyfill = arena.member(rt, POLYFILL_BINDING);
        let decl = arena.var_decl(VariableKind::Var, POLYFILL_BINDING, Some(polyfill));
        out.insert(polyfill_at, decl);
    }

    arena.set_statements(program, out.into_iter().collect());
}

#[cfg(test)]
#[path = "../tests/bootstrap.rs"]
mod tests;
