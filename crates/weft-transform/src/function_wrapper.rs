//! Function wrapper.
//!
//! A function with a marker parameter keeps its name and arity, but its body
//! is moved into an inner coroutine that the runtime adapts back to a
//! callback-taking function:
//!
//! ```text
//! function f(x, _) { body }
//!     =>
//! function f(x, _1) {
//!     return _weft.async(function* _$$f$$(x, _) { body }, 1, 2).apply(this, arguments);
//! }
//! ```
//!
//! Arrows have no `arguments`, so they forward their parameters explicitly
//! with `.call(this, ...)`.
//!
//! `super` is not valid inside the inner function expression. Property
//! lookups on it go through an arrow declared in the outer function, which
//! still has the method's home object:
//!
//! ```text
//! m(_1) {
//!     var _super = (name) => super[name];
//!     return _weft.async(function* _$$m$$(_) { _super("load").call(this, x); }, 0, 1)...
//! }
//! ```

use crate::marker::MARKER;
use crate::runtime::RuntimeProfile;
use crate::state::{Annotation, TransformState};
use weft_ast::{
    FunctionData, FunctionKind, NodeArena, NodeData, NodeIndex, NodeList, SyntaxKind, VariableKind,
};

/// Name of the inner coroutine for a function named `base`.
pub fn inner_name(base: &str) -> String {
    format!("_$${base}$$")
}

/// Block body of a function; expression bodies become `{ return expr; }`.
fn block_body(arena: &mut NodeArena, func: &FunctionData) -> NodeIndex {
    if !func.expression_body {
        return func.body;
    }
    let span = arena.span(func.body);
    let ret = arena.add(
        NodeData::Return {
            argument: func.body,
        },
        span,
    );
    arena.block(vec![ret])
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ParamShape {
    Plain,
    /// Had a default value; stays `name = undefined` so `.length` is kept
    Defaulted,
    Rest,
}

/// Name and shape of the outer parameter standing in for `param`.
fn outer_param(
    arena: &NodeArena,
    state: &mut TransformState,
    param: NodeIndex,
) -> (String, ParamShape) {
    match arena.data(param) {
        Some(NodeData::Identifier { name }) => (name.clone(), ParamShape::Plain),
        Some(NodeData::AssignmentPattern { left, .. }) => match arena.identifier_name(*left) {
            Some(name) => (name.to_string(), ParamShape::Defaulted),
            None => (state.names.unique("_arg"), ParamShape::Defaulted),
        },
        Some(NodeData::RestElement { argument }) => match arena.identifier_name(*argument) {
            Some(name) => (name.to_string(), ParamShape::Rest),
            None => (state.names.unique("_rest"), ParamShape::Rest),
        },
        _ => (state.names.unique("_arg"), ParamShape::Plain),
    }
}

#[derive(Default)]
struct SuperLookups {
    /// Calls whose callee is a `super` member
    calls: Vec<NodeIndex>,
    reads: Vec<NodeIndex>,
    /// `super` objects of assignment targets
    writes: Vec<NodeIndex>,
}

/// `super.x` and `super[x]` uses in `root`. Nested non-arrow functions and
/// classes have their own `super` and are not entered.
fn super_lookups(arena: &NodeArena, root: NodeIndex) -> SuperLookups {
    let is_super_member = |idx: NodeIndex| {
        matches!(arena.data(idx), Some(NodeData::Member { object, .. })
            if matches!(arena.data(*object), Some(NodeData::Super)))
    };
    let mut found = SuperLookups::default();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        let Some(node) = arena.get(idx) else {
            continue;
        };
        match &node.data {
            NodeData::Call {
                callee, arguments, ..
            } if is_super_member(*callee) => {
                found.calls.push(idx);
                stack.extend(arena.children(*callee));
                stack.extend(arguments.iter());
            }
            NodeData::Assignment { left, right, .. } if is_super_member(*left) => {
                if let Some(NodeData::Member { object, .. }) = arena.data(*left) {
                    found.writes.push(*object);
                }
                stack.extend(arena.children(*left));
                stack.push(*right);
            }
            NodeData::Member { .. } if is_super_member(idx) => {
                found.reads.push(idx);
                stack.extend(arena.children(idx));
            }
            NodeData::Function(func) if func.kind != FunctionKind::Arrow => {}
            _ if matches!(
                node.kind(),
                SyntaxKind::ClassDeclaration | SyntaxKind::ClassExpression
            ) => {}
            _ => stack.extend(arena.children(idx)),
        }
    }
    found
}

/// `_super("name")` for a `super.name` / `super[expr]` member.
fn super_access(arena: &mut NodeArena, accessor: &str, member: NodeIndex) -> Option<NodeIndex> {
    let Some(NodeData::Member {
        property, computed, ..
    }) = arena.data(member).cloned()
    else {
        return None;
    };
    let key = if computed {
        property
    } else {
        let name = arena.identifier_name(property)?.to_string();
        arena.string(name)
    };
    let callee = arena.identifier(accessor);
    Some(arena.call(callee, vec![key]))
}

/// Route the `super` lookups of `body` through an accessor arrow and return
/// its declaration for the outer function.
fn bind_super(
    arena: &mut NodeArena,
    state: &mut TransformState,
    body: NodeIndex,
) -> Option<NodeIndex> {
    let found = super_lookups(arena, body);
    // super.x = v stores on the receiver
    for &object in &found.writes {
        arena.set_data(object, NodeData::This);
    }
    if found.calls.is_empty() && found.reads.is_empty() {
        return None;
    }
    let accessor = state.names.unique("_super");

    for call in found.calls {
        let Some(NodeData::Call {
            callee,
            arguments,
            optional,
        }) = arena.data(call).cloned()
        else {
            continue;
        };
        let Some(lookup) = super_access(arena, &accessor, callee) else {
            continue;
        };
        let invoke = arena.member(lookup, "call");
        let mut args = vec![arena.this()];
        args.extend(arguments.iter());
        arena.set_data(
            call,
            NodeData::Call {
                callee: invoke,
                arguments: args.into(),
                optional,
            },
        );
    }
    for read in found.reads {
        if let Some(lookup) = super_access(arena, &accessor, read) {
            if let Some(data) = arena.data(lookup).cloned() {
                arena.set_data(read, data);
            }
        }
    }

    // var _super = (name) => super[name];
    let param = arena.identifier("name");
    let sup = arena.add_synthetic(NodeData::Super);
    let key = arena.identifier("name");
    let lookup = arena.computed_member(sup, key);
    let arrow = arena.add_synthetic(NodeData::Function(FunctionData {
        kind: FunctionKind::Arrow,
        id: NodeIndex::NONE,
        params: vec![param].into(),
        body: lookup,
        is_async: false,
        is_generator: false,
        expression_body: true,
    }));
    tracing::debug!(accessor = %accessor, "bound super lookups");
    Some(arena.var_decl(VariableKind::Var, accessor, Some(arrow)))
}

/// Rewrite `func_idx` in place into the outer/inner pair.
///
/// `name_hint` names the inner coroutine of anonymous functions, usually
/// taken from the enclosing declarator, assignment or property key.
pub fn wrap_function(
    arena: &mut NodeArena,
    state: &mut TransformState,
    func_idx: NodeIndex,
    marker_index: usize,
    name_hint: Option<&str>,
) {
    let Some(func) = arena.get_function(func_idx).cloned() else {
        return;
    };
    let span = arena.span(func_idx);
    let profile = state.profile;
    let arity = func.params.len();

    let base = arena
        .identifier_name(func.id)
        .or(name_hint)
        .unwrap_or_default()
        .to_string();
    let inner_id_name = state.names.unique(&inner_name(&base));

    // Inner coroutine: original parameters and body
    let inner_body = block_body(arena, &func);
    let super_binding = bind_super(arena, state, inner_body);
    let inner_id = arena.identifier(inner_id_name.clone());
    let inner = arena.add(
        NodeData::Function(FunctionData {
            kind: FunctionKind::Expression,
            id: inner_id,
            params: func.params.clone(),
            body: inner_body,
            is_async: profile.uses_native_coroutine,
            is_generator: profile.uses_generator_coroutine,
            expression_body: false,
        }),
        span,
    );
    state.annotations.insert(inner, Annotation::TRANSFORMED);
    if profile.has_coroutine_syntax() {
        state.annotations.insert(inner, Annotation::COROUTINE);
    }

    // Outer parameters: same count, marker replaced by a fresh name
    let is_arrow = func.kind == FunctionKind::Arrow;
    let mut outer_params = NodeList::new();
    let mut forwarded = Vec::new();
    for (i, param) in func.params.iter().enumerate() {
        let param_span = arena.span(param);
        let (name, shape) = if i == marker_index {
            (state.names.unique(MARKER), ParamShape::Plain)
        } else {
            outer_param(arena, state, param)
        };
        let id = arena.add(NodeData::Identifier { name: name.clone() }, param_span);
        let outer = match shape {
            ParamShape::Plain => id,
            ParamShape::Defaulted => {
                let undefined = arena.identifier("undefined");
                arena.add(
                    NodeData::AssignmentPattern {
                        left: id,
                        right: undefined,
                    },
                    param_span,
                )
            }
            ParamShape::Rest => arena.add(NodeData::RestElement { argument: id }, param_span),
        };
        outer_params.push(outer);
        if is_arrow {
            let reference = arena.identifier(name);
            forwarded.push(if shape == ParamShape::Rest {
                arena.spread(reference)
            } else {
                reference
            });
        }
    }

    // return <rt>.async(inner, i, arity).apply(this, arguments)
    let rt = arena.identifier(state.runtime_binding.clone());
    let adapt = arena.member(rt, "async");
    let index = arena.number(marker_index as f64);
    let declared_arity = arena.number(arity as f64);
    let adapted = arena.call(adapt, vec![inner, index, declared_arity]);
    let this = arena.this();
    let forward = if is_arrow {
        let callee = arena.member(adapted, "call");
        let mut args = vec![this];
        args.extend(forwarded);
        arena.call(callee, args)
    } else {
        let callee = arena.member(adapted, "apply");
        let arguments = arena.identifier("arguments");
        arena.call(callee, vec![this, arguments])
    };
    let ret = arena.ret(Some(forward));
    let body = arena.block(super_binding.into_iter().chain([ret]).collect());

    arena.set_data(
        func_idx,
        NodeData::Function(FunctionData {
            kind: func.kind,
            id: func.id,
            params: outer_params,
            body,
            is_async: false,
            is_generator: false,
            expression_body: false,
        }),
    );
    tracing::debug!(
        function = func_idx.0,
        inner = %inner_id_name,
        marker_index,
        arity,
        "wrapped marker function"
    );
}

/// Apply the profile's coroutine modifier to a function tagged `COROUTINE`
/// without a marker parameter (immediately invoked closures).
pub fn make_coroutine(arena: &mut NodeArena, profile: &RuntimeProfile, func_idx: NodeIndex) {
    if let Some(func) = arena.get_function_mut(func_idx) {
        func.is_async = profile.uses_native_coroutine;
        func.is_generator = profile.uses_generator_coroutine;
    }
}

/// Turn an arrow into an equivalent function expression, giving expression
/// bodies a block. Generators cannot be arrows.
pub fn arrow_to_function(arena: &mut NodeArena, func_idx: NodeIndex) {
    let Some(func) = arena.get_function(func_idx).cloned() else {
        return;
    };
    if func.kind != FunctionKind::Arrow {
        return;
    }
    let body = block_body(arena, &func);
    if let Some(func) = arena.get_function_mut(func_idx) {
        func.kind = FunctionKind::Expression;
        func.body = body;
        func.expression_body = false;
    }
}

#[cfg(test)]
#[path = "../tests/function_wrapper.rs"]
mod tests;
