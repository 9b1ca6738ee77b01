use super::*;
use crate::runtime::RuntimeProfile;

fn state_for(arena: &NodeArena, options: &TransformOptions) -> TransformState {
    let profile = RuntimeProfile::by_name("await").unwrap();
    TransformState::new(arena, profile, options, FileDirectives::default())
}

#[test]
fn annotations_accumulate_flags() {
    let mut annotations = NodeAnnotations::new();
    let idx = NodeIndex(3);
    annotations.insert(idx, Annotation::TRANSFORMED);
    annotations.insert(idx, Annotation::COROUTINE);
    assert!(annotations.has(idx, Annotation::TRANSFORMED | Annotation::COROUTINE));
    assert!(!annotations.has(idx, Annotation::HOISTED));
    assert!(!annotations.has(NodeIndex(4), Annotation::TRANSFORMED));

    annotations.insert(NodeIndex::NONE, Annotation::HOISTED);
    assert_eq!(annotations.len(), 1);
}

#[test]
fn unique_names_avoid_existing_identifiers() {
    let mut arena = NodeArena::new();
    arena.identifier("_weft");
    arena.identifier("_1");
    let mut names = UniqueNames::from_arena(&arena);

    assert!(names.is_used("_weft"));
    assert_eq!(names.unique("_weft"), "_weft1");
    assert_eq!(names.unique("_weft"), "_weft2");
    assert_eq!(names.unique("_"), "_");
    assert_eq!(names.unique("_"), "_2");
}

#[test]
fn bindings_are_unique_per_unit() {
    let mut arena = NodeArena::new();
    arena.identifier("_filename");
    let state = state_for(&arena, &TransformOptions::default());
    assert_eq!(state.runtime_binding, "_weft");
    assert_eq!(state.filename_binding, "_filename1");
    assert_eq!(state.runtime_module(), "weft-runtime/lib/await/runtime");
    assert_eq!(state.file, "<anonymous>");
}

#[test]
fn scope_stack_reports_nearest_function() {
    let arena = NodeArena::new();
    let mut state = state_for(&arena, &TransformOptions::default());
    assert!(state.current_scope().is_none());
    assert!(!state.in_transformed_scope());

    state.scopes.push(ScopeRecord {
        function: NodeIndex(0),
        is_transformed: true,
    });
    state.scopes.push(ScopeRecord {
        function: NodeIndex(1),
        is_transformed: false,
    });
    assert!(!state.in_transformed_scope());
    state.scopes.pop();
    assert!(state.in_transformed_scope());
}

#[test]
fn deprecated_forms_are_summarized_once() {
    let arena = NodeArena::new();
    let mut state = state_for(&arena, &TransformOptions::default().with_filename("a._js"));
    state.record_deprecated(SourceLocation::new(4, 2));
    state.record_deprecated(SourceLocation::new(9, 0));

    let warnings = state.finish();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, diagnostic_codes::DEPRECATED_MARKER_SYNTAX);
    assert_eq!(
        warnings[0].message_text,
        "deprecated marker syntax used 2 time(s), at line(s) 4, 9"
    );
}

#[test]
fn quiet_units_drop_warnings() {
    let arena = NodeArena::new();
    let options = TransformOptions {
        quiet: true,
        ..TransformOptions::default()
    };
    let mut state = state_for(&arena, &options);
    state.record_deprecated(SourceLocation::new(1, 0));
    state.warn(Diagnostic::from_code(
        diagnostic_codes::ASYNC_CALL_AT_TOP_LEVEL,
        "a._js",
        SourceLocation::new(1, 0),
        &[],
    ));
    assert!(state.warnings().is_empty());
    assert!(state.finish().is_empty());
}
