use super::*;

fn marker(arena: &mut NodeArena) -> NodeIndex {
    arena.identifier(MARKER)
}

#[test]
fn classifies_every_dialect() {
    let mut arena = NodeArena::new();
    let annotations = NodeAnnotations::new();

    let plain = marker(&mut arena);
    let m = marker(&mut arena);
    let tilde = arena.unary("~", m);
    let m = marker(&mut arena);
    let bang = arena.unary("!", m);
    let m = marker(&mut arena);
    let void = arena.unary("void", m);
    let m = marker(&mut arena);
    let array = arena.array(vec![m]);
    let m = marker(&mut arena);
    let cb = arena.identifier("cb");
    let shift = arena.binary(m, ">>", cb);

    let cases = [
        (plain, MarkerKind::Plain),
        (tilde, MarkerKind::Tilde),
        (bang, MarkerKind::Bang),
        (void, MarkerKind::Void),
        (array, MarkerKind::Array),
        (shift, MarkerKind::Shift),
    ];
    for (idx, kind) in cases {
        assert_eq!(classify(&arena, &annotations, idx), kind);
        let id = marker_identifier(&arena, idx, kind);
        assert!(arena.is_identifier_named(id, MARKER));
    }
}

#[test]
fn lookalikes_are_not_markers() {
    let mut arena = NodeArena::new();
    let annotations = NodeAnnotations::new();

    let other = arena.identifier("__");
    let m = marker(&mut arena);
    let negated = arena.unary("-", m);
    let a = marker(&mut arena);
    let b = marker(&mut arena);
    let pair = arena.array(vec![a, b]);
    let x = arena.identifier("x");
    let m = marker(&mut arena);
    let reversed = arena.binary(x, ">>", m);
    let name = arena.string(MARKER);

    for idx in [other, negated, pair, reversed, name] {
        assert_eq!(classify(&arena, &annotations, idx), MarkerKind::NotAMarker);
    }
}

#[test]
fn consumed_marker_is_never_plain() {
    let mut arena = NodeArena::new();
    let mut annotations = NodeAnnotations::new();
    let m = marker(&mut arena);
    let tilde = arena.unary("~", m);

    annotations.insert(m, Annotation::CONSUMED_MARKER);
    assert_eq!(classify(&arena, &annotations, m), MarkerKind::NotAMarker);
    assert_eq!(classify(&arena, &annotations, tilde), MarkerKind::NotAMarker);
}

#[test]
fn only_plain_tilde_and_array_suspend() {
    assert!(MarkerKind::Plain.suspends());
    assert!(MarkerKind::Tilde.suspends());
    assert!(MarkerKind::Array.suspends());
    assert!(!MarkerKind::Bang.suspends());
    assert!(!MarkerKind::Void.suspends());
    assert!(!MarkerKind::Shift.suspends());
    assert!(!MarkerKind::NotAMarker.is_marker());
}

#[test]
fn finds_marker_parameters() {
    let mut arena = NodeArena::new();
    let annotations = NodeAnnotations::new();
    let x = arena.identifier("x");
    let m = marker(&mut arena);
    let y = arena.identifier("y");
    let func = arena.function_expr(Some("f"), vec![x, m, y], Vec::new());
    assert_eq!(marker_params(&arena, &annotations, func).as_slice(), &[1]);

    let plain = arena.function_expr(None, Vec::new(), Vec::new());
    assert!(marker_params(&arena, &annotations, plain).is_empty());
}
