use super::*;
use weft_ast::NodeList;
use weft_common::Span;

fn program_with_comments(comments: Vec<Comment>) -> (NodeArena, NodeIndex) {
    let mut arena = NodeArena::new();
    let x = arena.identifier("x");
    let stmt = arena.add(
        NodeData::ExpressionStatement { expression: x },
        Span::new(40, 42, Default::default()),
    );
    let program = arena.add(
        NodeData::Program {
            body: vec![stmt].into(),
            comments,
            source_type: Default::default(),
        },
        Span::SYNTHETIC,
    );
    (arena, program)
}

#[test]
fn options_parse_from_camel_case_json() {
    let options = TransformOptions::from_json(
        r#"{
            "runtime": "await",
            "forceTransform": true,
            "fastIteration": true,
            "adapterRoot": "rt/lib",
            "manifest": { "devDependencies": { "weft-runtime": "^1.0.0" } }
        }"#,
    )
    .unwrap();
    assert_eq!(options.runtime.as_deref(), Some("await"));
    assert!(options.force_transform);
    assert!(options.fast_iteration);
    assert!(!options.quiet);
    assert_eq!(options.adapter_root(), "rt/lib");
    assert_eq!(options.file_name(), ANONYMOUS_FILE);
    assert!(options.manifest.unwrap().depends_on(RUNTIME_PACKAGE));
}

#[test]
fn defaults_fill_missing_fields() {
    let options = TransformOptions::from_json("{}").unwrap();
    assert_eq!(options, TransformOptions::default());
    assert_eq!(options.adapter_root(), DEFAULT_ADAPTER_ROOT);
}

#[test]
fn directives_come_from_leading_comments_only() {
    let (arena, program) = program_with_comments(vec![
        Comment::line(" @weft-force @weft-quiet", 0, 24),
        Comment::block(" @weft-no-quiet ", 25, 39),
        Comment::line(" @weft-fast-iteration", 50, 70),
    ]);
    let directives = FileDirectives::from_program(&arena, program);
    assert!(directives.is_set("force"));
    assert!(!directives.is_set("quiet"));
    // After the first statement
    assert!(!directives.is_set("fast-iteration"));
    assert!(!directives.is_set("unknown"));
}

#[test]
fn eligibility_rules() {
    let mut arena = NodeArena::new();
    let program = arena.program(Vec::new());
    let none = FileDirectives::default();

    let anonymous = TransformOptions::default();
    assert!(is_eligible(&arena, program, &anonymous, &none));

    let suffixed = TransformOptions::default().with_filename("lib/a._js");
    assert!(is_eligible(&arena, program, &suffixed, &none));
    let typed = TransformOptions::default().with_filename("lib/a._ts");
    assert!(is_eligible(&arena, program, &typed, &none));

    let plain = TransformOptions::default().with_filename("lib/a.js");
    assert!(!is_eligible(&arena, program, &plain, &none));

    let forced = TransformOptions {
        force_transform: true,
        ..plain.clone()
    };
    assert!(is_eligible(&arena, program, &forced, &none));

    let (commented, commented_program) =
        program_with_comments(vec![Comment::line("@weft-force", 0, 12)]);
    let directives = FileDirectives::from_program(&commented, commented_program);
    assert!(is_eligible(&commented, commented_program, &plain, &directives));
}

#[test]
fn runtime_import_needs_manifest_dependency() {
    let mut arena = NodeArena::new();
    let require = arena.identifier("require");
    let source = arena.string("weft-runtime/lib/util");
    let load = arena.call(require, vec![source]);
    let stmt = arena.expr_stmt(load);
    let program = arena.program(vec![stmt]);
    assert!(loads_runtime_package(&arena, program));

    let mut manifest = PackageManifest::default();
    let plain = TransformOptions::default().with_filename("a.js");
    let none = FileDirectives::default();
    assert!(!is_eligible(&arena, program, &plain, &none));

    manifest
        .dependencies
        .insert(RUNTIME_PACKAGE.to_string(), "1.0.0".to_string());
    let with_manifest = TransformOptions {
        manifest: Some(manifest),
        ..plain
    };
    assert!(is_eligible(&arena, program, &with_manifest, &none));
}

#[test]
fn similarly_named_packages_do_not_count() {
    let mut arena = NodeArena::new();
    let import = arena.add_synthetic(NodeData::ImportDeclaration {
        specifiers: NodeList::new(),
        source: "weft-runtime-extra".to_string(),
    });
    let program = arena.program(vec![import]);
    assert!(!loads_runtime_package(&arena, program));
}
