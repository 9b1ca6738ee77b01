use super::*;

fn at(line: u32, column: u32) -> SourceLocation {
    SourceLocation::new(line, column)
}

#[test]
fn messages_carry_file_and_location() {
    let err = TransformError::ScopeError {
        file: "lib/a._js".to_string(),
        location: at(3, 8),
    };
    assert_eq!(
        err.to_string(),
        "lib/a._js:3:8: '_' used in a function that does not declare a '_' parameter"
    );

    let err = TransformError::TooManyMarkers {
        file: "a._js".to_string(),
        location: at(1, 10),
        limit: 2,
    };
    assert_eq!(
        err.to_string(),
        "a._js:1:10: too many '_' arguments: at most 2 are allowed in one call"
    );
}

#[test]
fn kind_names_are_kebab_case() {
    let file = String::from("x._js");
    let cases = [
        (
            TransformError::UnexpectedMarker {
                file: file.clone(),
                location: at(1, 0),
            },
            "unexpected-marker",
        ),
        (
            TransformError::IncompatibleModifiers {
                file: file.clone(),
                location: at(1, 0),
                modifier: "async",
            },
            "incompatible-modifiers",
        ),
        (
            TransformError::NestedDeclaration {
                file: file.clone(),
                location: at(1, 0),
                name: "f".to_string(),
            },
            "nested-declaration-error",
        ),
        (
            TransformError::InvalidRuntimeConfiguration {
                file,
                value: "threads".to_string(),
                expected: "'await'".to_string(),
            },
            "invalid-runtime-configuration",
        ),
    ];
    for (err, kind) in cases {
        assert_eq!(err.kind_name(), kind);
    }
}

#[test]
fn diagnostic_matches_error_message() {
    let err = TransformError::IncompatibleModifiers {
        file: "a._js".to_string(),
        location: at(2, 4),
        modifier: "generator",
    };
    let diag = err.to_diagnostic();
    assert_eq!(diag.code, diagnostic_codes::INCOMPATIBLE_MODIFIERS);
    assert!(!diag.is_warning());
    assert_eq!(diag.location, at(2, 4));
    assert_eq!(
        diag.message_text,
        "parameter '_' not allowed: function already marked 'generator'"
    );
    assert_eq!(format!("a._js:2:4: {}", diag.message_text), err.to_string());
}

#[test]
fn configuration_errors_have_no_location() {
    let err = TransformError::InvalidRuntimeConfiguration {
        file: "a._js".to_string(),
        value: "threads".to_string(),
        expected: "'callbacks', 'await'".to_string(),
    };
    assert!(!err.location().is_known());
    assert_eq!(err.file(), "a._js");
    assert_eq!(
        err.to_diagnostic().message_text,
        "invalid runtime 'threads': expected one of 'callbacks', 'await'"
    );
}

#[test]
fn nesting_limit_is_a_located_error() {
    let err = TransformError::NestingTooDeep {
        file: "deep._js".to_string(),
        location: at(4, 2),
        limit: 500,
    };
    assert_eq!(err.kind_name(), "nesting-too-deep");
    assert_eq!(err.code(), diagnostic_codes::NESTING_TOO_DEEP);
    assert_eq!(err.to_string(), "deep._js:4:2: syntax tree nesting exceeds 500 levels");
    let diag = err.to_diagnostic();
    assert!(!diag.is_warning());
    assert_eq!(format!("deep._js:4:2: {}", diag.message_text), err.to_string());
}
