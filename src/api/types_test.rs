use super::*;

#[test]
fn comment_decodes_wire_field_names() {
    let json = r#"{"id":1,"say":"hi","created_at":"2024-01-01T00:00:00Z"}"#;
    let comment: Comment = serde_json::from_str(json).unwrap();
    assert_eq!(
        comment,
        Comment { id: 1, body: "hi".into(), created_at: "2024-01-01T00:00:00Z".into() }
    );
}

#[test]
fn comment_ignores_unknown_fields() {
    let json = r#"{"id":7,"say":"x","created_at":"t","author":"someone"}"#;
    let comment: Comment = serde_json::from_str(json).unwrap();
    assert_eq!(comment.id, 7);
}

#[test]
fn comment_missing_say_is_rejected() {
    let json = r#"{"id":1,"created_at":"2024-01-01T00:00:00Z"}"#;
    assert!(serde_json::from_str::<Comment>(json).is_err());
}

#[test]
fn say_request_serializes_single_field() {
    let body = serde_json::to_value(SayRequest { say: " hello " }).unwrap();
    assert_eq!(body, serde_json::json!({ "say": " hello " }));
}

#[test]
fn validate_rejects_empty_and_whitespace() {
    assert_eq!(validate_body(""), Err(ValidationError::Empty));
    assert_eq!(validate_body("   \n\t"), Err(ValidationError::Empty));
}

#[test]
fn validate_keeps_surrounding_whitespace() {
    assert_eq!(validate_body("  hi  "), Ok("  hi  "));
}

#[test]
fn validate_counts_chars_not_bytes() {
    let at_limit = "é".repeat(MAX_BODY_CHARS);
    assert!(validate_body(&at_limit).is_ok());

    let over = "a".repeat(MAX_BODY_CHARS + 1);
    assert_eq!(
        validate_body(&over),
        Err(ValidationError::TooLong { max: MAX_BODY_CHARS, actual: MAX_BODY_CHARS + 1 })
    );
}

#[test]
fn draft_set_and_clear() {
    let mut draft = Draft::default();
    assert!(draft.is_empty());
    draft.set("x");
    assert_eq!(draft.text(), "x");
    assert_eq!(draft.validate(), Ok("x"));
    draft.clear();
    assert!(draft.is_empty());
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(SubmitError::Busy.error_code(), "E_BUSY");
    assert_eq!(SubmitError::from(ValidationError::Empty).error_code(), "E_VALIDATION_EMPTY");
    assert_eq!(FetchError::Decode("bad".into()).error_code(), "E_API_PARSE");
    assert_eq!(
        FetchError::Status { status: 503, body: String::new() }.error_code(),
        "E_API_RESPONSE"
    );
}

#[test]
fn validation_is_not_retryable() {
    assert!(!SubmitError::Validation(ValidationError::Empty).retryable());
    assert!(SubmitError::Transport("refused".into()).retryable());
}

#[test]
fn status_is_exposed_only_for_status_errors() {
    assert_eq!(SubmitError::Status { status: 500, body: String::new() }.status(), Some(500));
    assert_eq!(SubmitError::Transport("dns".into()).status(), None);
    assert_eq!(FetchError::Status { status: 404, body: String::new() }.status(), Some(404));
    assert_eq!(FetchError::Decode("x".into()).status(), None);
}
