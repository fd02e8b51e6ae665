use docgen_api::error::parse_error_message;
use docgen_api::DocgenApiError;
use reqwest::StatusCode;

#[test]
fn error_detail_field_is_used_verbatim() {
    let message = parse_error_message(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail":"doc_type must be one of: readme, api, architecture"}"#,
    );
    assert_eq!(message, "doc_type must be one of: readme, api, architecture");
}

#[test]
fn error_empty_body_falls_back_to_canonical_reason() {
    let message = parse_error_message(StatusCode::BAD_GATEWAY, "");
    assert_eq!(message, "Bad Gateway");
}

#[test]
fn error_non_json_body_is_passed_through() {
    let message = parse_error_message(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");
    assert_eq!(message, "upstream exploded");
}

#[test]
fn error_json_without_detail_is_passed_through() {
    let body = r#"{"message":"not the field we read"}"#;
    let message = parse_error_message(StatusCode::BAD_REQUEST, body);
    assert_eq!(message, body);
}

#[test]
fn error_blank_detail_is_not_used() {
    let message = parse_error_message(StatusCode::BAD_REQUEST, r#"{"detail":"  "}"#);
    assert_eq!(message, r#"{"detail":"  "}"#);
}

#[test]
fn error_display_formats_are_stable() {
    assert_eq!(DocgenApiError::Unauthorized.to_string(), "unauthorized");
    assert_eq!(
        DocgenApiError::AuthExchange("bad code".to_owned()).to_string(),
        "authentication failed: bad code"
    );
    assert_eq!(
        DocgenApiError::Status(StatusCode::NOT_FOUND, "missing".to_owned()).to_string(),
        "HTTP 404 Not Found missing"
    );
    assert_eq!(
        DocgenApiError::Cancelled.to_string(),
        "request was cancelled"
    );
}
