//! ClickTrackerError 单元测试

use actix_web::http::StatusCode;

use clicktracker::errors::ClickTrackerError;

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ClickTrackerError::database_config("x").code(), "E001");
    assert_eq!(ClickTrackerError::database_connection("x").code(), "E002");
    assert_eq!(ClickTrackerError::database_operation("x").code(), "E003");
    assert_eq!(ClickTrackerError::validation("x").code(), "E004");
    assert_eq!(ClickTrackerError::auth("x").code(), "E005");
    assert_eq!(ClickTrackerError::not_found("x").code(), "E006");
    assert_eq!(ClickTrackerError::conflict("x").code(), "E007");
    assert_eq!(ClickTrackerError::serialization("x").code(), "E008");
    assert_eq!(ClickTrackerError::date_parse("x").code(), "E009");
    assert_eq!(ClickTrackerError::password_hash("x").code(), "E010");
}

#[test]
fn test_http_status_mapping() {
    assert_eq!(
        ClickTrackerError::validation("x").http_status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ClickTrackerError::date_parse("x").http_status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        ClickTrackerError::auth("x").http_status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        ClickTrackerError::not_found("x").http_status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        ClickTrackerError::conflict("x").http_status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        ClickTrackerError::database_operation("x").http_status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        ClickTrackerError::serialization("x").http_status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_display_format() {
    let err = ClickTrackerError::validation("missing field");
    assert_eq!(err.to_string(), "Validation Error: missing field");
    assert_eq!(err.message(), "missing field");
    assert_eq!(err.error_type(), "Validation Error");
}

#[test]
fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
    let err: ClickTrackerError = json_err.into();
    assert!(matches!(err, ClickTrackerError::Serialization(_)));
}

#[test]
fn test_from_chrono_parse_error() {
    let parse_err = chrono::DateTime::parse_from_rfc3339("nope").unwrap_err();
    let err: ClickTrackerError = parse_err.into();
    assert!(matches!(err, ClickTrackerError::DateParse(_)));
}
