//! Error classification over the wire.
//!
//! These drive the full request path into each branch of the classifier:
//! rate-limit exhaustion, the two-factor challenge, structured 400/422
//! bodies, and the generic request error.

mod common;

use common::*;
use reqwest::Method;

#[test]
fn test_rate_limit_exhaustion_reports_configured_limit() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/drupal-remote-api/cache")
        .with_status(429)
        .with_header("X-RateLimit-Remaining", "0")
        .with_body("slow down")
        .create();

    let mut gateway = gateway_for(&server);
    gateway
        .set_option("api_limit", serde_json::Value::from(100))
        .unwrap();

    let err = gateway.cache().clear().unwrap_err();
    assert!(matches!(err, ClientError::RateLimitExceeded { limit: 100 }));
}

#[test]
fn test_rate_limit_header_with_remaining_quota_is_ignored() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/drupal-remote-api/cache")
        .with_status(500)
        .with_header("X-RateLimit-Remaining", "42")
        .with_body(r#"{"message": "server fell over"}"#)
        .create();

    let gateway = gateway_for(&server);
    let err = gateway.cache().clear().unwrap_err();
    match err {
        ClientError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "server fell over");
        }
        other => panic!("expected Request, got {other:?}"),
    }
}

#[test]
fn test_two_factor_challenge() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/drupal-remote-api/cache")
        .with_status(401)
        .with_header("X-Drupal-OTP", "required; app")
        .with_body("")
        .create();

    let gateway = gateway_for(&server);
    let err = gateway.cache().clear().unwrap_err();
    match err {
        ClientError::TwoFactorRequired { challenge } => assert_eq!(challenge, " app"),
        other => panic!("expected TwoFactorRequired, got {other:?}"),
    }
}

#[test]
fn test_bad_request_message_extracted() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/v1/node")
        .with_status(400)
        .with_body(r#"{"message": "Problems parsing JSON"}"#)
        .create();

    let gateway = gateway_for(&server);
    let err = gateway
        .request(Method::POST, "/node", &[], Some(&serde_json::json!({})))
        .unwrap_err();
    match err {
        ClientError::BadRequest(message) => assert_eq!(message, "Problems parsing JSON"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn test_validation_failure_renders_field_errors() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/v1/node")
        .with_status(422)
        .with_body(
            r#"{
                "message": "Validation Failed",
                "errors": [
                    {"code": "missing_field", "field": "title", "resource": "node"}
                ]
            }"#,
        )
        .create();

    let gateway = gateway_for(&server);
    let err = gateway
        .request(Method::POST, "/node", &[], Some(&serde_json::json!({})))
        .unwrap_err();
    match err {
        ClientError::ValidationFailed(message) => {
            assert!(message.contains("Field \"title\" is missing, for resource \"node\""));
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn test_generic_error_with_unstructured_body() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/drupal-remote-api/cache")
        .with_status(502)
        .with_body("Bad Gateway")
        .create();

    let gateway = gateway_for(&server);
    let err = gateway.cache().clear().unwrap_err();
    match err {
        ClientError::Request { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Request, got {other:?}"),
    }
}
