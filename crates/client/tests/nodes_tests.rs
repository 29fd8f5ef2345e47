//! Node sub-API tests.

mod common;

use common::*;
use serde_json::json;

#[test]
fn test_create_node_returns_decoded_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/v1/node")
        .match_body(Matcher::PartialJsonString(
            r#"{"title": "Hello", "type": "article"}"#.to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"id": 11, "uri": "http://d8.test/node/11"}"#)
        .create();

    let gateway = gateway_for(&server);
    let created = gateway
        .nodes()
        .create(&json!({"title": "Hello", "type": "article"}))
        .unwrap();

    assert_eq!(created["id"], json!(11));
    mock.assert();
}

#[test]
fn test_create_node_logical_failure() {
    let mut server = Server::new();
    server
        .mock("POST", "/api/v1/node")
        .with_status(200)
        .with_body(r#"{"response_code": 403, "message": "not allowed"}"#)
        .create();

    let gateway = gateway_for(&server);
    let err = gateway.nodes().create(&json!({"title": "Hello"})).unwrap_err();
    match err {
        ClientError::ResponseCode(message) => assert!(message.contains("not allowed")),
        other => panic!("expected ResponseCode, got {other:?}"),
    }
}

#[test]
fn test_delete_node_resolves_id_by_title() {
    let mut server = Server::new();
    server
        .mock("GET", "/api/v1/node")
        .match_query(Matcher::UrlEncoded(
            "parameters[title]".into(),
            "Hello".into(),
        ))
        .with_status(200)
        .with_body(r#"{"list": [{"id": 11, "title": "Hello"}]}"#)
        .create();
    let delete = server
        .mock("DELETE", "/api/v1/node/11")
        .with_status(200)
        .with_body("[]")
        .create();

    let gateway = gateway_for(&server);
    gateway.nodes().delete(&json!({"title": "Hello"})).unwrap();
    delete.assert();
}

#[test]
fn test_delete_node_without_id_or_title_fails() {
    let server = Server::new();
    let gateway = gateway_for(&server);
    let err = gateway.nodes().delete(&json!({"type": "article"})).unwrap_err();
    assert!(matches!(err, ClientError::ResponseCode(_)));
}
