//! Integration tests for the MediaLive client using wiremock
//!
//! These tests run the full build-and-submit path against a mocked
//! creation endpoint, verifying that the signed request reaches the wire
//! unchanged and that success and error responses round back to the caller
//! the way the operator expects.

use aws_credential_types::Credentials;
use mlinput::error::Error;
use mlinput::input::{builder, InputRequestSpec, SourceType};
use mlinput::medialive::client::MediaLiveClient;
use mlinput::medialive::CreateInput;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(endpoint: &str) -> MediaLiveClient {
    let credentials = Credentials::new("AKIDEXAMPLE", "test-secret", None, None, "static");
    MediaLiveClient::with_endpoint("us-east-2", credentials, endpoint.to_string())
        .expect("client should construct")
}

fn aws_spec() -> InputRequestSpec {
    InputRequestSpec {
        name: Some("aws_2".to_string()),
        application_name: Some("live".to_string()),
        application_instance: Some("stream1".to_string()),
        secondary_application_name: None,
        secondary_application_instance: None,
        source_type: SourceType::Aws,
        allowed_cidr: Some("10.10.10.11/32".to_string()),
        subnet_ids: None,
        security_group_id: None,
        role_arn: None,
        network_id: None,
        static_ip: None,
        network_routes: None,
        tags: BTreeMap::new(),
    }
}

/// Successful creation: the signed payload hits the endpoint once and the
/// response record comes back verbatim.
#[tokio::test]
async fn test_create_input_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/inputs"))
        .and(header("content-type", "application/json"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "input": {
                "id": "4203196",
                "state": "DETACHED",
                "destinations": [
                    {"url": "rtmp://198.51.100.10:1935/live/stream1", "ip": "198.51.100.10", "port": "1935"},
                    {"url": "rtmp://198.51.100.99:1935/live/stream1", "ip": "198.51.100.99", "port": "1935"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = builder::build_and_submit(&aws_spec(), &client)
        .await
        .expect("creation should succeed");

    assert_eq!(result.input_id, "4203196");
    assert_eq!(result.state, "DETACHED");
    assert_eq!(result.destinations.len(), 2);
    assert_eq!(
        result.destinations[0].url,
        "rtmp://198.51.100.10:1935/live/stream1"
    );
    assert_eq!(result.destinations[1].ip.as_deref(), Some("198.51.100.99"));

    // The payload on the wire is exactly the variant shape, untouched by
    // signing.
    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().expect("JSON body");
    assert_eq!(body["name"], "aws_2");
    assert_eq!(body["type"], "RTMP_PUSH");
    assert_eq!(body["inputSecurityGroup"]["whitelistRules"][0]["cidr"], "10.10.10.11/32");
    assert!(body.get("inputVpcRequest").is_none());
    assert!(body.get("sources").is_none());
}

/// Duplicate-name rejection: the service's error code and message pass
/// through unmodified.
#[tokio::test]
async fn test_conflict_error_passed_through() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/inputs"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("x-amzn-errortype", "ConflictException")
                .set_body_json(json!({"message": "Input with name aws_2 already exists"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = builder::build_and_submit(&aws_spec(), &client)
        .await
        .expect_err("creation should fail");

    let Error::Remote(err) = err else {
        panic!("expected remote error, got {err:?}");
    };
    assert_eq!(err.code, "ConflictException");
    assert_eq!(err.message, "Input with name aws_2 already exists");
}

/// Authorization failure without the error-type header falls back to the
/// HTTP status for the code, keeping the body as the message.
#[tokio::test]
async fn test_forbidden_without_error_type_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/inputs"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_json(json!({"message": "User is not authorized to perform medialive:CreateInput"})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .create_input(&json!({"name": "x"}))
        .await
        .expect_err("call should fail");

    assert_eq!(err.code, "403 Forbidden");
    assert_eq!(
        err.message,
        "User is not authorized to perform medialive:CreateInput"
    );
}

/// Validation failures never touch the network.
#[tokio::test]
async fn test_invalid_spec_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/inputs"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let spec = InputRequestSpec {
        allowed_cidr: None,
        ..aws_spec()
    };
    let err = builder::build_and_submit(&spec, &client)
        .await
        .expect_err("validation should fail");

    assert!(matches!(err, Error::Validation(_)));
    let requests = server.received_requests().await.expect("requests recorded");
    assert!(requests.is_empty());
}

/// A quota rejection is just another remote error, surfaced once with no
/// retry.
#[tokio::test]
async fn test_quota_exceeded_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/prod/inputs"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-amzn-errortype", "TooManyRequestsException")
                .set_body_json(json!({"message": "Rate exceeded"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = builder::build_and_submit(&aws_spec(), &client)
        .await
        .expect_err("creation should fail");

    let Error::Remote(err) = err else {
        panic!("expected remote error");
    };
    assert_eq!(err.code, "TooManyRequestsException");
    assert_eq!(err.message, "Rate exceeded");
}
