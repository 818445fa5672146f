//! Integration tests driving `AgentClient` against an in-process agent
//! served with axum.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{extract::Json, http::StatusCode, routing::post, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use specforge_agent_client::AgentClient;
use specforge_core::{AgentApi, GenerationResult, Spec, SpecId};

fn sample_spec(id: &str) -> Spec {
    Spec::new("square", "( n -- n² )".parse().unwrap(), "DUP_TRANSFORM_001")
        .with_id(SpecId::new(id))
        .with_test_case(vec![5], vec![25])
}

/// A well-behaved agent: accepts every spec, generates a dup-multiply word,
/// and verifies whatever it is shown.
fn happy_agent() -> Router {
    Router::new()
        .route(
            "/spec/validate",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["stack_effect"], "( n -- n² )");
                Json(json!({"valid": true}))
            }),
        )
        .route(
            "/generate",
            post(|Json(body): Json<Value>| async move {
                let word = body["word"].as_str().unwrap_or_default().to_string();
                Json(json!({
                    "code": format!(": {} dup * ;", word),
                    "tests": [{"input": [5], "expected": [25], "passed": true}],
                }))
            }),
        )
        .route(
            "/verify",
            post(|Json(body): Json<Value>| async move {
                assert!(body["code"].as_str().unwrap_or_default().contains("dup"));
                assert_eq!(body["effect"], "( n -- n² )");
                Json(json!({"valid": true}))
            }),
        )
}

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn open_client(addr: SocketAddr) -> AgentClient {
    let mut client = AgentClient::new(format!("http://{}", addr), Duration::from_secs(5));
    client.open().await.unwrap();
    client
}

#[tokio::test]
async fn drives_all_three_endpoints() {
    let addr = serve(happy_agent()).await;
    let client = open_client(addr).await;
    let spec = sample_spec("func_0");

    let validation = client.validate(&spec).await.unwrap();
    assert!(validation.valid);

    let generated = client.generate(&spec).await.unwrap();
    let code = match generated {
        GenerationResult::Success { code, tests } => {
            assert_eq!(tests.len(), 1);
            assert!(tests[0].passed);
            code
        }
        GenerationResult::Failure { error } => panic!("unexpected generation error: {error}"),
    };
    assert_eq!(code, ": square dup * ;");

    let verification = client.verify(&code, &spec.effect).await.unwrap();
    assert!(verification.valid);
}

#[tokio::test]
async fn generation_error_payload_is_a_failure_variant() {
    let router = Router::new().route(
        "/generate",
        post(|| async { Json(json!({"error": "no pattern matched"})) }),
    );
    let addr = serve(router).await;
    let client = open_client(addr).await;

    let generated = client.generate(&sample_spec("func_1")).await.unwrap();
    assert_eq!(
        generated,
        GenerationResult::Failure {
            error: "no pattern matched".to_string()
        }
    );
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let router = Router::new().route(
        "/spec/validate",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(router).await;
    let client = open_client(addr).await;

    let err = client.validate(&sample_spec("func_2")).await.unwrap_err();
    assert!(err.message().contains("500"));
}

#[tokio::test]
async fn unreachable_agent_is_a_transport_error() {
    // Bind then drop the listener so the port refuses connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = AgentClient::new(format!("http://{}", addr), Duration::from_secs(2));
    client.open().await.unwrap();

    assert!(client.validate(&sample_spec("func_3")).await.is_err());
}

#[tokio::test]
async fn closed_session_refuses_calls() {
    let addr = serve(happy_agent()).await;
    let mut client = open_client(addr).await;

    client.close();
    let err = client.validate(&sample_spec("func_4")).await.unwrap_err();
    assert_eq!(err.message(), "agent session is not open");
}
