//! End-to-end generation against a local GraphQL endpoint.
//!
//! Serves the introspection fixture over HTTP, runs the standard pipeline
//! and checks the generated file on disk.

#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use std::fs::read_to_string;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use schemagen_codegen::{GenerationPipeline, PipelineError, PipelineState, TargetFailure, run_targets};
use schemagen_core::TargetConfig;
use schemagen_fetch::FetchError;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

const FIXTURE: &str = include_str!("fixtures/introspection.json");

/// Fails the first `failures` requests with a 500.
struct Endpoint {
    /// Scripted failures before the fixture is served
    failures: u32,
    /// Requests received so far
    hits: AtomicU32,
}

async fn graphql(State(endpoint): State<Arc<Endpoint>>) -> (StatusCode, &'static str) {
    let hit = endpoint.hits.fetch_add(1, Ordering::SeqCst) + 1;
    if hit <= endpoint.failures {
        (StatusCode::INTERNAL_SERVER_ERROR, "warming up")
    } else {
        (StatusCode::OK, FIXTURE)
    }
}

async fn serve(failures: u32) -> (SocketAddr, Arc<Endpoint>) {
    let endpoint = Arc::new(Endpoint {
        failures,
        hits: AtomicU32::new(0),
    });
    let app = Router::new()
        .route("/graphql", post(graphql))
        .with_state(Arc::clone(&endpoint));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _served = axum::serve(listener, app).await;
    });
    (addr, endpoint)
}

fn target(addr: SocketAddr, output: &Path, class_name: &str) -> TargetConfig {
    let mut config = TargetConfig::new(format!("http://{addr}/graphql"));
    config.class_name = class_name.to_owned();
    config.package = "com.example".to_owned();
    config.output_dir = output.display().to_string();
    config.headers = vec!["Authorization:Bearer token".to_owned()];
    config.max_retries = 1;
    config.retry_backoff_ms = 10;
    config
}

#[tokio::test]
async fn test_generates_java_after_a_server_error() {
    let (addr, endpoint) = serve(1).await;
    let output = TempDir::new().unwrap();
    let validated = target(addr, output.path(), "Api").validate().unwrap();

    let outcome = GenerationPipeline::standard()
        .unwrap()
        .run(&validated, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 2);
    assert!(outcome.report.passed(), "{}", outcome.report.format_error_report());
    assert_eq!(outcome.states.last(), Some(&PipelineState::Done));
    assert_eq!(outcome.path, output.path().join("Api.java"));

    let written = read_to_string(&outcome.path).unwrap();
    assert_eq!(written, outcome.content);
    assert!(written.starts_with("package com.example;"));
    assert!(written.contains("public class Api {"));
    assert!(written.contains("public static OperationBuilder usersQuery() {"));
    assert!(written.contains("public static OperationBuilder createUserMutation() {"));
    assert!(written.contains("public static class CreateUserInput {"));
    assert!(written.contains("private List<String> tags;"));
    assert!(written.contains("private Boolean public_;"));
    assert!(written.contains("public enum Role {"));
    assert!(!written.contains("__Type"));
}

#[tokio::test]
async fn test_server_errors_exhaust_retries() {
    let (addr, endpoint) = serve(u32::MAX).await;
    let output = TempDir::new().unwrap();
    let validated = target(addr, output.path(), "Api").validate().unwrap();

    let err = GenerationPipeline::standard()
        .unwrap()
        .run(&validated, &CancellationToken::new())
        .await
        .unwrap_err();

    match &err {
        PipelineError::Fetch(FetchError::Server {
            attempts,
            status,
            header_names,
            ..
        }) => {
            assert_eq!(*attempts, 2);
            assert_eq!(*status, 500);
            assert_eq!(header_names, &vec!["Authorization".to_owned()]);
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert!(!err.to_string().contains("Bearer token"));
    assert_eq!(endpoint.hits.load(Ordering::SeqCst), 2);
    assert!(!output.path().join("Api.java").exists());
}

#[tokio::test]
async fn test_batch_isolates_invalid_targets() {
    let (addr, _endpoint) = serve(0).await;
    let output = TempDir::new().unwrap();

    let mut negative = target(addr, output.path(), "Broken");
    negative.max_retries = -1;
    let targets = vec![
        target(addr, output.path(), "Api"),
        negative,
        target(addr, &output.path().join("admin"), "AdminApi"),
    ];

    let pipeline = GenerationPipeline::standard().unwrap();
    let results = run_targets(&pipeline, &targets, &CancellationToken::new()).await;

    assert!(results[0].as_ref().unwrap().path.ends_with("Api.java"));
    let rejected = results[1].as_ref().unwrap_err();
    assert!(matches!(rejected.source, TargetFailure::Config(_)));
    assert!(rejected.to_string().contains("max_retries"));
    assert!(output.path().join("admin").join("AdminApi.java").exists());
    assert!(!output.path().join("Broken.java").exists());
}
