//! `HttpBackend` against a local mock server.

use std::time::Duration;

use mockito::Matcher;
use pretty_assertions::assert_eq;
use recon_client::{
    ApiRequest, Backend, BackendOptions, ClientError, HttpBackend, MutationMode, submit,
};
use recon_core::ResourceKind;
use serde_json::json;

fn backend_for(server: &mockito::Server) -> HttpBackend {
    HttpBackend::new(&BackendOptions {
        base_url: format!("{}/api", server.url()),
        local_base_url: format!("{}/proxy", server.url()),
        request_timeout: Duration::from_secs(5),
        user_agent: "recon-test".into(),
    })
    .expect("backend builds")
}

#[tokio::test]
async fn sends_bearer_token_and_decodes_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/proxy/Evaluation/getByExperience/5")
        .match_header("authorization", "Bearer secret-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id": 9, "experienceId": 5}]"#)
        .create_async()
        .await;

    let backend = backend_for(&server);
    let resp = backend
        .send(
            &ApiRequest::get("/Evaluation/getByExperience/5"),
            Some("secret-token"),
        )
        .await
        .expect("request succeeds");

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, json!([{"id": 9, "experienceId": 5}]));
    mock.assert_async().await;
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/proxy/Evaluation")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let backend = backend_for(&server);
    let resp = backend.send(&ApiRequest::get("/Evaluation"), None).await;
    assert!(resp.is_ok());
    mock.assert_async().await;
}

#[tokio::test]
async fn direct_route_uses_absolute_base() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/Evaluation/4/generate-pdf")
        .with_status(200)
        .with_body("https://files.example.org/evaluation-4.pdf")
        .create_async()
        .await;

    let backend = backend_for(&server);
    let resp = backend
        .send(&ApiRequest::post("/Evaluation/4/generate-pdf").direct(), None)
        .await
        .expect("request succeeds");

    assert_eq!(
        resp.body,
        json!("https://files.example.org/evaluation-4.pdf")
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn non_success_becomes_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/proxy/Evaluation/List")
        .with_status(404)
        .with_body("not here")
        .create_async()
        .await;

    let backend = backend_for(&server);
    let err = backend
        .send(&ApiRequest::get("/Evaluation/List"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 404, ref message } if message == "not here"));
}

#[tokio::test]
async fn create_captures_location_header() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/proxy/Evaluation")
        .match_body(Matcher::Json(json!({"experienceId": 5, "score": 4})))
        .with_status(201)
        .with_header("location", "/api/Evaluation/123")
        .with_body("")
        .create_async()
        .await;

    let backend = backend_for(&server);
    let result = submit(
        &backend,
        ResourceKind::Evaluation,
        MutationMode::Create,
        json!({"experienceId": 5, "score": 4}),
        None,
    )
    .await
    .expect("mutation accepted");

    assert_eq!(result.status_code(), 201);
    assert_eq!(result.location_hint(), Some("/api/Evaluation/123"));
    assert!(result.raw_body().is_null());
}
