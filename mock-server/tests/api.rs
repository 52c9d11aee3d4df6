use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, ErrorBody, Metadata, Secret, SecretState};
use tower::ServiceExt;

// base64("alice@example.com:key")
const AUTH: &str = "Basic YWxpY2VAZXhhbXBsZS5jb206a2V5";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(
            http::header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(body.to_string())
        .unwrap()
}

// --- status ---

#[tokio::test]
async fn status_is_nominal() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/status")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["status"], "nominal");
}

// --- share ---

#[tokio::test]
async fn share_returns_metadata() {
    let resp = app()
        .oneshot(form_request(
            "/api/v1/share",
            "secret=hello&ttl=300&recipient=bob%40example.com&passphrase=pw",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let metadata: Metadata = body_json(resp).await;
    assert_eq!(metadata.custid, "alice@example.com");
    assert_eq!(metadata.ttl, 300);
    assert_eq!(metadata.secret_ttl, 300);
    assert_eq!(metadata.metadata_ttl, 600);
    assert_eq!(metadata.state, SecretState::New);
    assert_eq!(metadata.recipient, vec!["bob@example.com".to_string()]);
    assert!(metadata.passphrase_required);
    assert!(metadata.value.is_none());
}

#[tokio::test]
async fn share_without_secret_returns_400() {
    let resp = app()
        .oneshot(form_request("/api/v1/share", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.message, "You did not provide anything to share");
}

#[tokio::test]
async fn share_without_credentials_returns_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/share")
                .header(
                    http::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body("secret=x".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.message, "Not authorized");
}

// --- generate ---

#[tokio::test]
async fn generate_includes_value() {
    let resp = app()
        .oneshot(form_request("/api/v1/generate", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let metadata: Metadata = body_json(resp).await;
    assert_eq!(metadata.value.as_deref().map(str::len), Some(12));
    assert_eq!(metadata.ttl, mock_server::DEFAULT_TTL);
    assert!(!metadata.passphrase_required);
}

#[tokio::test]
async fn share_with_maximum_ttl_saturates_metadata_ttl() {
    let resp = app()
        .oneshot(form_request(
            "/api/v1/share",
            &format!("secret=hello&ttl={}", u64::MAX),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let metadata: Metadata = body_json(resp).await;
    assert_eq!(metadata.ttl, u64::MAX);
    assert_eq!(metadata.secret_ttl, u64::MAX);
    assert_eq!(metadata.metadata_ttl, u64::MAX);
}

// --- secret / private ---

#[tokio::test]
async fn unknown_secret_returns_404() {
    let resp = app()
        .oneshot(form_request("/api/v1/secret/nope", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ErrorBody = body_json(resp).await;
    assert_eq!(err.message, "Unknown secret");
}

#[tokio::test]
async fn unknown_metadata_returns_404() {
    let resp = app()
        .oneshot(form_request("/api/v1/private/nope", ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn share_reveal_burn_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // share with a passphrase
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("/api/v1/share", "secret=walk+the+dog&passphrase=pw"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Metadata = body_json(resp).await;

    // metadata: first look moves the state to viewed
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/private/{}", created.metadata_key),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let viewed: Metadata = body_json(resp).await;
    assert_eq!(viewed.state, SecretState::Viewed);

    // reveal with the wrong passphrase
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/secret/{}", created.secret_key),
            "passphrase=wrong",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // reveal with the right one
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/secret/{}", created.secret_key),
            "passphrase=pw",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let secret: Secret = body_json(resp).await;
    assert_eq!(secret.value, "walk the dog");
    assert_eq!(secret.secret_key, created.secret_key);

    // metadata now reports the secret as received
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/private/{}", created.metadata_key),
            "",
        ))
        .await
        .unwrap();
    let received: Metadata = body_json(resp).await;
    assert_eq!(received.state, SecretState::Received);
    assert!(received.received.is_some());

    // burning a revealed secret fails
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/private/{}/burn", created.metadata_key),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // a second reveal fails
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/secret/{}", created.secret_key),
            "passphrase=pw",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn burn_makes_secret_unreachable() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request("/api/v1/generate", ""))
        .await
        .unwrap();
    let created: Metadata = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/private/{}/burn", created.metadata_key),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["state"]["state"], "burned");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            &format!("/api/v1/secret/{}", created.secret_key),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
