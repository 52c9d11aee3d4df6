//! In-memory stand-in for the one-time secret API.
//!
//! Serves the same endpoints under `/api/v1` with the same JSON shapes:
//! integer-second TTLs, epoch-second timestamps, `{"message": ...}` error
//! bodies. Secrets can be revealed once; burning or revealing removes them.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_TTL: u64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretState {
    New,
    Viewed,
    Received,
    Burned,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Metadata {
    pub custid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub metadata_key: String,
    pub secret_key: String,
    pub ttl: u64,
    pub metadata_ttl: u64,
    pub secret_ttl: u64,
    pub state: SecretState,
    pub recipient: Vec<String>,
    pub passphrase_required: bool,
    pub created: i64,
    pub updated: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Secret {
    pub secret_key: String,
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateForm {
    pub secret: Option<String>,
    pub passphrase: Option<String>,
    pub ttl: Option<u64>,
    pub recipient: Option<String>,
}

#[derive(Deserialize)]
pub struct RevealForm {
    pub passphrase: Option<String>,
}

struct StoredSecret {
    value: String,
    passphrase: Option<String>,
    metadata_key: String,
}

#[derive(Default)]
pub struct Store {
    secrets: HashMap<String, StoredSecret>,
    metadata: HashMap<String, Metadata>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/status", get(status))
        .route("/share", post(share))
        .route("/generate", post(generate))
        .route("/secret/{key}", post(reveal))
        .route("/private/{key}", post(metadata))
        .route("/private/{key}/burn", post(burn))
        .with_state(db);
    Router::new().nest("/api/v1", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Customer id from an `Authorization: Basic` header with a non-empty key.
fn authorize(headers: &HeaderMap) -> Result<String, (StatusCode, Json<ErrorBody>)> {
    let unauthorized = || failure(StatusCode::UNAUTHORIZED, "Not authorized");
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or_else(unauthorized)?;
    let decoded = STANDARD.decode(value).map_err(|_| unauthorized())?;
    let decoded = String::from_utf8(decoded).map_err(|_| unauthorized())?;
    match decoded.split_once(':') {
        Some((user, key)) if !user.is_empty() && !key.is_empty() => Ok(user.to_string()),
        _ => Err(unauthorized()),
    }
}

fn new_key() -> String {
    Uuid::new_v4().simple().to_string()
}

async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "nominal" }))
}

async fn create(db: &Db, custid: String, value: String, form: CreateForm) -> Metadata {
    let now = Utc::now().timestamp();
    let ttl = form.ttl.unwrap_or(DEFAULT_TTL);
    let passphrase = form.passphrase.filter(|p| !p.is_empty());
    let metadata = Metadata {
        custid,
        value: None,
        metadata_key: new_key(),
        secret_key: new_key(),
        ttl,
        metadata_ttl: ttl.saturating_mul(2),
        secret_ttl: ttl,
        state: SecretState::New,
        recipient: form.recipient.into_iter().collect(),
        passphrase_required: passphrase.is_some(),
        created: now,
        updated: now,
        received: None,
    };

    let mut store = db.write().await;
    store.secrets.insert(
        metadata.secret_key.clone(),
        StoredSecret {
            value,
            passphrase,
            metadata_key: metadata.metadata_key.clone(),
        },
    );
    store
        .metadata
        .insert(metadata.metadata_key.clone(), metadata.clone());
    tracing::debug!(metadata_key = %metadata.metadata_key, "secret created");
    metadata
}

async fn share(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(mut form): Form<CreateForm>,
) -> ApiResult<Metadata> {
    let custid = authorize(&headers)?;
    let secret = form
        .secret
        .take()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "You did not provide anything to share"))?;
    Ok(Json(create(&db, custid, secret, form).await))
}

async fn generate(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<CreateForm>,
) -> ApiResult<Metadata> {
    let custid = authorize(&headers)?;
    let value: String = new_key().chars().take(12).collect();
    let mut metadata = create(&db, custid, value.clone(), form).await;
    metadata.value = Some(value);
    Ok(Json(metadata))
}

async fn reveal(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Form(form): Form<RevealForm>,
) -> ApiResult<Secret> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let unknown = || failure(StatusCode::NOT_FOUND, "Unknown secret");
    let stored = store.secrets.get(&key).ok_or_else(unknown)?;
    if stored.passphrase.is_some() && stored.passphrase != form.passphrase {
        return Err(unknown());
    }
    let stored = store.secrets.remove(&key).ok_or_else(unknown)?;

    if let Some(metadata) = store.metadata.get_mut(&stored.metadata_key) {
        let now = Utc::now().timestamp();
        metadata.state = SecretState::Received;
        metadata.updated = now;
        metadata.received = Some(now);
    }
    Ok(Json(Secret {
        secret_key: key,
        value: stored.value,
    }))
}

async fn metadata(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Metadata> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let metadata = store
        .metadata
        .get_mut(&key)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Unknown metadata"))?;
    if metadata.state == SecretState::New {
        metadata.state = SecretState::Viewed;
        metadata.updated = Utc::now().timestamp();
    }
    Ok(Json(metadata.clone()))
}

async fn burn(
    State(db): State<Db>,
    Path(key): Path<String>,
    headers: HeaderMap,
) -> ApiResult<serde_json::Value> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let Store { secrets, metadata } = &mut *store;
    let metadata = metadata
        .get_mut(&key)
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "Unknown metadata"))?;
    if secrets.remove(&metadata.secret_key).is_none() {
        return Err(failure(StatusCode::BAD_REQUEST, "Secret already gone"));
    }
    metadata.state = SecretState::Burned;
    metadata.updated = Utc::now().timestamp();
    tracing::debug!(metadata_key = %key, "secret burned");
    Ok(Json(serde_json::json!({
        "state": metadata.clone(),
        "secret_shortkey": metadata.secret_key.chars().take(8).collect::<String>(),
    })))
}
