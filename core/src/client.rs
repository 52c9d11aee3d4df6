//! Stateless HTTP request builder and response parser for the one-time
//! secret API.
//!
//! # Design
//! `OtsClient` holds only the base URL and the precomputed authorization
//! header, and carries no mutable state between calls. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The round-trip in
//! between is somebody else's job (see [`crate::api::Ots`]), keeping this
//! layer deterministic and free of I/O.
//!
//! Keys are spliced into the path verbatim. A key containing `/`, `?` or
//! `#` changes the resource the request targets.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{ApiError, ClientError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::options::{FormParams, GenerateOptions, SecretOptions, ShareOptions, SECRET};
use crate::types::{ErrorResponse, Metadata, Secret, Status, StatusResponse};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const SUCCESS: u16 = 200;

/// Synchronous, stateless request builder and response parser.
#[derive(Clone)]
pub struct OtsClient {
    base_url: String,
    authorization: String,
}

impl OtsClient {
    pub fn new(config: &Config) -> Self {
        let credentials = format!("{}:{}", config.username, config.api_key);
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", STANDARD.encode(credentials)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_status(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "status", None)
    }

    /// Share `secret`. The value is passed through unchecked.
    pub fn build_share(&self, secret: &str, options: &ShareOptions) -> Result<HttpRequest> {
        let mut form = FormParams::new();
        form.set(SECRET, secret);
        form.extend(options.params());
        self.form_request("share", &form)
    }

    pub fn build_generate(&self, options: &GenerateOptions) -> Result<HttpRequest> {
        self.form_request("generate", options.params())
    }

    pub fn build_secret(&self, secret_key: &str, options: &SecretOptions) -> Result<HttpRequest> {
        self.form_request(&format!("secret/{secret_key}"), options.params())
    }

    pub fn build_metadata(&self, metadata_key: &str) -> Result<HttpRequest> {
        self.form_request(&format!("private/{metadata_key}"), &FormParams::new())
    }

    pub fn build_burn(&self, metadata_key: &str) -> Result<HttpRequest> {
        self.form_request(&format!("private/{metadata_key}/burn"), &FormParams::new())
    }

    pub fn parse_status(&self, response: HttpResponse) -> Result<Status> {
        let res: StatusResponse = decode(response)?;
        Ok(Status::from_wire(res.status.as_deref()))
    }

    pub fn parse_share(&self, response: HttpResponse) -> Result<Metadata> {
        decode(response)
    }

    pub fn parse_generate(&self, response: HttpResponse) -> Result<Metadata> {
        decode(response)
    }

    pub fn parse_secret(&self, response: HttpResponse) -> Result<Secret> {
        decode(response)
    }

    pub fn parse_metadata(&self, response: HttpResponse) -> Result<Metadata> {
        decode(response)
    }

    /// The body of a successful burn is ignored.
    pub fn parse_burn(&self, response: HttpResponse) -> Result<()> {
        check_status(&response)
    }

    fn form_request(&self, resource: &str, form: &FormParams) -> Result<HttpRequest> {
        let body = form.encode()?;
        let mut request = self.request(HttpMethod::Post, resource, Some(body));
        request
            .headers
            .push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
        Ok(request)
    }

    fn request(&self, method: HttpMethod, resource: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}/{resource}", self.base_url),
            headers: vec![("authorization".to_string(), self.authorization.clone())],
            body,
            timeout: None,
        }
    }
}

// The authorization header embeds the API key.
impl std::fmt::Debug for OtsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Turn a non-200 response into an `ApiError`.
///
/// The error payload must itself be valid JSON; a malformed one is reported
/// as `ClientError::Decode` rather than an API error with no message.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.status == SUCCESS {
        return Ok(());
    }
    let payload: ErrorResponse = serde_json::from_str(&response.body)?;
    Err(ClientError::Api(ApiError {
        message: payload.message.unwrap_or_default(),
        status_code: response.status,
    }))
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T> {
    check_status(&response)?;
    Ok(serde_json::from_str(&response.body)?)
}
