//! Blocking [`Transport`] backed by `ureq`.
//!
//! Status codes are returned as data (`http_status_as_error(false)`) so the
//! response parser, not the transport, decides what a 4xx/5xx means. The
//! setting is forced on every request, so a caller-supplied agent cannot
//! turn an API error into a transport error. A request's own `timeout`
//! overrides the agent's global timeout for that request only.

use std::time::Duration;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Abort any request that has not completed within `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ureq::Agent> for UreqTransport {
    /// Use a caller-configured agent for proxies, TLS or pooling. Its
    /// `http_status_as_error` setting is ignored.
    fn from(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

/// Apply the request's headers and per-request config to `builder`.
fn prepare<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
    timeout: Option<Duration>,
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let config = builder.config().http_status_as_error(false);
    match timeout {
        Some(timeout) => config.timeout_global(Some(timeout)).build(),
        None => config.build(),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = req;
        let mut response = match (method, body) {
            (HttpMethod::Get, _) => prepare(self.agent.get(&url), &headers, timeout).call(),
            (HttpMethod::Post, Some(body)) => {
                prepare(self.agent.post(&url), &headers, timeout).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => {
                prepare(self.agent.post(&url), &headers, timeout).send_empty()
            }
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
