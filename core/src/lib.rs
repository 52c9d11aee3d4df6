//! Blocking client for a one-time secret sharing API.
//!
//! # Overview
//! Share or generate a secret, reveal it by its secret key, inspect or burn
//! it by its metadata key, and check service health. Requests are form
//! encoded, responses are JSON, and every request is authenticated with
//! HTTP Basic credentials.
//!
//! # Design
//! - `OtsClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse` (host-does-IO pattern).
//! - `Ots<T>` composes the two around an injected [`Transport`]. With the
//!   default `ureq-transport` feature, `UreqTransport` executes real
//!   requests; tests use closures or the in-process mock server.
//! - TTLs and timestamps travel as integer seconds; see [`codec`].
//!
//! ```no_run
//! use ots_core::{Config, Ots, ShareOptions};
//! use std::time::Duration;
//!
//! let ots = Ots::with_ureq(&Config::new("me@example.com", "api-key"));
//! let meta = ots.share("hunter2", &ShareOptions::new().ttl(Duration::from_secs(3600)))?;
//! println!("secret key: {}", meta.secret_key);
//! # Ok::<(), ots_core::ClientError>(())
//! ```

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod options;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use api::{Deadline, Ots};
pub use client::OtsClient;
pub use config::{Config, ConfigError, DEFAULT_BASE_URL};
pub use error::{ApiError, ClientError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use options::{FormParams, GenerateOptions, SecretOptions, ShareOptions};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{Metadata, Secret, State, Status};
