//! Blocking façade: one method per remote operation.
//!
//! Each call builds the request with [`OtsClient`], hands it to the
//! transport and parses what comes back. Nothing is retried and nothing is
//! cached; the façade is as stateless as the client it wraps.
//!
//! [`Ots::with_deadline`] bounds a single call without touching the
//! transport's configuration:
//!
//! ```no_run
//! # use std::time::Duration;
//! # use ots_core::{Ots, SecretOptions};
//! # fn reveal(ots: &Ots<ots_core::UreqTransport>) -> ots_core::Result<()> {
//! let secret = ots
//!     .with_deadline(Duration::from_secs(2))
//!     .secret("secretKey", &SecretOptions::new())?;
//! println!("{}", secret.value);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::debug;

use crate::client::OtsClient;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::options::{GenerateOptions, SecretOptions, ShareOptions};
use crate::types::{Metadata, Secret, Status};

/// Client for the one-time secret API over a pluggable [`Transport`].
#[derive(Debug, Clone)]
pub struct Ots<T> {
    client: OtsClient,
    transport: T,
}

impl<T: Transport> Ots<T> {
    pub fn new(config: &Config, transport: T) -> Self {
        Self {
            client: OtsClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &OtsClient {
        &self.client
    }

    /// Run the next call with `timeout` as its deadline. The transport
    /// gives up on that exchange once the deadline passes.
    pub fn with_deadline(&self, timeout: Duration) -> Deadline<'_, T> {
        Deadline {
            ots: self,
            timeout: Some(timeout),
        }
    }

    fn unbounded(&self) -> Deadline<'_, T> {
        Deadline {
            ots: self,
            timeout: None,
        }
    }

    /// Health of the service. Anything other than `"nominal"` is offline.
    pub fn status(&self) -> Result<Status> {
        self.unbounded().status()
    }

    /// Store `secret` and return the metadata describing it.
    pub fn share(&self, secret: &str, options: &ShareOptions) -> Result<Metadata> {
        self.unbounded().share(secret, options)
    }

    /// Have the service generate a secret. The returned metadata carries
    /// the generated value.
    pub fn generate(&self, options: &GenerateOptions) -> Result<Metadata> {
        self.unbounded().generate(options)
    }

    /// Reveal a secret. The service only answers once per secret.
    pub fn secret(&self, secret_key: &str, options: &SecretOptions) -> Result<Secret> {
        self.unbounded().secret(secret_key, options)
    }

    pub fn metadata(&self, metadata_key: &str) -> Result<Metadata> {
        self.unbounded().metadata(metadata_key)
    }

    /// Invalidate a secret before it is revealed.
    pub fn burn(&self, metadata_key: &str) -> Result<()> {
        self.unbounded().burn(metadata_key)
    }
}

/// One call on an [`Ots`] client, optionally bounded by a deadline.
///
/// Returned by [`Ots::with_deadline`]. Offers the same operations as the
/// client it borrows.
#[derive(Debug)]
pub struct Deadline<'a, T> {
    ots: &'a Ots<T>,
    timeout: Option<Duration>,
}

impl<T: Transport> Deadline<'_, T> {
    pub fn status(&self) -> Result<Status> {
        let res = self.send("status", self.ots.client.build_status())?;
        self.ots.client.parse_status(res)
    }

    pub fn share(&self, secret: &str, options: &ShareOptions) -> Result<Metadata> {
        let req = self.ots.client.build_share(secret, options)?;
        let res = self.send("share", req)?;
        self.ots.client.parse_share(res)
    }

    pub fn generate(&self, options: &GenerateOptions) -> Result<Metadata> {
        let req = self.ots.client.build_generate(options)?;
        let res = self.send("generate", req)?;
        self.ots.client.parse_generate(res)
    }

    pub fn secret(&self, secret_key: &str, options: &SecretOptions) -> Result<Secret> {
        let req = self.ots.client.build_secret(secret_key, options)?;
        let res = self.send("secret", req)?;
        self.ots.client.parse_secret(res)
    }

    pub fn metadata(&self, metadata_key: &str) -> Result<Metadata> {
        let req = self.ots.client.build_metadata(metadata_key)?;
        let res = self.send("metadata", req)?;
        self.ots.client.parse_metadata(res)
    }

    pub fn burn(&self, metadata_key: &str) -> Result<()> {
        let req = self.ots.client.build_burn(metadata_key)?;
        let res = self.send("burn", req)?;
        self.ots.client.parse_burn(res)
    }

    fn send(&self, operation: &'static str, mut request: HttpRequest) -> Result<HttpResponse> {
        request.timeout = self.timeout;
        debug!(
            operation,
            method = %request.method,
            url = %request.url,
            timeout = ?request.timeout,
            "sending request"
        );
        let response = self
            .ots
            .transport
            .execute(request)
            .map_err(ClientError::Transport)?;
        debug!(operation, status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(feature = "ureq-transport")]
impl Ots<crate::transport::UreqTransport> {
    /// Client over a default [`UreqTransport`](crate::transport::UreqTransport).
    pub fn with_ureq(config: &Config) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }

    /// [`Ots::with_ureq`] configured from `OTS_*` environment variables.
    pub fn from_env() -> std::result::Result<Self, crate::config::ConfigError> {
        Ok(Self::with_ureq(&Config::from_env()?))
    }
}
