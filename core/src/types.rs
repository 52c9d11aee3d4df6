//! Domain DTOs for the one-time secret API.
//!
//! # Design
//! These types mirror the service's JSON schema and are defined independently
//! from the mock-server crate. Integration tests catch any schema drift
//! between the two. Durations and timestamps go through the integer-seconds
//! codecs in [`crate::codec`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec;

/// Health of the remote service as reported by the status endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Offline,
    Nominal,
}

impl Status {
    /// `"nominal"` is healthy; every other value, including none, is offline.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("nominal") => Status::Nominal,
            _ => Status::Offline,
        }
    }
}

/// Lifecycle state of a secret, as seen through its metadata.
///
/// The service may add states over time, so any value outside the known set
/// decodes to [`State::Other`] and is written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum State {
    /// Neither the secret nor its metadata has been looked at.
    #[default]
    New,
    /// The owner fetched the metadata.
    Viewed,
    /// The recipient revealed the secret.
    Received,
    /// The owner burned the secret before it was revealed.
    Burned,
    /// Any other state the service reports, such as `expired`.
    Other(String),
}

impl State {
    pub fn as_str(&self) -> &str {
        match self {
            State::New => "new",
            State::Viewed => "viewed",
            State::Received => "received",
            State::Burned => "burned",
            State::Other(other) => other,
        }
    }
}

impl From<String> for State {
    fn from(value: String) -> Self {
        match value.as_str() {
            "new" => State::New,
            "viewed" => State::Viewed,
            "received" => State::Received,
            "burned" => State::Burned,
            _ => State::Other(value),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        match state {
            State::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A revealed secret.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret {
    pub secret_key: String,
    pub value: String,
}

/// Metadata describing a created secret.
///
/// `value` is only present right after `generate` (and on metadata fetched
/// before the secret was revealed). `received` is only present once the
/// state is [`State::Received`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub custid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub metadata_key: String,
    pub secret_key: String,
    #[serde(with = "codec::duration_secs")]
    pub ttl: Duration,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::duration_secs::option"
    )]
    pub metadata_ttl: Option<Duration>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::duration_secs::option"
    )]
    pub secret_ttl: Option<Duration>,
    pub state: State,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipient: Vec<String>,
    pub passphrase_required: bool,
    #[serde(with = "codec::timestamp_secs")]
    pub created: DateTime<Utc>,
    #[serde(with = "codec::timestamp_secs")]
    pub updated: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::timestamp_secs::option"
    )]
    pub received: Option<DateTime<Utc>>,
}

/// Wire shape of the status endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Wire shape of every non-200 response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
}
