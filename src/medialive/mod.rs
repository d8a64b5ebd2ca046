//! MediaLive API interaction module
//!
//! Everything needed to talk to the MediaLive REST endpoint: credential and
//! region resolution, SigV4-signed HTTP, and the client that ties them
//! together.
//!
//! # Module Structure
//!
//! - [`auth`] - AWS credential and region resolution
//! - [`client`] - MediaLive client for the creation endpoint
//! - [`http`] - signed HTTP utilities for REST API calls
//!
//! The request builder never touches this module directly; it dispatches
//! through the [`CreateInput`] capability, so it can be exercised in tests
//! without any network dependency.

pub mod auth;
pub mod client;
pub mod http;

use crate::error::RemoteRequestError;
use async_trait::async_trait;
use serde_json::Value;

/// The single remote operation this tool performs.
///
/// Implemented by [`client::MediaLiveClient`] for real runs and by
/// recording mocks in tests. One invocation makes exactly one call; the
/// implementation must not retry.
#[async_trait]
pub trait CreateInput: Send + Sync {
    /// Submit a creation payload and return the raw response document.
    async fn create_input(&self, payload: &Value) -> Result<Value, RemoteRequestError>;
}
