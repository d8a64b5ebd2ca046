//! MediaLive Client
//!
//! Bundles resolved credentials, the signed HTTP client and the regional
//! endpoint into the one capability this tool needs: creating an input.

use super::auth;
use super::http::MediaLiveHttpClient;
use super::CreateInput;
use crate::error::RemoteRequestError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_credential_types::Credentials;
use serde_json::Value;

/// Client for the MediaLive creation endpoint
#[derive(Clone)]
pub struct MediaLiveClient {
    credentials: Credentials,
    http: MediaLiveHttpClient,
    region: String,
    endpoint: String,
}

impl MediaLiveClient {
    /// Create a new client for a region, resolving credentials from the
    /// default provider chain.
    pub async fn new(region: &str) -> Result<Self> {
        let credentials = auth::resolve_credentials()
            .await
            .context("Failed to initialize AWS credentials")?;

        Self::with_endpoint(
            region,
            credentials,
            format!("https://medialive.{region}.amazonaws.com"),
        )
    }

    /// Create a client against an explicit endpoint.
    ///
    /// Used by `new` for the regional endpoint and by integration tests to
    /// point at a mock server.
    pub fn with_endpoint(region: &str, credentials: Credentials, endpoint: String) -> Result<Self> {
        let http = MediaLiveHttpClient::new()?;

        Ok(Self {
            credentials,
            http,
            region: region.to_string(),
            endpoint,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// URL of the input collection resource.
    pub fn inputs_url(&self) -> String {
        format!("{}/prod/inputs", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl CreateInput for MediaLiveClient {
    async fn create_input(&self, payload: &Value) -> Result<Value, RemoteRequestError> {
        self.http
            .post_signed(&self.inputs_url(), &self.region, &self.credentials, payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(endpoint: &str) -> MediaLiveClient {
        let credentials = Credentials::new("akid", "secret", None, None, "static");
        MediaLiveClient::with_endpoint("us-east-2", credentials, endpoint.to_string()).unwrap()
    }

    #[test]
    fn test_inputs_url() {
        let client = test_client("https://medialive.us-east-2.amazonaws.com");
        assert_eq!(
            client.inputs_url(),
            "https://medialive.us-east-2.amazonaws.com/prod/inputs"
        );
    }

    #[test]
    fn test_inputs_url_strips_trailing_slash() {
        let client = test_client("http://127.0.0.1:8080/");
        assert_eq!(client.inputs_url(), "http://127.0.0.1:8080/prod/inputs");
    }
}
