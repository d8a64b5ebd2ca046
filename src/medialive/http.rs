//! HTTP utilities for the MediaLive REST API
//!
//! Requests are signed with SigV4 and sent through reqwest. Error bodies
//! are carried back verbatim in [`RemoteRequestError`]; only the *logged*
//! copy is truncated and sanitized.

use crate::error::RemoteRequestError;
use anyhow::{Context, Result};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::Client;
use serde_json::Value;
use std::time::SystemTime;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Header MediaLive uses to name the error type on failure responses.
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // The cut must land on a char boundary; service messages are
        // arbitrary UTF-8.
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Build the `RemoteRequestError` for a non-success response.
///
/// The code comes from the service's error-type header when present
/// (trimmed of the URI prefix some services attach), otherwise from the
/// HTTP status; the message is the body's `message` field, or the raw body.
fn remote_error(status: reqwest::StatusCode, error_type: Option<&str>, body: &str) -> RemoteRequestError {
    let code = error_type
        .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        .unwrap_or_else(|| status.to_string());

    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("Message"))
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| body.to_string());

    RemoteRequestError::new(code, message)
}

/// HTTP client wrapper for MediaLive API calls
#[derive(Clone)]
pub struct MediaLiveHttpClient {
    client: Client,
}

impl MediaLiveHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mlinput/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Make a SigV4-signed POST request with a JSON body.
    ///
    /// Exactly one attempt; any failure along the way (signing, transport,
    /// or a non-success status) is surfaced as [`RemoteRequestError`] and
    /// never retried.
    pub async fn post_signed(
        &self,
        url: &str,
        region: &str,
        credentials: &Credentials,
        body: &Value,
    ) -> Result<Value, RemoteRequestError> {
        tracing::debug!("POST {}", url);

        let body_bytes = serde_json::to_vec(body)
            .map_err(|e| RemoteRequestError::new("RequestError", format!("failed to encode payload: {e}")))?;

        let request = self
            .build_signed_request(url, region, credentials, body_bytes)
            .map_err(|e| RemoteRequestError::new("SigningError", format!("{e:#}")))?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| RemoteRequestError::new("TransportError", e.to_string()))?;

        let status = response.status();
        let error_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        let response_body = response
            .text()
            .await
            .map_err(|e| RemoteRequestError::new("TransportError", e.to_string()))?;

        if !status.is_success() {
            // Log a sanitized copy only; the error itself stays verbatim
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&response_body));
            return Err(remote_error(status, error_type.as_deref(), &response_body));
        }

        // Handle empty response
        if response_body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&response_body).map_err(|e| {
            tracing::error!("Unparseable response: {}", sanitize_for_log(&response_body));
            RemoteRequestError::new("ResponseError", format!("failed to parse response JSON: {e}"))
        })
    }

    /// Build and sign the POST request.
    fn build_signed_request(
        &self,
        url: &str,
        region: &str,
        credentials: &Credentials,
        body_bytes: Vec<u8>,
    ) -> Result<reqwest::Request> {
        let uri: http::Uri = url.parse().context("Invalid endpoint URL")?;
        let host = match (uri.host(), uri.port_u16()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => anyhow::bail!("Endpoint URL has no host: {url}"),
        };

        let headers = [
            ("host", host.as_str()),
            ("content-type", "application/json"),
        ];

        let identity: Identity = credentials.clone().into();
        let params = v4::SigningParams::builder()
            .identity(&identity)
            .region(region)
            .name("medialive")
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .context("Failed to build signing parameters")?
            .into();

        let signable = SignableRequest::new(
            "POST",
            url,
            headers.iter().map(|(k, v)| (*k, *v)),
            SignableBody::Bytes(&body_bytes),
        )
        .context("Failed to build signable request")?;

        let (instructions, _signature) = sign(signable, &params)
            .context("SigV4 signing failed")?
            .into_parts();

        let mut request = http::Request::builder()
            .method(http::Method::POST)
            .uri(url)
            .header(http::header::HOST, host.as_str())
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body_bytes)
            .context("Failed to build request")?;

        instructions.apply_to_request_http1x(&mut request);

        reqwest::Request::try_from(request.map(reqwest::Body::from))
            .context("Failed to convert signed request")
    }
}
