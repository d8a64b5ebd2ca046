//! AWS Authentication
//!
//! Credential resolution goes through the standard provider chain
//! (environment variables, shared credentials file, instance/IRSA
//! profiles). Region resolution additionally reads the shared config file
//! directly so the tool picks up `aws configure` defaults even before a
//! client exists.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use std::path::PathBuf;

/// Region used when nothing else resolves one. Matches the region the
/// original provisioning runbook targets.
pub const FALLBACK_REGION: &str = "us-east-2";

/// Resolve AWS credentials from the default provider chain.
///
/// Order: environment variables (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY),
/// the shared credentials file (~/.aws/credentials), then instance or
/// container profiles.
pub async fn resolve_credentials() -> Result<Credentials> {
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let provider = config
        .credentials_provider()
        .context("No AWS credentials provider available. Run 'aws configure' or set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY")?;

    provider
        .provide_credentials()
        .await
        .context("Failed to resolve AWS credentials")
}

/// Get the AWS shared config file path
pub fn shared_config_path() -> Option<PathBuf> {
    // Check AWS_CONFIG_FILE environment variable first
    if let Ok(path) = std::env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|p| p.join(".aws").join("config"))
}

/// Validate an AWS region name format
/// Regions are short lowercase tokens like us-east-2 or ap-southeast-1
fn validate_region(region: &str) -> bool {
    if region.is_empty() || region.len() > 32 {
        return false;
    }
    if region.starts_with('-') || region.ends_with('-') {
        return false;
    }
    region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Read the default region from the environment or the shared config file.
/// Validates the region format before returning.
pub fn get_default_region() -> Option<String> {
    // Check environment variables first
    for var in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Ok(region) = std::env::var(var) {
            if validate_region(&region) {
                return Some(region);
            }
            tracing::warn!("Invalid region format in {}", var);
        }
    }

    // Try the shared config file for the active profile
    let profile = std::env::var("AWS_PROFILE").unwrap_or_else(|_| "default".to_string());

    // Profile names land in section headers; reject anything that could
    // not have been written by `aws configure`.
    if !profile
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        tracing::warn!("Invalid characters in AWS_PROFILE");
        return None;
    }

    let config_path = shared_config_path()?;
    let content = std::fs::read_to_string(&config_path).ok()?;

    let wanted = if profile == "default" {
        "[default]".to_string()
    } else {
        format!("[profile {profile}]")
    };

    let mut in_section = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') {
            in_section = line == wanted;
        } else if in_section && line.starts_with("region") && line.contains('=') {
            if let Some(value) = line.split('=').nth(1) {
                let region = value.trim().to_string();
                if validate_region(&region) {
                    return Some(region);
                }
            }
        }
    }

    None
}
