//! Configuration Resolution
//!
//! Merges the two parameter sources - explicit command-line fields and an
//! optional JSON configuration document - into one [`InputRequestSpec`].
//! Explicit fields always win; document fields fill the gaps; fields absent
//! from both stay unset. Nothing is defaulted for variant-specific fields
//! here - absence is caught by the request builder's validation, not
//! guessed.

use crate::error::ConfigurationError;
use crate::input::{InputRequestSpec, NetworkRoute, SourceType};
use crate::medialive::auth;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A configuration document, field names matching the spec record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub application_instance: Option<String>,
    #[serde(default)]
    pub secondary_application_name: Option<String>,
    #[serde(default)]
    pub secondary_application_instance: Option<String>,
    /// Kept as a raw string so an unknown variant is reported as a
    /// configuration error with the offending value, not a parse failure.
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub allowed_cidr: Option<String>,
    #[serde(default)]
    pub subnet_ids: Option<Vec<String>>,
    #[serde(default)]
    pub security_group_id: Option<String>,
    #[serde(default)]
    pub role_arn: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub static_ip: Option<String>,
    #[serde(default)]
    pub network_routes: Option<Vec<NetworkRoute>>,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Fields supplied explicitly on the command line (may be partial).
#[derive(Debug, Clone, Default)]
pub struct ExplicitFields {
    pub name: Option<String>,
    pub application_name: Option<String>,
    pub application_instance: Option<String>,
    pub secondary_application_name: Option<String>,
    pub secondary_application_instance: Option<String>,
    pub source_type: Option<SourceType>,
    pub allowed_cidr: Option<String>,
    pub subnet_ids: Option<Vec<String>>,
    pub security_group_id: Option<String>,
    pub role_arn: Option<String>,
    pub network_id: Option<String>,
    pub static_ip: Option<String>,
    pub network_routes: Option<Vec<NetworkRoute>>,
    /// Raw `Key=Value` entries, parsed during resolution.
    pub tags: Vec<String>,
}

/// Load a configuration document from disk.
pub fn load_document(path: &Path) -> Result<ConfigDocument, ConfigurationError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigurationError::new(format!("cannot read config file {}: {e}", path.display()))
    })?;
    parse_document(&content)
        .map_err(|e| ConfigurationError::new(format!("{}: {}", path.display(), e.message)))
}

/// Parse a configuration document from its JSON text.
pub fn parse_document(content: &str) -> Result<ConfigDocument, ConfigurationError> {
    serde_json::from_str(content)
        .map_err(|e| ConfigurationError::new(format!("invalid config document: {e}")))
}

/// Merge explicit fields over a configuration document into the resolved
/// parameter record.
///
/// Fails when no source type is resolvable from either source, or when the
/// document names a variant that is not one of the three known ones.
pub fn resolve(
    explicit: ExplicitFields,
    document: Option<&ConfigDocument>,
) -> Result<InputRequestSpec, ConfigurationError> {
    let doc = document.cloned().unwrap_or_default();

    let source_type = match (explicit.source_type, doc.source_type.as_deref()) {
        (Some(source_type), _) => source_type,
        (None, Some(raw)) => raw
            .parse::<SourceType>()
            .map_err(ConfigurationError::new)?,
        (None, None) => {
            return Err(ConfigurationError::new(
                "sourceType is required (use --source-type or supply it in the config document)",
            ));
        }
    };

    let mut tags = doc.tags.unwrap_or_default();
    for entry in &explicit.tags {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                tags.insert(key.to_string(), value.to_string());
            }
            _ => tracing::warn!("Ignoring malformed tag '{}' (expected KEY=VALUE)", entry),
        }
    }

    Ok(InputRequestSpec {
        name: explicit.name.or(doc.name),
        application_name: explicit.application_name.or(doc.application_name),
        application_instance: explicit.application_instance.or(doc.application_instance),
        secondary_application_name: explicit
            .secondary_application_name
            .or(doc.secondary_application_name),
        secondary_application_instance: explicit
            .secondary_application_instance
            .or(doc.secondary_application_instance),
        source_type,
        allowed_cidr: explicit.allowed_cidr.or(doc.allowed_cidr),
        subnet_ids: explicit.subnet_ids.or(doc.subnet_ids),
        security_group_id: explicit.security_group_id.or(doc.security_group_id),
        role_arn: explicit.role_arn.or(doc.role_arn),
        network_id: explicit.network_id.or(doc.network_id),
        static_ip: explicit.static_ip.or(doc.static_ip),
        network_routes: explicit.network_routes.or(doc.network_routes),
        tags,
    })
}

/// Effective region (flag > document > environment/shared config > fallback).
///
/// The region is ambient collaborator state, not part of the spec record,
/// so it resolves independently of [`resolve`].
pub fn resolve_region(explicit: Option<&str>, document: Option<&ConfigDocument>) -> String {
    explicit
        .map(|r| r.to_string())
        .or_else(|| document.and_then(|d| d.region.clone()))
        .or_else(auth::get_default_region)
        .unwrap_or_else(|| auth::FALLBACK_REGION.to_string())
}
