//! MediaLive input data model
//!
//! Types flowing through a single provisioning run, in order:
//!
//! - [`InputRequestSpec`] - the resolved, pre-validation parameter record
//!   produced by the configuration resolver (everything optional except the
//!   source type).
//! - [`SourceSettings`] - the validated, variant-tagged parameters. Each
//!   variant carries only its own fields, so an illegal field combination
//!   cannot be represented after validation.
//! - [`CreateInputRequest`] - the immutable record the payload is derived
//!   from.
//! - [`InputCreationResult`] - what the remote service reported back:
//!   input id, state and the assigned push destinations.

pub mod builder;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Network topology variant for an RTMP push input.
///
/// Immutable once chosen; decides which fields are required and which
/// payload shape is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Aws,
    AwsVpc,
    OnPremises,
}

impl SourceType {
    /// Wire name as the MediaLive API spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Aws => "AWS",
            SourceType::AwsVpc => "AWS_VPC",
            SourceType::OnPremises => "ON_PREMISES",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AWS" => Ok(SourceType::Aws),
            "AWS_VPC" => Ok(SourceType::AwsVpc),
            "ON_PREMISES" => Ok(SourceType::OnPremises),
            other => Err(format!(
                "unknown source type '{other}' (expected AWS, AWS_VPC or ON_PREMISES)"
            )),
        }
    }
}

/// A route for an ON_PREMISES destination network, `CIDR[:GATEWAY]` on the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRoute {
    pub cidr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,
}

impl FromStr for NetworkRoute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err("empty network route".to_string());
        }
        // First colon splits CIDR from gateway, matching the CLI convention
        // documented in the help text.
        match s.split_once(':') {
            Some((cidr, gateway)) => Ok(Self {
                cidr: cidr.to_string(),
                gateway: Some(gateway.to_string()),
            }),
            None => Ok(Self {
                cidr: s.to_string(),
                gateway: None,
            }),
        }
    }
}

/// The resolved, pre-validation parameter record.
///
/// Produced by the configuration resolver after merging explicit fields
/// over the configuration document. Absence is preserved here (no defaults
/// are synthesized for variant fields); the request builder's validation is
/// what turns absence into an error.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRequestSpec {
    pub name: Option<String>,
    pub application_name: Option<String>,
    pub application_instance: Option<String>,
    /// Backup stream path; falls back to the primary application when unset.
    pub secondary_application_name: Option<String>,
    pub secondary_application_instance: Option<String>,
    pub source_type: SourceType,
    // AWS
    pub allowed_cidr: Option<String>,
    // AWS_VPC
    pub subnet_ids: Option<Vec<String>>,
    pub security_group_id: Option<String>,
    pub role_arn: Option<String>,
    // ON_PREMISES
    pub network_id: Option<String>,
    pub static_ip: Option<String>,
    pub network_routes: Option<Vec<NetworkRoute>>,
    pub tags: BTreeMap<String, String>,
}

/// Variant-specific parameters after validation. Exactly one variant's
/// field set, nothing else.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSettings {
    Aws {
        allowed_cidr: String,
    },
    AwsVpc {
        subnet_ids: Vec<String>,
        security_group_id: String,
        role_arn: String,
    },
    OnPremises {
        network_id: String,
        static_ip: Option<String>,
        network_routes: Vec<NetworkRoute>,
    },
}

impl SourceSettings {
    pub fn source_type(&self) -> SourceType {
        match self {
            SourceSettings::Aws { .. } => SourceType::Aws,
            SourceSettings::AwsVpc { .. } => SourceType::AwsVpc,
            SourceSettings::OnPremises { .. } => SourceType::OnPremises,
        }
    }
}

/// A validated creation request. Derived from [`InputRequestSpec`] without
/// mutating it; the payload is in turn derived from this.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateInputRequest {
    pub name: String,
    pub application_name: String,
    pub application_instance: String,
    pub secondary_application_name: Option<String>,
    pub secondary_application_instance: Option<String>,
    pub settings: SourceSettings,
    pub tags: BTreeMap<String, String>,
}

impl CreateInputRequest {
    /// Primary push stream path, `application/instance`.
    pub fn primary_stream(&self) -> String {
        format!("{}/{}", self.application_name, self.application_instance)
    }

    /// Backup push stream path; the secondary application falls back to the
    /// primary, field by field.
    pub fn backup_stream(&self) -> String {
        format!(
            "{}/{}",
            self.secondary_application_name
                .as_deref()
                .unwrap_or(&self.application_name),
            self.secondary_application_instance
                .as_deref()
                .unwrap_or(&self.application_instance)
        )
    }
}

/// One push endpoint assigned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
}

impl From<&Value> for Destination {
    fn from(value: &Value) -> Self {
        Self {
            url: value
                .get("url")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            ip: value
                .get("ip")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            port: value
                .get("port")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        }
    }
}

/// What the remote service reported for the created input.
///
/// Constructed only from a successful creation response, copied verbatim -
/// no endpoint is synthesized locally. Destinations arrive in service
/// order: for push inputs the first is the primary slot and the second the
/// backup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCreationResult {
    pub input_id: String,
    pub state: String,
    pub destinations: Vec<Destination>,
}

impl InputCreationResult {
    /// Extract the result record from a creation response.
    ///
    /// The service nests the record under an `"input"` key; older tooling
    /// and the test fixtures use the flat shape. Both are accepted, and
    /// both `inputId` and `id` spellings of the identifier are read.
    pub fn from_response(response: &Value) -> Self {
        let record = response.get("input").unwrap_or(response);

        let input_id = record
            .get("inputId")
            .or_else(|| record.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or("-")
            .to_string();

        let state = record
            .get("state")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let destinations = record
            .get("destinations")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().map(Destination::from).collect())
            .unwrap_or_default();

        Self {
            input_id,
            state,
            destinations,
        }
    }
}
