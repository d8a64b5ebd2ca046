//! Request builder & dispatcher
//!
//! The one piece of real branching logic in this tool: given a resolved
//! [`InputRequestSpec`], check the rules for its source type, assemble the
//! variant-specific creation payload, and dispatch it once through the
//! injected [`CreateInput`] capability.
//!
//! Validation always runs to completion before any network call, and every
//! violation is reported - a malformed request that reaches the service
//! fails remotely, expensively and non-atomically, so nothing is submitted
//! until the whole spec checks out.

use super::{
    CreateInputRequest, InputCreationResult, InputRequestSpec, SourceSettings, SourceType,
};
use crate::error::{Error, ValidationError};
use crate::medialive::CreateInput;
use ipnet::IpNet;
use serde_json::{json, Value};
use std::net::IpAddr;

/// Validate a resolved spec against its source type's rules.
///
/// Returns the variant-tagged request on success, or a [`ValidationError`]
/// carrying every missing, malformed and forbidden field found.
pub fn validate(spec: &InputRequestSpec) -> Result<CreateInputRequest, ValidationError> {
    let mut violations = Vec::new();
    let source_type = spec.source_type;

    let name = require(&spec.name, "name", source_type, &mut violations);
    if let Some(name) = &spec.name {
        if !valid_input_name(name) {
            violations.push(format!(
                "name: '{name}' must be alphanumeric with hyphens/underscores"
            ));
        }
    }
    let application_name = require(&spec.application_name, "applicationName", source_type, &mut violations);
    let application_instance = require(
        &spec.application_instance,
        "applicationInstance",
        source_type,
        &mut violations,
    );

    let settings = match source_type {
        SourceType::Aws => {
            forbid(source_type, &mut violations, &[
                ("subnetIds", spec.subnet_ids.is_some()),
                ("securityGroupId", spec.security_group_id.is_some()),
                ("roleArn", spec.role_arn.is_some()),
                ("networkId", spec.network_id.is_some()),
                ("staticIp", spec.static_ip.is_some()),
                ("networkRoutes", spec.network_routes.is_some()),
            ]);

            let allowed_cidr = require(&spec.allowed_cidr, "allowedCidr", source_type, &mut violations);
            if let Some(cidr) = &spec.allowed_cidr {
                check_cidr(cidr, "allowedCidr", &mut violations);
            }

            SourceSettings::Aws { allowed_cidr }
        }
        SourceType::AwsVpc => {
            forbid(source_type, &mut violations, &[
                ("allowedCidr", spec.allowed_cidr.is_some()),
                ("networkId", spec.network_id.is_some()),
                ("staticIp", spec.static_ip.is_some()),
                ("networkRoutes", spec.network_routes.is_some()),
            ]);

            let subnet_ids = match &spec.subnet_ids {
                Some(ids) if ids.len() >= 2 => {
                    if ids.iter().any(|id| id.trim().is_empty()) {
                        violations.push("subnetIds: entries must not be empty".to_string());
                    }
                    ids.clone()
                }
                Some(ids) => {
                    violations.push(format!(
                        "subnetIds: at least 2 subnet IDs are required for source type AWS_VPC (got {})",
                        ids.len()
                    ));
                    ids.clone()
                }
                None => {
                    violations.push("subnetIds: required for source type AWS_VPC".to_string());
                    Vec::new()
                }
            };

            let security_group_id =
                require(&spec.security_group_id, "securityGroupId", source_type, &mut violations);
            let role_arn = require(&spec.role_arn, "roleArn", source_type, &mut violations);
            if let Some(arn) = &spec.role_arn {
                if !arn.starts_with("arn:") {
                    violations.push(format!("roleArn: '{arn}' is not an ARN"));
                }
            }

            SourceSettings::AwsVpc {
                subnet_ids,
                security_group_id,
                role_arn,
            }
        }
        SourceType::OnPremises => {
            forbid(source_type, &mut violations, &[
                ("allowedCidr", spec.allowed_cidr.is_some()),
                ("subnetIds", spec.subnet_ids.is_some()),
                ("securityGroupId", spec.security_group_id.is_some()),
                ("roleArn", spec.role_arn.is_some()),
            ]);

            let network_id = require(&spec.network_id, "networkId", source_type, &mut violations);

            if let Some(ip) = &spec.static_ip {
                if ip.parse::<IpAddr>().is_err() {
                    violations.push(format!("staticIp: '{ip}' is not a valid IP address"));
                }
            }

            let network_routes = spec.network_routes.clone().unwrap_or_default();
            for route in &network_routes {
                check_cidr(&route.cidr, "networkRoutes", &mut violations);
                if let Some(gateway) = &route.gateway {
                    if gateway.parse::<IpAddr>().is_err() {
                        violations.push(format!(
                            "networkRoutes: gateway '{gateway}' is not a valid IP address"
                        ));
                    }
                }
            }

            SourceSettings::OnPremises {
                network_id,
                static_ip: spec.static_ip.clone(),
                network_routes,
            }
        }
    };

    if !violations.is_empty() {
        return Err(ValidationError { violations });
    }

    Ok(CreateInputRequest {
        name,
        application_name,
        application_instance,
        secondary_application_name: spec.secondary_application_name.clone(),
        secondary_application_instance: spec.secondary_application_instance.clone(),
        settings,
        tags: spec.tags.clone(),
    })
}

fn require(
    value: &Option<String>,
    field: &str,
    source_type: SourceType,
    violations: &mut Vec<String>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        Some(_) => {
            violations.push(format!("{field}: must not be empty"));
            String::new()
        }
        None => {
            violations.push(format!("{field}: required for source type {source_type}"));
            String::new()
        }
    }
}

fn forbid(source_type: SourceType, violations: &mut Vec<String>, fields: &[(&str, bool)]) {
    for (field, present) in fields {
        if *present {
            violations.push(format!(
                "{field}: not allowed for source type {source_type}"
            ));
        }
    }
}

fn check_cidr(cidr: &str, field: &str, violations: &mut Vec<String>) {
    if cidr.parse::<IpNet>().is_err() {
        violations.push(format!("{field}: '{cidr}' is not a valid CIDR block"));
    }
}

/// MediaLive input names: alphanumeric plus hyphens and underscores.
pub fn valid_input_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Derive the creation payload for a validated request.
///
/// One fixed shape per source type; shared fields (name, type, the paired
/// primary/backup destinations, tags) are identical across the three.
pub fn build_payload(request: &CreateInputRequest) -> Value {
    let location = match request.settings {
        SourceSettings::OnPremises { .. } => "ON_PREMISES",
        _ => "AWS",
    };

    let mut payload = json!({
        "name": request.name,
        "type": "RTMP_PUSH",
        "inputNetworkLocation": location,
        "destinations": [
            { "streamName": request.primary_stream() },
            { "streamName": request.backup_stream() },
        ],
    });

    match &request.settings {
        SourceSettings::Aws { allowed_cidr } => {
            payload["inputSecurityGroup"] = json!({
                "whitelistRules": [ { "cidr": allowed_cidr } ]
            });
        }
        SourceSettings::AwsVpc {
            subnet_ids,
            security_group_id,
            role_arn,
        } => {
            payload["inputVpcRequest"] = json!({
                "subnetIds": subnet_ids,
                "securityGroupIds": [ security_group_id ],
            });
            payload["roleArn"] = json!(role_arn);
        }
        SourceSettings::OnPremises {
            network_id,
            static_ip,
            network_routes,
        } => {
            let mut source = json!({ "networkId": network_id });
            if let Some(ip) = static_ip {
                source["staticIpAddress"] = json!(ip);
            }
            if !network_routes.is_empty() {
                source["networkRoutes"] = json!(network_routes);
            }
            payload["sources"] = json!([source]);
        }
    }

    if !request.tags.is_empty() {
        payload["tags"] = json!(request.tags);
    }

    payload
}

/// Validate, build and submit the creation request, then extract the
/// result.
///
/// Exactly one call to the creation endpoint per invocation, and none at
/// all when validation fails. Remote failures pass through with their code
/// and message untouched.
pub async fn build_and_submit<A>(
    spec: &InputRequestSpec,
    api: &A,
) -> Result<InputCreationResult, Error>
where
    A: CreateInput + ?Sized,
{
    let request = validate(spec)?;
    let payload = build_payload(&request);

    tracing::info!(
        "Creating {} RTMP push input '{}'",
        request.settings.source_type(),
        request.name
    );

    let response = api.create_input(&payload).await?;
    let result = InputCreationResult::from_response(&response);

    tracing::info!("Created input {} ({})", result.input_id, result.state);
    Ok(result)
}
