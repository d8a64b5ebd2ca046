//! Property-based tests using proptest
//!
//! Randomized coverage for the pure pieces of the pipeline: input-name and
//! CIDR shape checks, the variant validation rules, and the
//! explicit-over-document merge precedence.

use mlinput::config::{self, ExplicitFields};
use mlinput::input::builder::{valid_input_name, validate};
use mlinput::input::{InputRequestSpec, SourceType};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn spec(source_type: SourceType) -> InputRequestSpec {
    InputRequestSpec {
        name: Some("prop-input".to_string()),
        application_name: Some("live".to_string()),
        application_instance: Some("stream1".to_string()),
        secondary_application_name: None,
        secondary_application_instance: None,
        source_type,
        allowed_cidr: None,
        subnet_ids: None,
        security_group_id: None,
        role_arn: None,
        network_id: None,
        static_ip: None,
        network_routes: None,
        tags: BTreeMap::new(),
    }
}

proptest! {
    /// Any name drawn from the allowed alphabet is accepted.
    #[test]
    fn valid_names_accepted(name in "[A-Za-z0-9_-]{1,64}") {
        prop_assert!(valid_input_name(&name));
    }

    /// A single character outside the alphabet poisons the whole name.
    #[test]
    fn invalid_character_rejected(
        prefix in "[A-Za-z0-9_-]{0,10}",
        bad in "[^A-Za-z0-9_-]",
        suffix in "[A-Za-z0-9_-]{0,10}",
    ) {
        let name = format!("{prefix}{bad}{suffix}");
        prop_assert!(!valid_input_name(&name));
    }

    /// Every syntactically well-formed IPv4 CIDR passes the AWS variant's
    /// shape check.
    #[test]
    fn well_formed_cidr_accepted(a: u8, b: u8, c: u8, d: u8, prefix in 0u8..=32) {
        let mut s = spec(SourceType::Aws);
        s.allowed_cidr = Some(format!("{a}.{b}.{c}.{d}/{prefix}"));
        prop_assert!(validate(&s).is_ok());
    }

    /// Out-of-range prefixes are reported against allowedCidr.
    #[test]
    fn oversized_prefix_rejected(a: u8, b: u8, c: u8, d: u8, prefix in 33u8..=120) {
        let mut s = spec(SourceType::Aws);
        s.allowed_cidr = Some(format!("{a}.{b}.{c}.{d}/{prefix}"));
        let err = validate(&s).unwrap_err();
        prop_assert!(err.violations.iter().any(|v| v.contains("allowedCidr")));
    }

    /// Fewer than two subnets always fails, however the list is shaped.
    #[test]
    fn short_subnet_lists_rejected(ids in prop::collection::vec("subnet-[0-9a-f]{8}", 0..2)) {
        let mut s = spec(SourceType::AwsVpc);
        s.subnet_ids = Some(ids);
        s.security_group_id = Some("sg-12345678".to_string());
        s.role_arn = Some("arn:aws:iam::123456789012:role/MediaLiveAccessRole".to_string());
        let err = validate(&s).unwrap_err();
        prop_assert!(err.violations.iter().any(|v| v.contains("subnetIds")));
    }

    /// Two or more subnets validate for the VPC variant.
    #[test]
    fn sufficient_subnet_lists_accepted(ids in prop::collection::vec("subnet-[0-9a-f]{8}", 2..6)) {
        let mut s = spec(SourceType::AwsVpc);
        s.subnet_ids = Some(ids);
        s.security_group_id = Some("sg-12345678".to_string());
        s.role_arn = Some("arn:aws:iam::123456789012:role/MediaLiveAccessRole".to_string());
        prop_assert!(validate(&s).is_ok());
    }

    /// Explicit fields always beat document fields for the same key, and a
    /// field present only in the document is used.
    #[test]
    fn merge_precedence_holds(cli_name in "[a-z]{1,12}", doc_name in "[a-z]{1,12}", doc_network in "[0-9]{1,9}") {
        let doc = config::parse_document(&format!(
            r#"{{"sourceType": "ON_PREMISES", "name": "{doc_name}", "networkId": "{doc_network}"}}"#
        )).unwrap();

        let explicit = ExplicitFields {
            name: Some(cli_name.clone()),
            ..Default::default()
        };

        let resolved = config::resolve(explicit, Some(&doc)).unwrap();
        prop_assert_eq!(resolved.name.as_deref(), Some(cli_name.as_str()));
        prop_assert_eq!(resolved.network_id.as_deref(), Some(doc_network.as_str()));
        prop_assert_eq!(resolved.source_type, SourceType::OnPremises);
    }
}
