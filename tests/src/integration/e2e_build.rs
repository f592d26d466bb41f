//! # End-to-End Build Flows
//!
//! Drives `BuildService` from wire forms and checks the decoded outputs.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mc_01_config_builder::domain::{
        DeviceAgentConfig, EventLoggingConfig, ImageSpec, LogLevel, LogShippingConfig,
        SharedRuntimeConfig, StateSyncConfig, VpnConfig,
    };
    use mc_01_config_builder::{
        keys, BuildError, BuildErrorKind, BuildService, BuildServiceApi, BuilderConfig,
        ConfigsByKey, EntityGraph, MconfigBuilder,
    };
    use proptest::prelude::*;
    use serde_json::json;
    use shared_types::{EntityGraphWire, EntityId, Network, NetworkWire};

    use crate::integration::fixtures::*;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn service() -> BuildService {
        BuildService::new(BuilderConfig::new(VERSION_TAG))
    }

    fn build(network: &NetworkWire, graph: &EntityGraphWire) -> ConfigsByKey {
        service()
            .build(network, graph, GATEWAY_ID)
            .unwrap_or_else(|e| panic!("build failed: {}", e))
    }

    fn sorted(keys: &[&'static str]) -> Vec<&'static str> {
        let mut keys = keys.to_vec();
        keys.sort_unstable();
        keys
    }

    // =========================================================================
    // DETERMINISM & COMPLETENESS
    // =========================================================================

    #[test]
    fn test_repeated_builds_are_byte_identical() {
        let network = NetworkFixture::new(NETWORK_ID).with_state(90).with_sentry().build();
        let graph = scenario_graph();

        let first = build(&network, &graph);
        for _ in 0..5 {
            assert_eq!(build(&network, &graph), first);
        }
        assert_eq!(
            bincode::serialize(&build(&network, &graph)).unwrap(),
            bincode::serialize(&first).unwrap()
        );
    }

    #[test]
    fn test_separate_service_instances_agree() {
        let a = service().build(&scenario_network(), &scenario_graph(), GATEWAY_ID);
        let b = service().build(&scenario_network(), &scenario_graph(), GATEWAY_ID);
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_configured_gateway_gets_eight_keys() {
        let configs = build(&scenario_network(), &scenario_graph());

        let mut expected: Vec<&str> = keys::GATEWAY_DEPENDENT.to_vec();
        expected.extend(keys::ALWAYS);
        assert_eq!(configs.keys().collect::<Vec<_>>(), sorted(&expected));
    }

    #[test]
    fn test_bare_gateway_gets_four_keys() {
        let graph = GraphFixture::new().gateway(GATEWAY_ID, None).build();
        let configs = build(&scenario_network(), &graph);

        assert_eq!(configs.keys().collect::<Vec<_>>(), sorted(&keys::ALWAYS));
    }

    // =========================================================================
    // UPGRADE TIER RESOLUTION
    // =========================================================================

    #[test]
    fn test_end_to_end_scenario() {
        let configs = build(&scenario_network(), &scenario_graph());

        let agent: DeviceAgentConfig = configs.decode(keys::DEVICE_AGENT).unwrap().unwrap();
        assert_eq!(
            agent,
            DeviceAgentConfig {
                log_level: LogLevel::Info,
                checkin_interval: 30,
                checkin_timeout: 10,
                autoupgrade_enabled: true,
                autoupgrade_poll_interval: 300,
                package_version: "1.2.3".to_string(),
                images: vec![ImageSpec {
                    name: "img1".to_string(),
                    order: 1,
                }],
                dynamic_services: vec![],
                feature_flags: Default::default(),
                orc8r_version: VERSION_TAG.to_string(),
            }
        );
    }

    #[test]
    fn test_no_tier_ancestor_defaults_version() {
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, Some(scenario_gateway_config()))
            .build();
        let configs = build(&scenario_network(), &graph);

        let agent: DeviceAgentConfig = configs.decode(keys::DEVICE_AGENT).unwrap().unwrap();
        assert_eq!(agent.package_version, "0.0.0-0");
        assert!(agent.images.is_empty());
    }

    #[test]
    fn test_nearest_tier_wins_over_grandparent() {
        // T0 -> T1 -> GW1: T1 is the nearest upgrade tier.
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, Some(scenario_gateway_config()))
            .tier("T0", "0.9.0", json!([]))
            .tier(TIER_ID, "1.2.3", json!([{ "name": "img1", "order": 1 }]))
            .edge(EntityId::upgrade_tier("T0"), EntityId::upgrade_tier(TIER_ID))
            .edge(EntityId::upgrade_tier(TIER_ID), EntityId::gateway(GATEWAY_ID))
            .build();
        let configs = build(&scenario_network(), &graph);

        let agent: DeviceAgentConfig = configs.decode(keys::DEVICE_AGENT).unwrap().unwrap();
        assert_eq!(agent.package_version, "1.2.3");
    }

    #[test]
    fn test_tier_reached_through_other_entity_types() {
        // T1 -> group -> GW1
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, Some(scenario_gateway_config()))
            .entity("gateway_group", "G1", None)
            .tier(TIER_ID, "2.0.0", json!([]))
            .edge(EntityId::upgrade_tier(TIER_ID), EntityId::new("gateway_group", "G1"))
            .edge(EntityId::new("gateway_group", "G1"), EntityId::gateway(GATEWAY_ID))
            .build();
        let network = scenario_network();

        // Unregistered entity types without a config body are fine.
        let configs = build(&network, &graph);
        let agent: DeviceAgentConfig = configs.decode(keys::DEVICE_AGENT).unwrap().unwrap();
        assert_eq!(agent.package_version, "2.0.0");
    }

    // =========================================================================
    // NETWORK-LEVEL CONFIGS
    // =========================================================================

    #[test]
    fn test_state_sync_jitter_bound_and_repeatability() {
        let configs = build(&scenario_network(), &scenario_graph());
        let state: StateSyncConfig = configs.decode(keys::STATE).unwrap().unwrap();

        assert!((45..=75).contains(&state.sync_interval));
        let again: StateSyncConfig = build(&scenario_network(), &scenario_graph())
            .decode(keys::STATE)
            .unwrap()
            .unwrap();
        assert_eq!(state, again);
    }

    #[test]
    fn test_different_gateways_spread_out() {
        let mut graph = GraphFixture::new();
        let ids: Vec<String> = (0..32).map(|i| format!("gw-{:03}", i)).collect();
        for id in &ids {
            graph = graph.gateway(id, None);
        }
        let graph = graph.build();
        let network = scenario_network();

        let mut intervals = std::collections::BTreeSet::new();
        for id in &ids {
            let configs = service().build(&network, &graph, id).unwrap();
            let state: StateSyncConfig = configs.decode(keys::STATE).unwrap().unwrap();
            assert!((45..=75).contains(&state.sync_interval));
            intervals.insert(state.sync_interval);
        }
        assert!(intervals.len() > 1, "jitter collapsed to {:?}", intervals);
    }

    #[test]
    fn test_missing_sentry_config_disables_telemetry() {
        let configs = build(&scenario_network(), &scenario_graph());
        let shared: SharedRuntimeConfig = configs.decode(keys::SHARED_RUNTIME).unwrap().unwrap();
        assert!(shared.error_telemetry.is_none());
    }

    #[test]
    fn test_sentry_config_copied_verbatim() {
        let network = NetworkFixture::new(NETWORK_ID).with_sentry().build();
        let configs = build(&network, &scenario_graph());

        let shared: SharedRuntimeConfig = configs.decode(keys::SHARED_RUNTIME).unwrap().unwrap();
        let telemetry = shared.error_telemetry.unwrap();
        assert_eq!(telemetry.sample_rate, 0.5);
        assert!(telemetry.upload_mme_log);
        assert_eq!(telemetry.dsn_native, "https://native.example/1");
        assert_eq!(telemetry.dsn_python, "https://python.example/2");
        assert_eq!(telemetry.exclusion_patterns, vec!["timeout", "^noise"]);
    }

    #[test]
    fn test_valid_dns_config_does_not_affect_outputs() {
        let plain = build(&scenario_network(), &scenario_graph());
        let network = NetworkFixture::new(NETWORK_ID)
            .with_state(60)
            .with_dns(json!({
                "enable_caching": true,
                "local_ttl": 30,
                "records": [{ "domain": "example.com", "a_record": ["10.0.0.1"] }],
            }))
            .build();

        assert_eq!(build(&network, &scenario_graph()), plain);
    }

    #[test]
    fn test_invalid_stored_dns_config_does_not_block_builds() {
        let network = NetworkFixture::new(NETWORK_ID)
            .with_state(60)
            .with_dns(json!({
                "enable_caching": false,
                "local_ttl": 0,
                "records": [{ "domain": "", "a_record": [""], "cname_record": [""] }],
            }))
            .build();

        let configs = build(&network, &scenario_graph());
        assert_eq!(configs.len(), 8);
        assert_eq!(configs, build(&scenario_network(), &scenario_graph()));
    }

    #[test]
    fn test_unparseable_dns_config_fails_decode() {
        let network = NetworkFixture::new(NETWORK_ID)
            .with_dns(json!({ "local_ttl": "soon" }))
            .build();

        let err = service()
            .build(&network, &scenario_graph(), GATEWAY_ID)
            .unwrap_err();
        assert_eq!(err.kind(), BuildErrorKind::Deserialization);
        assert!(err.to_string().contains("dns_config"), "{}", err);
    }

    #[test]
    fn test_empty_network_config_body_is_ignored() {
        let network = NetworkFixture::new(NETWORK_ID)
            .with_state(60)
            .with_raw_config(shared_types::SENTRY_CONFIG_KIND, Vec::new())
            .build();

        let configs = build(&network, &scenario_graph());
        let shared: SharedRuntimeConfig = configs.decode(keys::SHARED_RUNTIME).unwrap().unwrap();
        assert!(shared.error_telemetry.is_none());
    }

    // =========================================================================
    // GATEWAY-DEPENDENT CONFIGS
    // =========================================================================

    #[test]
    fn test_gateway_overrides_flow_through() {
        let graph = GraphFixture::new()
            .gateway(
                GATEWAY_ID,
                Some(json!({
                    "checkin_interval": 60,
                    "checkin_timeout": 20,
                    "logging": {
                        "aggregation": {
                            "target_files_by_tag": { "mme": "/var/log/mme.log" },
                            "throttle_rate": 50,
                        },
                        "event_verbosity": 2,
                    },
                    "vpn": { "enable_shell": true },
                })),
            )
            .build();
        let configs = build(&scenario_network(), &graph);

        let shipping: LogShippingConfig = configs.decode(keys::LOG_SHIPPING).unwrap().unwrap();
        assert_eq!(shipping.throttle_rate, 50);
        assert_eq!(shipping.throttle_window, 5);
        assert_eq!(shipping.throttle_interval, "1m");
        assert_eq!(shipping.files_by_tag["mme"], "/var/log/mme.log");
        assert_eq!(shipping.extra_tags["network_id"], NETWORK_ID);
        assert_eq!(shipping.extra_tags["gateway_id"], GATEWAY_ID);

        let events: EventLoggingConfig = configs.decode(keys::EVENT_LOGGING).unwrap().unwrap();
        assert_eq!(events.event_verbosity, 2);

        let vpn: VpnConfig = configs.decode(keys::VPN).unwrap().unwrap();
        assert!(vpn.enable_shell_access);
    }

    // =========================================================================
    // FATAL ERRORS
    // =========================================================================

    #[test]
    fn test_unknown_gateway_is_not_found() {
        let err = service()
            .build(&scenario_network(), &scenario_graph(), "GW404")
            .unwrap_err();
        assert_eq!(err.kind(), BuildErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "could not find gateway GW404 in graph for network N1"
        );
    }

    #[test]
    fn test_cycle_in_graph_is_rejected() {
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, Some(scenario_gateway_config()))
            .tier(TIER_ID, "1.0.0", json!([]))
            .edge(EntityId::upgrade_tier(TIER_ID), EntityId::gateway(GATEWAY_ID))
            .edge(EntityId::gateway(GATEWAY_ID), EntityId::upgrade_tier(TIER_ID))
            .build();

        let err = service()
            .build(&scenario_network(), &graph, GATEWAY_ID)
            .unwrap_err();
        assert!(matches!(err, BuildError::GraphDecode { .. }));
    }

    #[test]
    fn test_dangling_edge_is_rejected() {
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, None)
            .edge(EntityId::upgrade_tier("ghost"), EntityId::gateway(GATEWAY_ID))
            .build();

        let err = service()
            .build(&scenario_network(), &graph, GATEWAY_ID)
            .unwrap_err();
        assert_eq!(err.kind(), BuildErrorKind::Deserialization);
    }

    #[test]
    fn test_malformed_gateway_config_is_rejected() {
        let graph = GraphFixture::new()
            .gateway(GATEWAY_ID, Some(json!({ "checkin_interval": "soon" })))
            .build();

        let err = service()
            .build(&scenario_network(), &graph, GATEWAY_ID)
            .unwrap_err();
        assert_eq!(err.kind(), BuildErrorKind::Deserialization);
    }

    // =========================================================================
    // PLUGIN BUILDERS
    // =========================================================================

    struct LteBuilder {
        key: &'static str,
    }

    impl MconfigBuilder for LteBuilder {
        fn name(&self) -> &str {
            "lte"
        }

        fn build(
            &self,
            network: &Network,
            _graph: &EntityGraph,
            gateway_id: &str,
        ) -> Result<ConfigsByKey, BuildError> {
            let mut configs = ConfigsByKey::new();
            let payload = format!("{}/{}", network.id, gateway_id).into_bytes();
            configs.insert_unique(self.key, payload)?;
            Ok(configs)
        }
    }

    #[test]
    fn test_plugin_builder_adds_keys() {
        let service = service().register(Arc::new(LteBuilder { key: "cellular" }));
        let configs = service
            .build(&scenario_network(), &scenario_graph(), GATEWAY_ID)
            .unwrap();

        assert_eq!(configs.len(), 9);
        assert_eq!(configs.get("cellular"), Some(b"N1/GW1".as_slice()));
    }

    #[test]
    fn test_plugin_builder_colliding_key_aborts() {
        let service = service().register(Arc::new(LteBuilder { key: keys::VPN }));
        let err = service
            .build(&scenario_network(), &scenario_graph(), GATEWAY_ID)
            .unwrap_err();

        assert_eq!(err.kind(), BuildErrorKind::DuplicateKey);
        assert_eq!(
            err.to_string(),
            "builder received duplicate config for key: vpn"
        );
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_state_interval_within_quarter(gateway_id in "[A-Za-z0-9_-]{1,24}", base in 1u32..100_000) {
            let network = NetworkFixture::new(NETWORK_ID).with_state(base).build();
            let graph = GraphFixture::new().gateway(&gateway_id, None).build();

            let configs = service().build(&network, &graph, &gateway_id).unwrap();
            let state: StateSyncConfig = configs.decode(keys::STATE).unwrap().unwrap();

            let low = (base as f64 * 0.75).ceil() as u32;
            let high = (base as f64 * 1.25).floor() as u32;
            prop_assert!(state.sync_interval >= low && state.sync_interval <= high);
        }
    }
}
