//! ---
//! omb_section: "15-testing-qa-runbook"
//! omb_subsection: "integration-tests"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Integration tests for end-to-end tile configuration."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
use serde_json::Value;

use omb_common::{Config, EnvConfig};
use omb_tiles::{configure_all, registry, ConfiguredProduct, RecordingOpsManager, TileError};

fn config() -> Config {
    Config {
        jumpbox_ip: "203.0.113.10".into(),
        project_id: "acme-prod".into(),
        dns_suffix: "prod.example.com".into(),
        management_subnet_name: "mgmt".into(),
        services_subnet_name: "services".into(),
        availability_zones: vec!["zone-a".into(), "zone-b".into(), "zone-c".into()],
        nozzle_service_account_key: "sa-key-json".into(),
    }
}

fn submission<'a>(submissions: &'a [ConfiguredProduct], product: &str) -> &'a ConfiguredProduct {
    submissions
        .iter()
        .find(|s| s.product == product)
        .unwrap_or_else(|| panic!("no submission for {product}"))
}

fn parse(document: &str) -> Value {
    serde_json::from_str(document).expect("document is valid JSON")
}

#[tokio::test]
async fn full_footprint_run_submits_three_well_formed_configurations() {
    let om = RecordingOpsManager::new();
    let env = EnvConfig::default();

    configure_all(&env, &config(), &om, &registry())
        .await
        .expect("every tile configures");

    let staged: Vec<(String, String)> = om
        .staged()
        .into_iter()
        .map(|tile| (tile.name, tile.version))
        .collect();
    assert_eq!(
        staged,
        vec![
            ("director".to_owned(), "bundled".to_owned()),
            ("platform-runtime".to_owned(), "4.1.0".to_owned()),
            ("telemetry-nozzle".to_owned(), "2.0.3".to_owned()),
        ]
    );

    let submissions = om.configured();
    assert_eq!(submissions.len(), 3);

    // The director alone lands in the management subnet; everything else
    // deploys into the services subnet.
    let director_network = parse(&submission(&submissions, "director").network);
    assert_eq!(director_network["network"]["name"], "mgmt");
    let runtime_network = parse(&submission(&submissions, "platform-runtime").network);
    assert_eq!(runtime_network["network"]["name"], "services");
    let nozzle_network = parse(&submission(&submissions, "telemetry-nozzle").network);
    assert_eq!(nozzle_network["network"]["name"], "services");

    assert_eq!(
        director_network["singleton_availability_zone"]["name"],
        "zone-a"
    );
    assert_eq!(
        director_network["other_availability_zones"]
            .as_array()
            .expect("zone list")
            .len(),
        3
    );

    let runtime_properties = parse(&submission(&submissions, "platform-runtime").properties);
    assert_eq!(
        runtime_properties[".properties.system_domain"]["value"],
        "sys.prod.example.com"
    );
    assert_eq!(
        runtime_properties[".properties.apps_domain"]["value"],
        "apps.prod.example.com"
    );

    let nozzle_properties = parse(&submission(&submissions, "telemetry-nozzle").properties);
    assert_eq!(
        nozzle_properties[".properties.firehose_endpoint"]["value"],
        "https://api.sys.prod.example.com"
    );
    assert_eq!(
        nozzle_properties[".properties.project_id"]["value"],
        "acme-prod"
    );
    assert_eq!(
        nozzle_properties[".properties.service_account"]["value"],
        "sa-key-json"
    );

    // Full footprint leaves the instance class to each tile's default.
    let runtime_resources = parse(&submission(&submissions, "platform-runtime").resources);
    assert_eq!(runtime_resources["router"]["instance_type"], "");
    assert_eq!(runtime_resources["router"]["internet_connected"], true);
}

#[tokio::test]
async fn small_footprint_run_reduces_jobs_and_swaps_the_runtime_product() {
    let om = RecordingOpsManager::new();
    let env = EnvConfig {
        small_footprint: true,
    };

    configure_all(&env, &config(), &om, &registry())
        .await
        .expect("every tile configures");

    let staged: Vec<String> = om.staged().into_iter().map(|tile| tile.name).collect();
    assert_eq!(
        staged,
        vec!["director", "platform-runtime-small", "telemetry-nozzle"]
    );

    let submissions = om.configured();
    let director_resources = parse(&submission(&submissions, "director").resources);
    assert_eq!(director_resources["director"]["instance_type"], "micro");
    let runtime_resources = parse(&submission(&submissions, "platform-runtime-small").resources);
    assert_eq!(runtime_resources["router"]["instance_type"], "micro");
    let nozzle_resources = parse(&submission(&submissions, "telemetry-nozzle").resources);
    assert_eq!(
        nozzle_resources["telemetry-nozzle"]["instance_type"],
        "micro"
    );
    assert_eq!(
        nozzle_resources["telemetry-nozzle"]["internet_connected"],
        false
    );
}

#[tokio::test]
async fn mid_pipeline_rejection_leaves_later_tiles_untouched() {
    let om = RecordingOpsManager::new();
    om.reject_configuration("platform-runtime");
    let env = EnvConfig::default();

    let err = configure_all(&env, &config(), &om, &registry())
        .await
        .expect_err("runtime submission fails");
    assert!(
        matches!(err, TileError::Submission { ref product, .. } if product == "platform-runtime")
    );
    assert!(err.to_string().contains("platform-runtime"));

    let staged: Vec<String> = om.staged().into_iter().map(|tile| tile.name).collect();
    assert_eq!(
        staged,
        vec!["director", "platform-runtime"],
        "the nozzle is never staged after the runtime fails"
    );
    let submissions = om.configured();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].product, "director");
}
