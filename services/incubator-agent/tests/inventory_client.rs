//! HTTP inventory client against a mock inventory service.

use std::sync::Arc;

use hatchery_events::IncubatorKind;
use hatchery_id::{ItemId, SlotId};
use hatchery_incubator::allocator::AllocationPolicy;
use hatchery_incubator::client::InventoryClient;
use hatchery_incubator::inventory::{IncubatorCommitter, InventorySource};
use hatchery_incubator::reconciler::{Reconciler, ReconcilerConfig};
use hatchery_incubator::sink::MemorySink;
use hatchery_incubator::state::UsageStore;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn inventory_body() -> serde_json::Value {
    json!({
        "player_stats": [{ "km_walked": 40.5, "level": 22 }],
        "incubators": [
            { "id": "inc_free", "kind": "unlimited" },
            {
                "id": "inc_busy",
                "kind": "limited",
                "egg_id": 7,
                "uses_remaining": 2,
                "start_km_walked": 38.0,
                "target_km_walked": 43.0
            }
        ],
        "eggs": [
            { "id": 7, "incubator_id": "inc_busy", "km_target": 5.0, "km_start": 0.0 },
            { "id": 8, "km_target": 2.0 }
        ],
        "pokemon": [
            { "id": 7, "is_egg": true },
            { "id": 8, "is_egg": true }
        ]
    })
}

#[tokio::test]
async fn test_snapshot_parses_inventory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_body()))
        .mount(&server)
        .await;

    let client = InventoryClient::with_base_url(&server.uri()).unwrap();
    let snapshot = client.snapshot().await.unwrap();

    assert_eq!(snapshot.player_stats[0].level, 22);
    assert_eq!(snapshot.incubators[0].kind, IncubatorKind::Unlimited);
    assert!(snapshot.incubators[0].is_idle());
    assert_eq!(snapshot.incubators[1].egg_id, Some(ItemId::new(7)));
    assert!(snapshot.eggs[1].is_unused());
    assert_eq!(snapshot.pokemon.len(), 2);
}

#[tokio::test]
async fn test_refresh_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/inventory/refresh"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .mount(&server)
        .await;

    let client = InventoryClient::with_base_url(&server.uri()).unwrap();
    let err = client.refresh().await.unwrap_err();

    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("busy"));
}

#[tokio::test]
async fn test_use_incubator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/incubators/inc_free/use"))
        .and(body_json(json!({ "egg_id": 8 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "target_km_walked": 42.5 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = InventoryClient::with_base_url(&server.uri()).unwrap();
    let response = client
        .use_incubator(&SlotId::parse("inc_free").unwrap(), ItemId::new(8))
        .await
        .unwrap();

    assert_eq!(response.target_km_walked, 42.5);
}

#[tokio::test]
async fn test_pass_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/inventory/refresh"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/inventory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(inventory_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/incubators/inc_free/use"))
        .and(body_json(json!({ "egg_id": 8 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "target_km_walked": 42.5 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let client = Arc::new(InventoryClient::with_base_url(&server.uri()).unwrap());
    let reconciler = Reconciler::new(
        client.clone(),
        client,
        Arc::new(MemorySink::new()),
        UsageStore::in_profile(dir.path()),
        AllocationPolicy::default(),
        ReconcilerConfig::default(),
    );

    let (_tx, rx) = watch::channel(false);
    let outcome = reconciler.reconcile(&rx).await.unwrap();
    let report = outcome.report().unwrap();

    assert_eq!(report.added_count(), 1);
    let added = report.statuses.iter().find(|s| s.was_added_now).unwrap();
    assert_eq!(added.item_id, ItemId::new(8));
    assert_eq!(added.km_to_walk, 2.0);
    assert_eq!(added.km_remaining, 2.0);
    assert_eq!(reconciler.store().load().unwrap().len(), 2);
}
