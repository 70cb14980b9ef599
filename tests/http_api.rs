mod common;

use common::{spawn_app, spawn_app_with, RecordingNotifier};
use hypereasy::integrations::{EventLog, Notification};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;

async fn post(app: &common::TestApp, path: &str, body: Value) -> reqwest::Response {
    app.client.post(app.url(path)).json(&body).send().await.unwrap()
}

async fn add(app: &common::TestApp, type_id: &str, name: &str) -> String {
    let response = post(app, "/api/builder/components", json!({ "typeId": type_id, "displayName": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test(flavor = "multi_thread")]
async fn health_check_responds() {
    let app = spawn_app().await;
    let response = app.client.get(app.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn component_catalog_filters_by_tier() {
    let app = spawn_app().await;

    let all: Vec<Value> = app.client.get(app.url("/api/components")).send().await.unwrap().json().await.unwrap();
    let core: Vec<Value> = app
        .client
        .get(app.url("/api/components?tier=core"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(all.len(), 25);
    assert_eq!(core.len(), 8);
    assert!(core.iter().all(|t| t["tier"] == "core"));

    // Turning enhanced mode off hides the Hyperliquid tier from the default listing
    let response = app
        .client
        .put(app.url("/api/builder/preferences"))
        .json(&json!({ "enhancedMode": false }))
        .send()
        .await
        .unwrap();
    let preferences: Value = response.json().await.unwrap();
    assert_eq!(preferences["enhancedMode"], false);

    let visible: Vec<Value> = app.client.get(app.url("/api/components")).send().await.unwrap().json().await.unwrap();
    assert_eq!(visible.len(), 8);
}

#[tokio::test(flavor = "multi_thread")]
async fn wiring_over_http() {
    let app = spawn_app().await;
    let feed = add(&app, "market-data", "Feed").await;
    let buy = add(&app, "place-order", "Buy").await;

    let started: Value = post(&app, "/api/builder/wiring/start", json!({ "componentId": feed }))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(started["wiring"]["state"], "pending");
    assert_eq!(started["wiring"]["sourceId"], feed);

    let response = post(&app, "/api/builder/wiring/complete", json!({ "targetId": buy })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let snapshot: Value = app.client.get(app.url("/api/builder")).send().await.unwrap().json().await.unwrap();
    assert_eq!(snapshot["connections"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["connections"][0]["sourceId"], feed);

    let wiring: Value = app.client.get(app.url("/api/builder/wiring")).send().await.unwrap().json().await.unwrap();
    assert_eq!(wiring["wiring"]["state"], "idle");
}

#[tokio::test(flavor = "multi_thread")]
async fn builder_errors_have_statuses() {
    let app = spawn_app().await;
    let feed = add(&app, "market-data", "Feed").await;

    let response = post(&app, "/api/builder/components", json!({ "typeId": "quantum-oracle" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "unknown_component_type");
    assert_eq!(body["error"]["status"], 404);

    let response = post(
        &app,
        "/api/builder/connections",
        json!({ "sourceId": feed, "targetId": feed }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post(&app, "/api/builder/wiring/complete", json!({ "targetId": feed })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "no_pending_connection");
}

#[tokio::test(flavor = "multi_thread")]
async fn unnamed_component_takes_type_name() {
    let app = spawn_app().await;
    let response = post(&app, "/api/builder/components", json!({ "typeId": "vault-manager" })).await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["displayName"], "Vault Manager");
    assert_eq!(body["position"], json!({ "x": 100.0, "y": 100.0 }));
}

#[tokio::test(flavor = "multi_thread")]
async fn template_load_summary_and_simulation() {
    let app = spawn_app().await;

    let response = post(&app, "/api/builder/template", json!({ "templateId": "price-alert-trade" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report: Value = response.json().await.unwrap();
    assert_eq!(report["components"].as_array().unwrap().len(), 2);
    assert_eq!(report["connections"].as_array().unwrap().len(), 1);

    let summary: Value = app
        .client
        .get(app.url("/api/builder/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["triggerCount"], 1);
    assert_eq!(summary["hasCycles"], false);

    let tick: Value = post(&app, "/api/simulator/tick", json!({})).await.json().await.unwrap();
    assert_eq!(tick["appended"], 0);

    let started: Value = post(&app, "/api/simulator/start", json!({})).await.json().await.unwrap();
    assert_eq!(started["changed"], true);
    assert_eq!(started["state"], "running");

    let tick: Value = post(&app, "/api/simulator/tick", json!({})).await.json().await.unwrap();
    assert_eq!(tick["appended"], 2);
    let messages: Vec<&str> = tick["log"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["Price Alert triggered", "Executing Buy ETH"]);

    let stopped: Value = post(&app, "/api/simulator/stop", json!({})).await.json().await.unwrap();
    assert_eq!(stopped["state"], "stopped");
    let again: Value = post(&app, "/api/simulator/stop", json!({})).await.json().await.unwrap();
    assert_eq!(again["changed"], false);

    let response = post(&app, "/api/builder/template", json!({ "templateId": "nope" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn save_open_and_delete_workflow() {
    let app = spawn_app().await;
    let alert = add(&app, "price-alert", "Alert").await;

    let response = post(&app, "/api/workflows", json!({ "name": "My strategy" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved: Value = response.json().await.unwrap();
    let id = saved["id"].as_str().unwrap().to_string();

    let list: Value = app.client.get(app.url("/api/workflows")).send().await.unwrap().json().await.unwrap();
    assert_eq!(list["workflows"][0]["name"], "My strategy");
    assert_eq!(list["workflows"][0]["componentCount"], 1);

    app.client.delete(app.url("/api/builder")).send().await.unwrap();

    let opened: Value = post(&app, &format!("/api/workflows/{}/open", id), json!({}))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(opened["components"][0]["id"], alert);

    let response = app.client.delete(app.url(&format!("/api/workflows/{}", id))).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.client.get(app.url(&format!("/api/workflows/{}", id))).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post(&app, "/api/workflows", json!({ "name": "  " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn placed_order_is_announced() {
    let app = spawn_app().await;

    let response = post(
        &app,
        "/api/place-order",
        json!({ "asset": "ETH", "amount": 250.0, "isBuy": true, "orderType": "market" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["success"], true);
    assert!(result["orderId"].as_str().unwrap().starts_with("order_"));

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], Notification::Trade { order, .. } if order.asset == "ETH"));

    let response = post(
        &app,
        "/api/place-order",
        json!({ "asset": "ETH", "amount": 250.0, "isBuy": true, "orderType": "limit" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.notifier.sent().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_notification_does_not_fail_the_trade() {
    let app = spawn_app_with(RecordingNotifier::failing("webhook down")).await;

    let response = post(
        &app,
        "/api/place-order",
        json!({ "asset": "BTC", "amount": 10.0, "isBuy": false, "orderType": "market" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post(
        &app,
        "/api/discord/alerts",
        json!({ "type": "system_alert", "title": "Hi", "message": "there" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test(flavor = "multi_thread")]
async fn market_data_and_vault() {
    let app = spawn_app().await;

    let response = app.client.get(app.url("/api/market-data/sol")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let data: Value = response.json().await.unwrap();
    assert_eq!(data["asset"], "SOL");

    let response = app.client.get(app.url("/api/market-data/DOGE")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post(&app, "/api/manage-vault", json!({ "action": "deposit", "amount": 500.0 })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post(&app, "/api/manage-vault", json!({ "action": "withdraw", "amount": 0.0 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn api_requests_are_recorded() {
    let app = spawn_app().await;
    app.client.get(app.url("/api/templates")).send().await.unwrap();
    app.client.get(app.url("/healthz")).send().await.unwrap();

    // Recording happens on a spawned task
    let mut recorded = Vec::new();
    for _ in 0..50 {
        recorded = app.state.event_log.recent(10).await.unwrap();
        if !recorded.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].event.endpoint, "/api/templates");
    assert_eq!(recorded[0].event.method, "GET");
    assert_eq!(recorded[0].event.status, 200);
}
