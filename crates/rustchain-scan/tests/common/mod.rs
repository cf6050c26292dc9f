//! Mock RustChain nodes for pipeline tests

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use rustchain_scan::config::ScanConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Reference time shared by every pipeline test
pub const NOW: i64 = 1_700_000_000;

pub fn now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(NOW, 0).unwrap()
}

/// Scan configuration pointed at a mock seed, with a short timeout
pub fn config_for(seed: &MockNode) -> ScanConfig {
    let mut config = ScanConfig {
        seed_node: seed.url(),
        ..Default::default()
    };
    config.http.timeout_secs = 1;
    config
}

/// One `/api/miners` row
pub fn miner(id: &str, last_attest: Option<i64>) -> Value {
    json!({
        "miner": id,
        "last_attest": last_attest,
        "device_family": "PowerPC",
        "device_arch": "G4",
        "antiquity_multiplier": 2.5,
    })
}

pub struct MockNode {
    pub server: MockServer,
}

impl MockNode {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// A node answering health, epoch and miners
    pub async fn healthy(version: &str, miners: Value) -> Self {
        let node = Self::start().await;
        node.health(version).await;
        node.epoch().await;
        node.miners(miners).await;
        node
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    async fn respond(&self, route: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    pub async fn health(&self, version: &str) {
        self.health_body(json!({
            "ok": true,
            "version": version,
            "uptime_s": 86400,
            "db_rw": true,
            "tip_age_slots": 1,
        }))
        .await;
    }

    pub async fn health_body(&self, body: Value) {
        self.respond("/health", ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Healthy `/health` body, sent only after `delay`
    pub async fn slow_health(&self, version: &str, delay: Duration) {
        self.respond(
            "/health",
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true, "version": version, "uptime_s": 1}))
                .set_delay(delay),
        )
        .await;
    }

    pub async fn epoch(&self) {
        self.respond(
            "/epoch",
            ResponseTemplate::new(200).set_body_json(json!({
                "epoch": 61,
                "slot": 8842,
                "blocks_per_epoch": 144,
                "enrolled_miners": 12,
                "epoch_pot": 1.5,
            })),
        )
        .await;
    }

    pub async fn miners(&self, rows: Value) {
        self.respond("/api/miners", ResponseTemplate::new(200).set_body_json(rows))
            .await;
    }

    pub async fn registry(&self, body: Value) {
        self.respond("/api/nodes", ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Answer every route only after `delay`
    pub async fn stall(&self, delay: Duration) {
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "version": "2.2.1", "uptime_s": 1}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }
}
