//! Wire types for the node endpoints consumed by the scan

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// `/health` response
///
/// `ok`, `version` and `uptime_s` are required; anything else the node
/// reports is kept in `extra` and passed through to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    pub uptime_s: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthResponse {
    pub fn db_rw(&self) -> Option<Value> {
        self.extra.get("db_rw").cloned()
    }

    pub fn tip_age_slots(&self) -> Option<Value> {
        self.extra.get("tip_age_slots").cloned()
    }
}

/// `/epoch` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochResponse {
    pub epoch: u64,
    pub slot: u64,
    pub blocks_per_epoch: u64,
    pub enrolled_miners: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_pot: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One element of the `/api/miners` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerEntry {
    pub miner: String,
    /// Unix seconds; null or zero means the node has never seen an attestation
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_attest: Option<i64>,
    pub device_family: String,
    pub antiquity_multiplier: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_arch: Option<String>,
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(value
        .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)))
        .filter(|ts| *ts > 0))
}

/// `/api/nodes` response from the seed node
///
/// Seed nodes in the wild answer with a bare list or with a `{"nodes": [...]}`
/// wrapper; rows are either plain URLs or registry objects.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NodeRegistryPayload {
    Wrapped { nodes: Vec<RegistryRow> },
    List(Vec<RegistryRow>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RegistryRow {
    Url(String),
    Entry(RegistryEntry),
    Unrecognized(Value),
}

/// A node host as listed by the seed registry
///
/// Registries backed by SQLite report flags as `1`/`0` and sometimes ids as
/// numbers, so every field is decoded leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pub node_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scalar_string")]
    pub wallet: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_active: Option<bool>,
}

fn deserialize_scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => Ok(Some(n.as_f64().is_some_and(|f| f != 0.0))),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" | "" => Ok(Some(false)),
            other => Err(D::Error::custom(format!("invalid flag '{other}'"))),
        },
        Some(other) => Err(D::Error::custom(format!("invalid flag {other}"))),
    }
}

impl NodeRegistryPayload {
    /// Flatten the payload into registry entries, skipping rows of unknown shape
    pub fn into_entries(self) -> Vec<RegistryEntry> {
        let rows = match self {
            Self::Wrapped { nodes } => nodes,
            Self::List(rows) => rows,
        };

        rows.into_iter()
            .filter_map(|row| match row {
                RegistryRow::Url(url) => Some(RegistryEntry {
                    url: Some(url),
                    ..Default::default()
                }),
                RegistryRow::Entry(entry) => Some(entry),
                RegistryRow::Unrecognized(value) => {
                    warn!("Skipping unrecognized registry row: {}", value);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_health_keeps_optional_fields() {
        let health: HealthResponse = serde_json::from_value(json!({
            "ok": true,
            "version": "2.2.1-rip200",
            "uptime_s": 3600,
            "db_rw": true,
            "tip_age_slots": 2,
        }))
        .unwrap();

        assert!(health.ok);
        assert_eq!(health.uptime_s, 3600.0);
        assert_eq!(health.db_rw(), Some(json!(true)));
        assert_eq!(health.tip_age_slots(), Some(json!(2)));
    }

    #[test]
    fn test_health_requires_version() {
        let result = serde_json::from_value::<HealthResponse>(json!({
            "ok": true,
            "uptime_s": 10,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_miner_entry_timestamp_forms() {
        let float_ts: MinerEntry = serde_json::from_value(json!({
            "miner": "g4-powerbook",
            "last_attest": 1_700_000_000.75,
            "device_family": "PowerPC",
            "antiquity_multiplier": 2.5,
        }))
        .unwrap();
        assert_eq!(float_ts.last_attest, Some(1_700_000_000));

        let null_ts: MinerEntry = serde_json::from_value(json!({
            "miner": "g4-powerbook",
            "last_attest": null,
            "device_family": "PowerPC",
            "antiquity_multiplier": 2.5,
        }))
        .unwrap();
        assert_eq!(null_ts.last_attest, None);

        let zero_ts: MinerEntry = serde_json::from_value(json!({
            "miner": "g4-powerbook",
            "last_attest": 0,
            "device_family": "PowerPC",
            "antiquity_multiplier": 2.5,
        }))
        .unwrap();
        assert_eq!(zero_ts.last_attest, None);
    }

    #[test]
    fn test_miner_entry_requires_last_attest_key() {
        let result = serde_json::from_value::<MinerEntry>(json!({
            "miner": "g4-powerbook",
            "device_family": "PowerPC",
            "antiquity_multiplier": 2.5,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_registry_payload_shapes() {
        let plain: NodeRegistryPayload =
            serde_json::from_value(json!(["https://a.example", "b.example:8099"])).unwrap();
        let entries = plain.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].url.as_deref(), Some("b.example:8099"));

        let wrapped: NodeRegistryPayload = serde_json::from_value(json!({
            "nodes": [
                {"url": "https://a.example", "node_id": "node-a", "is_active": true},
                {"node_id": "node-hidden", "name": "Hidden"},
                42
            ]
        }))
        .unwrap();
        let entries = wrapped.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].node_id.as_deref(), Some("node-a"));
        assert_eq!(entries[1].url, None);
    }

    #[test]
    fn test_registry_rows_with_integer_flags() {
        let payload: NodeRegistryPayload = serde_json::from_value(json!([
            {"url": "https://a.example", "node_id": 7, "is_active": 1},
            {"url": "https://b.example", "is_active": 0},
            {"url": "https://c.example", "is_active": "false"},
            {"url": "https://d.example", "is_active": null},
            {"url": ["not", "a", "url"]}
        ]))
        .unwrap();
        let entries = payload.into_entries();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].url.as_deref(), Some("https://a.example"));
        assert_eq!(entries[0].node_id.as_deref(), Some("7"));
        assert_eq!(entries[0].is_active, Some(true));
        assert_eq!(entries[1].is_active, Some(false));
        assert_eq!(entries[2].is_active, Some(false));
        assert_eq!(entries[3].is_active, None);
    }
}
