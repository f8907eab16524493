//! Job submission payloads and per-platform API keys.
//!
//! Job records returned by the API are provider-specific JSON and are kept as
//! [`serde_json::Value`]; [`JobSummary`] pulls out the fields worth listing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default shot count for submitted jobs.
pub const DEFAULT_SHOTS: u32 = 100;

/// Provider key the job service routes IonQ submissions by.
pub const IONQ_PROVIDER: &str = "native.ionq";

/// Credentials forwarded to the job service, keyed by platform then key name.
///
/// `Debug` shows platforms and key names but never the secrets.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeys(BTreeMap<String, BTreeMap<String, String>>);

impl ApiKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one secret.
    pub fn insert(
        &mut self,
        platform: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> &mut Self {
        self.0
            .entry(platform.into())
            .or_default()
            .insert(key.into(), secret.into());
        self
    }

    pub fn get(&self, platform: &str, key: &str) -> Option<&str> {
        self.0.get(platform)?.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    pub fn platforms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (platform, keys) in &self.0 {
            let redacted: BTreeMap<&str, &str> =
                keys.keys().map(|k| (k.as_str(), "[REDACTED]")).collect();
            map.entry(platform, &redacted);
        }
        map.finish()
    }
}

/// A circuit to submit through the job service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Routing key such as `"native.ionq"`.
    pub provider: String,
    /// Target system on the provider side (e.g. `"simulator"`, `"qpu.aria-1"`).
    pub target: String,
    pub shots: u32,
    pub qubits: u32,
    /// Circuit in the provider's native JSON gate format.
    pub circuit: Value,
}

impl JobRequest {
    pub fn new(provider: impl Into<String>, target: impl Into<String>, qubits: u32, circuit: Value) -> Self {
        Self {
            name: None,
            provider: provider.into(),
            target: target.into(),
            shots: DEFAULT_SHOTS,
            qubits,
            circuit,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }
}

/// The listable parts of a provider job record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSummary {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub target: Option<String>,
}

impl JobSummary {
    /// Extract a summary; `None` when the record has no id.
    pub fn from_value(job: &Value) -> Option<Self> {
        let text = |key: &str| job.get(key).and_then(Value::as_str).map(String::from);
        Some(Self {
            id: text("id")?,
            name: text("name"),
            status: text("status"),
            target: text("target"),
        })
    }
}

#[derive(Serialize)]
pub(crate) struct KeysBody<'a> {
    pub api_keys: &'a ApiKeys,
}

#[derive(Serialize)]
pub(crate) struct CreateJobBody<'a> {
    pub job: &'a JobRequest,
    pub api_keys: &'a ApiKeys,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_keys_debug_is_redacted() {
        let mut keys = ApiKeys::new();
        keys.insert("ionq", "TOKEN", "super-secret");
        let debug = format!("{keys:?}");
        assert!(debug.contains("ionq"));
        assert!(debug.contains("TOKEN"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_api_keys_serialize_transparently() {
        let mut keys = ApiKeys::new();
        keys.insert("ionq", "TOKEN", "abc");
        let json = serde_json::to_value(&keys).unwrap();
        assert_eq!(json, serde_json::json!({"ionq": {"TOKEN": "abc"}}));
        assert_eq!(keys.get("ionq", "TOKEN"), Some("abc"));
        assert!(!keys.is_empty());
        assert!(ApiKeys::new().is_empty());
    }

    #[test]
    fn test_create_body_shape() {
        let job = JobRequest::new(IONQ_PROVIDER, "simulator", 2, serde_json::json!([]))
            .with_name("bell")
            .with_shots(500);
        let keys = ApiKeys::new();
        let body = serde_json::to_value(CreateJobBody {
            job: &job,
            api_keys: &keys,
        })
        .unwrap();
        assert_eq!(body["job"]["provider"], "native.ionq");
        assert_eq!(body["job"]["shots"], 500);
        assert_eq!(body["job"]["name"], "bell");
        assert_eq!(body["api_keys"], serde_json::json!({}));
    }

    #[test]
    fn test_job_summary() {
        let job = serde_json::json!({
            "id": "0b8c6a2e-4b9c-4a44-9d0c-5b1c0a9f6f11",
            "status": "completed",
            "target": "simulator",
            "qubits": 2
        });
        let summary = JobSummary::from_value(&job).unwrap();
        assert_eq!(summary.status.as_deref(), Some("completed"));
        assert_eq!(summary.name, None);
        assert!(JobSummary::from_value(&serde_json::json!({"status": "x"})).is_none());
    }
}
