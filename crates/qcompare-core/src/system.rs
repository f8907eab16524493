//! System (backend) inventory records.
//!
//! Common fields live on [`System`]. Fields that only one provider family
//! reports are grouped into per-family structs flattened into the record, and
//! keys nobody models are preserved in [`System::other`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::price::Price;
use crate::queue::QueueDescriptor;
use crate::status::{StatusCategory, classify};

/// Reference from a system to the provider that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub provider_id: String,
    pub provider_name: String,
    /// Marketplace the system is reached through (e.g. a cloud reseller).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_from: Option<String>,
}

/// Provider family, inferred from the fields a system reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    IonQ,
    Braket,
    Rigetti,
    Ibm,
    Generic,
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProviderFamily::IonQ => "IonQ",
            ProviderFamily::Braket => "Amazon Braket",
            ProviderFamily::Rigetti => "Rigetti",
            ProviderFamily::Ibm => "IBM Quantum",
            ProviderFamily::Generic => "Generic",
        };
        f.write_str(s)
    }
}

/// IonQ-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IonqFields {
    /// The system may be processing jobs slower than usual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
    /// Only reported when queried with a token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_access: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characterization: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_models: Option<Vec<String>>,
}

/// Amazon Braket-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BraketFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gates_supported: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots_range: Option<ShotsRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_cost: Option<DeviceCost>,
}

/// Rigetti-specific characterization metrics, reported as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RigettiFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_t1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_t2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_sim_1q_fidelity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_2q_xy_fidelity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_2q_cz_fidelity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_ro_fidelity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median_active_reset_fidelity: Option<String>,
}

/// IBM Quantum-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IbmFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis_gates: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clops_h: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_experiments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_shots: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotsRange {
    pub min: u64,
    pub max: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCost {
    pub price: f64,
    pub unit: String,
}

impl IonqFields {
    pub fn is_populated(&self) -> bool {
        self.degraded.is_some()
            || self.has_access.is_some()
            || self.characterization.is_some()
            || self.noise_models.is_some()
    }
}

impl BraketFields {
    pub fn is_populated(&self) -> bool {
        self.gates_supported.is_some() || self.shots_range.is_some() || self.device_cost.is_some()
    }
}

impl RigettiFields {
    pub fn is_populated(&self) -> bool {
        self.metrics().next().is_some()
    }

    /// Populated metrics as `(label, value)` pairs.
    pub fn metrics(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Rep rate", &self.rep_rate),
            ("Median T1", &self.median_t1),
            ("Median T2", &self.median_t2),
            ("Median sim 1Q fidelity", &self.median_sim_1q_fidelity),
            ("Median 2Q XY fidelity", &self.median_2q_xy_fidelity),
            ("Median 2Q CZ fidelity", &self.median_2q_cz_fidelity),
            ("Median RO fidelity", &self.median_ro_fidelity),
            ("Median active reset fidelity", &self.median_active_reset_fidelity),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
    }
}

impl IbmFields {
    pub fn is_populated(&self) -> bool {
        self.basis_gates.is_some()
            || self.clops_h.is_some()
            || self.credits_required.is_some()
            || self.max_experiments.is_some()
            || self.max_shots.is_some()
    }
}

/// A quantum system (device or simulator) exposed by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    #[serde(alias = "_id")]
    pub id: String,
    pub provider: ProviderRef,
    /// Provider-scoped slug identifying the backend.
    #[serde(default)]
    pub bid: String,
    pub backend_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qubits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue: Option<QueueDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    /// Family tag written by the inventory service, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_type: Option<String>,

    #[serde(flatten)]
    pub ionq: IonqFields,
    #[serde(flatten)]
    pub braket: BraketFields,
    #[serde(flatten)]
    pub rigetti: RigettiFields,
    #[serde(flatten)]
    pub ibm: IbmFields,

    /// Names of the provider-specific fields this record carries.
    #[serde(default)]
    pub extra: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,

    /// Keys not modelled above.
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl System {
    /// Create a bare system with only identity and provider set.
    pub fn new(
        id: impl Into<String>,
        backend_name: impl Into<String>,
        provider_id: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        let backend_name = backend_name.into();
        Self {
            id: id.into(),
            provider: ProviderRef {
                provider_id: provider_id.into(),
                provider_name: provider_name.into(),
                provider_from: None,
            },
            bid: backend_name.to_lowercase().replace(' ', "-"),
            backend_name,
            status: None,
            qubits: None,
            queue: None,
            price: None,
            class_type: None,
            ionq: IonqFields::default(),
            braket: BraketFields::default(),
            rigetti: RigettiFields::default(),
            ibm: IbmFields::default(),
            extra: Vec::new(),
            last_checked: None,
            other: serde_json::Map::new(),
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_qubits(mut self, qubits: u32) -> Self {
        self.qubits = Some(qubits);
        self
    }

    pub fn with_queue(mut self, queue: QueueDescriptor) -> Self {
        self.queue = Some(queue);
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_gates_supported<I, S>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.braket.gates_supported = Some(gates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_basis_gates<I, S>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ibm.basis_gates = Some(gates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_last_checked(mut self, timestamp: impl Into<String>) -> Self {
        self.last_checked = Some(timestamp.into());
        self
    }

    pub fn status_category(&self) -> StatusCategory {
        classify(self.status.as_deref())
    }

    /// Family implied by the `class_type` tag, or else by populated fields.
    pub fn family(&self) -> ProviderFamily {
        let tagged = self.class_type.as_deref().map(str::to_lowercase);
        match tagged.as_deref() {
            Some(t) if t.contains("ionq") => return ProviderFamily::IonQ,
            Some(t) if t.contains("braket") || t.contains("aws") => return ProviderFamily::Braket,
            Some(t) if t.contains("rigetti") => return ProviderFamily::Rigetti,
            Some(t) if t.contains("ibm") => return ProviderFamily::Ibm,
            _ => {}
        }

        if self.ibm.is_populated() {
            ProviderFamily::Ibm
        } else if self.braket.is_populated() {
            ProviderFamily::Braket
        } else if self.rigetti.is_populated() {
            ProviderFamily::Rigetti
        } else if self.ionq.is_populated() {
            ProviderFamily::IonQ
        } else {
            ProviderFamily::Generic
        }
    }

    /// Whether every gate in `required` appears in one single gate list,
    /// either `gates_supported` or `basis_gates`.
    ///
    /// An empty requirement is trivially satisfied.
    pub fn supports_gates<S: AsRef<str>>(&self, required: &[S]) -> bool {
        if required.is_empty() {
            return true;
        }
        let covers = |list: &Option<Vec<String>>| {
            let list = list.as_deref().unwrap_or_default();
            required
                .iter()
                .all(|gate| list.iter().any(|g| g == gate.as_ref()))
        };
        covers(&self.braket.gates_supported) || covers(&self.ibm.basis_gates)
    }

    /// Display name followed by the marketplace, e.g. `"Aria-1 (aws)"`.
    pub fn display_name(&self) -> String {
        match self.provider.provider_from {
            Some(ref from) => format!("{} ({from})", self.backend_name),
            None => self.backend_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::QueueKind;

    #[test]
    fn test_deserialize_ibm_record() {
        let json = serde_json::json!({
            "id": "66a1",
            "provider": {"provider_id": "p-ibm", "provider_name": "IBM Quantum"},
            "bid": "ibm-brisbane",
            "backend_name": "Brisbane",
            "status": "online",
            "qubits": 127,
            "queue": {"type": "jobs_remaining", "value": "14"},
            "basis_gates": ["ecr", "id", "rz", "sx", "x"],
            "clops_h": 180000,
            "credits_required": true,
            "max_experiments": 300,
            "max_shots": 100000,
            "extra": ["status", "qubits", "queue"],
            "last_checked": "2024-05-02T10:00:00+00:00",
            "last_updated": "2024-05-02 09:58:00"
        });
        let system: System = serde_json::from_value(json).unwrap();
        assert_eq!(system.qubits, Some(127));
        assert_eq!(system.queue.as_ref().unwrap().kind, QueueKind::JobsRemaining);
        assert_eq!(system.ibm.clops_h, Some(180_000));
        assert_eq!(system.family(), ProviderFamily::Ibm);
        assert!(system.other.contains_key("last_updated"));
        assert!(!system.other.contains_key("basis_gates"));
    }

    #[test]
    fn test_deserialize_minimal_rigetti_record() {
        let json = serde_json::json!({
            "_id": "r1",
            "provider": {"provider_id": "p-rig", "provider_name": "Rigetti"},
            "backend_name": "Ankaa-2",
            "qubits": 84,
            "median_t1": "15.2 us",
            "median_2q_cz_fidelity": "97.4%"
        });
        let system: System = serde_json::from_value(json).unwrap();
        assert_eq!(system.id, "r1");
        assert!(system.status.is_none());
        assert_eq!(system.family(), ProviderFamily::Rigetti);
        let metrics: Vec<_> = system.rigetti.metrics().collect();
        assert_eq!(
            metrics,
            vec![("Median T1", "15.2 us"), ("Median 2Q CZ fidelity", "97.4%")]
        );
    }

    #[test]
    fn test_class_type_overrides_inference() {
        let mut system = System::new("s", "Aria 1", "p", "IonQ").with_gates_supported(["x"]);
        assert_eq!(system.family(), ProviderFamily::Braket);
        system.class_type = Some("IonQ".into());
        assert_eq!(system.family(), ProviderFamily::IonQ);
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let system = System::new("s1", "Harmony", "p1", "IonQ").with_qubits(11);
        let json = serde_json::to_value(&system).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["qubits"], 11);
        assert!(!obj.contains_key("status"));
        assert!(!obj.contains_key("basis_gates"));
        assert_eq!(obj["bid"], "harmony");
    }

    #[test]
    fn test_supports_gates_needs_single_list() {
        let system = System::new("s", "Mixed", "p", "P")
            .with_gates_supported(["h", "cnot"])
            .with_basis_gates(["rz", "sx"]);
        assert!(system.supports_gates(&["h", "cnot"]));
        assert!(system.supports_gates(&["rz"]));
        // Split across lists does not count.
        assert!(!system.supports_gates(&["h", "rz"]));
        assert!(system.supports_gates::<&str>(&[]));
        assert!(!System::new("s", "Bare", "p", "P").supports_gates(&["h"]));
    }

    #[test]
    fn test_display_name() {
        let mut system = System::new("s", "Aria 1", "p", "IonQ");
        assert_eq!(system.display_name(), "Aria 1");
        system.provider.provider_from = Some("aws".into());
        assert_eq!(system.display_name(), "Aria 1 (aws)");
    }
}
