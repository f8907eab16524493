//! Detailed filter criteria and the form they are parsed from.

use serde::{Deserialize, Serialize};

use crate::duration::{is_duration_bound, parse_duration};
use crate::error::{CoreError, CoreResult};
use crate::system::System;

/// Largest qubit floor the filter form accepts.
pub const MAX_QUBIT_FILTER: u32 = 1000;

/// Optional bounds applied conjunctively to each system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Systems with fewer qubits fail. Systems that report no qubit count pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_qubits: Option<u32>,
    /// Every gate must appear in `gates_supported` or every gate in `basis_gates`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gates: Vec<String>,
    /// Only `avg_time` queues at or under this wait (ms) pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queue_time_ms: Option<u64>,
    /// Only `jobs_remaining` queues at or under this count pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_queued_jobs: Option<u64>,
    /// Ceiling on `per_task_price`, applied only where the field is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_per_task: Option<f64>,
    /// Ceiling on `per_shot_price`, applied only where the field is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price_per_shot: Option<f64>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_qubits(mut self, qubits: u32) -> Self {
        self.min_qubits = Some(qubits);
        self
    }

    pub fn with_gates<I, S>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gates = gates.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_queue_time_ms(mut self, millis: u64) -> Self {
        self.max_queue_time_ms = Some(millis);
        self
    }

    pub fn with_max_queued_jobs(mut self, jobs: u64) -> Self {
        self.max_queued_jobs = Some(jobs);
        self
    }

    pub fn with_max_price_per_task(mut self, price: f64) -> Self {
        self.max_price_per_task = Some(price);
        self
    }

    pub fn with_max_price_per_shot(mut self, price: f64) -> Self {
        self.max_price_per_shot = Some(price);
        self
    }

    /// `true` when no bound is set, so every system passes.
    pub fn is_empty(&self) -> bool {
        self.min_qubits.is_none()
            && self.gates.is_empty()
            && self.max_queue_time_ms.is_none()
            && self.max_queued_jobs.is_none()
            && self.max_price_per_task.is_none()
            && self.max_price_per_shot.is_none()
    }

    /// Check every set bound against `system`.
    pub fn matches(&self, system: &System) -> bool {
        if let (Some(floor), Some(qubits)) = (self.min_qubits, system.qubits) {
            if qubits < floor {
                return false;
            }
        }

        if !system.supports_gates(self.gates.as_slice()) {
            return false;
        }

        if let Some(bound) = self.max_queue_time_ms {
            let wait = system.queue.as_ref().and_then(|q| q.wait_millis());
            if !wait.is_some_and(|w| w <= bound) {
                return false;
            }
        }

        if let Some(bound) = self.max_queued_jobs {
            let jobs = system.queue.as_ref().and_then(|q| q.jobs());
            if !jobs.is_some_and(|j| j <= i64::try_from(bound).unwrap_or(i64::MAX)) {
                return false;
            }
        }

        let price = system.price.as_ref();
        if let (Some(ceiling), Some(p)) =
            (self.max_price_per_task, price.and_then(|p| p.per_task_price))
        {
            if p > ceiling {
                return false;
            }
        }
        if let (Some(ceiling), Some(p)) =
            (self.max_price_per_shot, price.and_then(|p| p.per_shot_price))
        {
            if p > ceiling {
                return false;
            }
        }

        true
    }
}

/// Raw text inputs of the detailed filter form. Empty fields are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterForm {
    #[serde(default)]
    pub qubits: String,
    /// Comma-separated gate names.
    #[serde(default)]
    pub supported_gates: String,
    /// Single-unit bound such as `"3d"`, `"12hrs"` or `"30min"`.
    #[serde(default)]
    pub queue_time: String,
    #[serde(default)]
    pub queued_jobs: String,
    #[serde(default)]
    pub price_per_task: String,
    #[serde(default)]
    pub price_per_shot: String,
}

impl FilterForm {
    /// Validate the form and turn it into [`FilterCriteria`].
    pub fn parse(&self) -> CoreResult<FilterCriteria> {
        let mut criteria = FilterCriteria::default();

        if let Some(text) = non_empty(&self.qubits) {
            let qubits: u32 = text
                .parse()
                .map_err(|_| CoreError::criteria("qubits", format!("'{text}' is not a whole number")))?;
            if qubits > MAX_QUBIT_FILTER {
                return Err(CoreError::criteria(
                    "qubits",
                    format!("must be at most {MAX_QUBIT_FILTER}"),
                ));
            }
            criteria.min_qubits = Some(qubits);
        }

        criteria.gates = self
            .supported_gates
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(String::from)
            .collect();

        if let Some(text) = non_empty(&self.queue_time) {
            if !is_duration_bound(text) {
                return Err(CoreError::criteria(
                    "queue time",
                    format!("'{text}' must look like 3d, 12hrs or 30min"),
                ));
            }
            criteria.max_queue_time_ms = Some(parse_duration(text));
        }

        if let Some(text) = non_empty(&self.queued_jobs) {
            let jobs: u64 = text.parse().map_err(|_| {
                CoreError::criteria("queued jobs", format!("'{text}' is not a non-negative integer"))
            })?;
            criteria.max_queued_jobs = Some(jobs);
        }

        criteria.max_price_per_task = parse_price("price per task", &self.price_per_task)?;
        criteria.max_price_per_shot = parse_price("price per shot", &self.price_per_shot)?;

        Ok(criteria)
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn parse_price(field: &'static str, text: &str) -> CoreResult<Option<f64>> {
    let Some(text) = non_empty(text) else {
        return Ok(None);
    };
    let price: f64 = text
        .parse()
        .map_err(|_| CoreError::criteria(field, format!("'{text}' is not a number")))?;
    if !price.is_finite() || price < 0.0 {
        return Err(CoreError::criteria(field, "must be a non-negative amount"));
    }
    Ok(Some(price))
}
