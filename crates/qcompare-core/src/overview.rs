//! Inventory-wide summary figures and recency ordering.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Serialize;

use crate::duration::format_duration;
use crate::provider::Provider;
use crate::ranking::stable_sort_by;
use crate::status::is_online;
use crate::system::System;

/// Headline numbers for the whole inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub providers: usize,
    pub systems: usize,
    pub online_systems: usize,
    /// Largest qubit count among online systems.
    pub max_online_qubits: Option<u32>,
    /// Shortest `avg_time` wait among online systems, in milliseconds.
    pub min_online_wait_ms: Option<u64>,
}

impl Overview {
    pub fn from_inventory(providers: &[Provider], systems: &[System]) -> Self {
        let online: Vec<&System> = systems
            .iter()
            .filter(|s| is_online(s.status.as_deref()))
            .collect();

        Self {
            providers: providers.len(),
            systems: systems.len(),
            online_systems: online.len(),
            max_online_qubits: online.iter().filter_map(|s| s.qubits).max(),
            min_online_wait_ms: online
                .iter()
                .filter_map(|s| s.queue.as_ref()?.wait_millis())
                .min(),
        }
    }

    /// Formatted shortest wait, `"N/A"` when no online system reports one.
    pub fn min_online_wait(&self) -> String {
        format_duration(self.min_online_wait_ms)
    }
}

/// Parse a `last_checked` stamp.
///
/// Accepts RFC 3339, `"%Y-%m-%d %H:%M:%S GMT%z"` as written by the
/// inventory service, and naive `"%Y-%m-%d %H:%M:%S"` taken as UTC.
pub fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts);
    }
    if let Ok(ts) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S GMT%z") {
        return Some(ts);
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Systems ordered by `last_checked`, most recent first.
///
/// Missing or unparsable stamps go last, in input order.
pub fn newest_first(systems: &[System]) -> Vec<&System> {
    let mut stamped: Vec<(Option<DateTime<FixedOffset>>, &System)> = systems
        .iter()
        .map(|s| (s.last_checked.as_deref().and_then(parse_timestamp), s))
        .collect();
    stable_sort_by(&mut stamped, |(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    stamped.into_iter().map(|(_, s)| s).collect()
}
