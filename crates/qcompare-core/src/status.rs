//! Status classification and the online/offline filter buckets.
//!
//! Two independent vocabularies exist and are kept apart on purpose:
//!
//! - [`classify`] drives badges. It is case-sensitive and its Offline
//!   category is exactly `"offline"`.
//! - [`StatusFilter`] drives the binary online/offline view. It lower-cases
//!   the status first and its offline bucket also holds `"calibrating"` and
//!   `"reserved"`, while its online bucket lacks `"completed"` and `"ready"`.
//!
//! A status can therefore be badged Calibrating yet listed as Offline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Statuses shown as Available.
pub const AVAILABLE_STATUSES: [&str; 5] = ["running", "online", "available", "completed", "ready"];

/// Statuses counted as online by [`StatusFilter::Online`] and [`is_online`].
pub const ONLINE_FILTER_STATUSES: [&str; 3] = ["online", "running", "available"];

/// Statuses counted as offline by [`StatusFilter::Offline`].
pub const OFFLINE_FILTER_STATUSES: [&str; 3] = ["offline", "calibrating", "reserved"];

/// Display category for a system status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Available,
    Offline,
    Calibrating,
    Unknown,
    Other,
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCategory::Available => "Available",
            StatusCategory::Offline => "Offline",
            StatusCategory::Calibrating => "Calibrating",
            StatusCategory::Unknown => "Unknown",
            StatusCategory::Other => "Other",
        };
        f.write_str(s)
    }
}

/// Map a free-text status to its display category.
pub fn classify(status: Option<&str>) -> StatusCategory {
    match status {
        None | Some("") => StatusCategory::Unknown,
        Some(s) if AVAILABLE_STATUSES.contains(&s) => StatusCategory::Available,
        Some("offline") => StatusCategory::Offline,
        Some("calibrating") => StatusCategory::Calibrating,
        Some(_) => StatusCategory::Other,
    }
}

/// Case-sensitive online check used for counting and online-first ordering.
pub fn is_online(status: Option<&str>) -> bool {
    status.is_some_and(|s| ONLINE_FILTER_STATUSES.contains(&s))
}

/// Binary status filter applied to a grouped view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Online,
    Offline,
}

impl StatusFilter {
    /// Whether a system with `status` belongs to this bucket.
    pub fn matches(self, status: Option<&str>) -> bool {
        let bucket: &[&str] = match self {
            StatusFilter::All => return true,
            StatusFilter::Online => &ONLINE_FILTER_STATUSES,
            StatusFilter::Offline => &OFFLINE_FILTER_STATUSES,
        };
        status.is_some_and(|s| bucket.contains(&s.to_lowercase().as_str()))
    }
}

impl FromStr for StatusFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "online" => Ok(StatusFilter::Online),
            "offline" => Ok(StatusFilter::Offline),
            _ => Err(CoreError::UnknownStatusFilter(s.to_string())),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "All",
            StatusFilter::Online => "Online",
            StatusFilter::Offline => "Offline",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        for s in AVAILABLE_STATUSES {
            assert_eq!(classify(Some(s)), StatusCategory::Available);
        }
        assert_eq!(classify(Some("offline")), StatusCategory::Offline);
        assert_eq!(classify(Some("calibrating")), StatusCategory::Calibrating);
        assert_eq!(classify(None), StatusCategory::Unknown);
        assert_eq!(classify(Some("")), StatusCategory::Unknown);
        assert_eq!(classify(Some("reserved")), StatusCategory::Other);
    }

    #[test]
    fn test_classify_is_case_sensitive() {
        assert_eq!(classify(Some("Online")), StatusCategory::Other);
        assert_eq!(classify(Some("OFFLINE")), StatusCategory::Other);
    }

    #[test]
    fn test_filter_buckets_lowercase() {
        assert!(StatusFilter::Online.matches(Some("Online")));
        assert!(StatusFilter::Offline.matches(Some("RESERVED")));
        assert!(StatusFilter::Offline.matches(Some("calibrating")));
        assert!(!StatusFilter::Online.matches(Some("ready")));
        assert!(!StatusFilter::Online.matches(None));
        assert!(!StatusFilter::Offline.matches(None));
        assert!(StatusFilter::All.matches(None));
    }

    #[test]
    fn test_buckets_disagree_with_classifier() {
        // Badged Calibrating, filtered as Offline.
        assert_eq!(classify(Some("calibrating")), StatusCategory::Calibrating);
        assert!(StatusFilter::Offline.matches(Some("calibrating")));
        // Badged Available, but in neither filter bucket.
        assert_eq!(classify(Some("completed")), StatusCategory::Available);
        assert!(!StatusFilter::Online.matches(Some("completed")));
        assert!(!StatusFilter::Offline.matches(Some("completed")));
    }

    #[test]
    fn test_is_online() {
        assert!(is_online(Some("running")));
        assert!(!is_online(Some("Running")));
        assert!(!is_online(Some("ready")));
        assert!(!is_online(None));
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("Online".parse::<StatusFilter>(), Ok(StatusFilter::Online));
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert!("busy".parse::<StatusFilter>().is_err());
    }
}
