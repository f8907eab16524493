//! Queue descriptors and their ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::duration::{format_duration, parse_int_prefix, parse_queue_millis};

/// Kind of queue estimate reported for a system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueueKind {
    /// Number of jobs waiting ahead (`"jobs_remaining"`).
    JobsRemaining,
    /// Average wait time (`"avg_time"`).
    AvgTime,
    /// A tag this crate does not know; never comparable.
    Other(String),
}

impl QueueKind {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            QueueKind::JobsRemaining => "jobs_remaining",
            QueueKind::AvgTime => "avg_time",
            QueueKind::Other(tag) => tag,
        }
    }

    /// Column label used when presenting the queue.
    pub fn label(&self) -> &'static str {
        match self {
            QueueKind::JobsRemaining => "Queued Jobs",
            QueueKind::AvgTime => "Queue Time",
            QueueKind::Other(_) => "Queue",
        }
    }
}

impl From<String> for QueueKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "jobs_remaining" => QueueKind::JobsRemaining,
            "avg_time" => QueueKind::AvgTime,
            _ => QueueKind::Other(tag),
        }
    }
}

impl From<QueueKind> for String {
    fn from(kind: QueueKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged queue estimate: `{ "type": ..., "value": ... }`.
///
/// The value is kept as text because providers report it that way; numeric
/// JSON values are accepted and stringified on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDescriptor {
    #[serde(rename = "type")]
    pub kind: QueueKind,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

impl QueueDescriptor {
    /// A `jobs_remaining` descriptor.
    pub fn jobs_remaining(count: u64) -> Self {
        Self {
            kind: QueueKind::JobsRemaining,
            value: count.to_string(),
        }
    }

    /// An `avg_time` descriptor holding a millisecond count.
    pub fn avg_time(millis: u64) -> Self {
        Self {
            kind: QueueKind::AvgTime,
            value: millis.to_string(),
        }
    }

    /// An `avg_time` descriptor holding a compound duration such as `"2hrs 5min"`.
    pub fn avg_time_text(text: impl Into<String>) -> Self {
        Self {
            kind: QueueKind::AvgTime,
            value: text.into(),
        }
    }

    /// Wait time in milliseconds, for `avg_time` queues only.
    pub fn wait_millis(&self) -> Option<u64> {
        match self.kind {
            QueueKind::AvgTime => Some(parse_queue_millis(&self.value)),
            _ => None,
        }
    }

    /// Jobs ahead, for `jobs_remaining` queues whose value parses.
    pub fn jobs(&self) -> Option<i64> {
        match self.kind {
            QueueKind::JobsRemaining => parse_int_prefix(&self.value),
            _ => None,
        }
    }

    /// Human-readable value: formatted wait time, job count or raw text.
    pub fn display_value(&self) -> String {
        match self.kind {
            QueueKind::AvgTime => format_duration(self.wait_millis()),
            QueueKind::JobsRemaining | QueueKind::Other(_) => self.value.clone(),
        }
    }
}

impl fmt::Display for QueueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.display_value())
    }
}

/// Order two optional queues, shorter first.
///
/// Absent queues sort after present ones. Only descriptors with the same tag
/// are comparable; mixed or unknown tags compare `Equal` so a stable sort
/// leaves them where they were. The result is therefore not a total order.
pub fn compare_queues(a: Option<&QueueDescriptor>, b: Option<&QueueDescriptor>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    match (&a.kind, &b.kind) {
        (QueueKind::AvgTime, QueueKind::AvgTime) => a.wait_millis().cmp(&b.wait_millis()),
        (QueueKind::JobsRemaining, QueueKind::JobsRemaining) => match (a.jobs(), b.jobs()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip_names() {
        assert_eq!(QueueKind::from("avg_time".to_string()), QueueKind::AvgTime);
        assert_eq!(
            QueueKind::from("jobs_remaining".to_string()),
            QueueKind::JobsRemaining
        );
        assert_eq!(
            QueueKind::from("eta".to_string()),
            QueueKind::Other("eta".into())
        );
        assert_eq!(QueueKind::AvgTime.to_string(), "avg_time");
    }

    #[test]
    fn test_deserialize_numeric_value() {
        let q: QueueDescriptor =
            serde_json::from_str(r#"{"type":"jobs_remaining","value":12}"#).unwrap();
        assert_eq!(q.kind, QueueKind::JobsRemaining);
        assert_eq!(q.value, "12");
        assert_eq!(q.jobs(), Some(12));
    }

    #[test]
    fn test_serialize_uses_type_tag() {
        let json = serde_json::to_value(QueueDescriptor::avg_time(60_000)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "avg_time", "value": "60000"}));
    }

    #[test]
    fn test_absent_sorts_last() {
        let q = QueueDescriptor::jobs_remaining(3);
        assert_eq!(compare_queues(None, None), Ordering::Equal);
        assert_eq!(compare_queues(None, Some(&q)), Ordering::Greater);
        assert_eq!(compare_queues(Some(&q), None), Ordering::Less);
    }

    #[test]
    fn test_same_tag_comparisons() {
        let short = QueueDescriptor::avg_time_text("5min");
        let long = QueueDescriptor::avg_time(2 * 60 * 60 * 1000);
        assert_eq!(compare_queues(Some(&short), Some(&long)), Ordering::Less);
        assert_eq!(compare_queues(Some(&long), Some(&short)), Ordering::Greater);

        let few = QueueDescriptor::jobs_remaining(2);
        let many = QueueDescriptor::jobs_remaining(40);
        assert_eq!(compare_queues(Some(&few), Some(&many)), Ordering::Less);
        assert_eq!(compare_queues(Some(&few), Some(&few)), Ordering::Equal);
    }

    #[test]
    fn test_cross_tag_is_equal() {
        let jobs = QueueDescriptor::jobs_remaining(5);
        let time = QueueDescriptor::avg_time(60_000);
        assert_eq!(compare_queues(Some(&jobs), Some(&time)), Ordering::Equal);
        assert_eq!(compare_queues(Some(&time), Some(&jobs)), Ordering::Equal);
    }

    #[test]
    fn test_unparsable_jobs_are_equal() {
        let bad = QueueDescriptor {
            kind: QueueKind::JobsRemaining,
            value: "unknown".into(),
        };
        let good = QueueDescriptor::jobs_remaining(1);
        assert_eq!(compare_queues(Some(&bad), Some(&good)), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            QueueDescriptor::avg_time(3 * 60 * 60 * 1000).to_string(),
            "Queue Time: 3hrs 0min"
        );
        assert_eq!(
            QueueDescriptor::avg_time_text("2hrs 5min").display_value(),
            "2hrs 5min"
        );
        assert_eq!(
            QueueDescriptor::jobs_remaining(7).to_string(),
            "Queued Jobs: 7"
        );
    }
}
