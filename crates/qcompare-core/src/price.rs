//! Price descriptors and their ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit prices published for a system. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Free-text price as published by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_task_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_shot_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_minute_price: Option<f64>,
}

/// One of the comparable unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    PerShot,
    PerTask,
    PerMinute,
}

impl PriceField {
    /// Fields in the order [`compare_prices`] consults them.
    pub const PRIORITY: [PriceField; 3] =
        [PriceField::PerShot, PriceField::PerTask, PriceField::PerMinute];

    pub fn unit(self) -> &'static str {
        match self {
            PriceField::PerShot => "shot",
            PriceField::PerTask => "task",
            PriceField::PerMinute => "minute",
        }
    }
}

impl Price {
    pub fn per_shot(price: f64) -> Self {
        Self {
            per_shot_price: Some(price),
            ..Self::default()
        }
    }

    pub fn per_task(price: f64) -> Self {
        Self {
            per_task_price: Some(price),
            ..Self::default()
        }
    }

    pub fn per_minute(price: f64) -> Self {
        Self {
            per_minute_price: Some(price),
            ..Self::default()
        }
    }

    pub fn get(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::PerShot => self.per_shot_price,
            PriceField::PerTask => self.per_task_price,
            PriceField::PerMinute => self.per_minute_price,
        }
    }

    /// `true` when no price information is present at all.
    pub fn is_empty(&self) -> bool {
        self.full_price.is_none() && PriceField::PRIORITY.iter().all(|f| self.get(*f).is_none())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref full) = self.full_price {
            return f.write_str(full);
        }
        let parts: Vec<String> = PriceField::PRIORITY
            .iter()
            .filter_map(|field| self.get(*field).map(|p| format!("${p}/{}", field.unit())))
            .collect();
        if parts.is_empty() {
            f.write_str("N/A")
        } else {
            f.write_str(&parts.join(" + "))
        }
    }
}

/// Order two optional prices, cheapest first.
///
/// Absent prices sort last. Otherwise the first field present on both sides,
/// in [`PriceField::PRIORITY`] order, decides; if no field is shared (or the
/// shared value is NaN) the prices compare `Equal`.
pub fn compare_prices(a: Option<&Price>, b: Option<&Price>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    PriceField::PRIORITY
        .iter()
        .find_map(|field| match (a.get(*field), b.get(*field)) {
            (Some(x), Some(y)) => Some(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
            _ => None,
        })
        .unwrap_or(Ordering::Equal)
}
