//! Side-by-side comparison of two systems or two providers.
//!
//! Comparisons are addressed by `"a-vs-b"` slugs built from [`system_slug`]
//! or a provider's `pid`.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::provider::Provider;
use crate::ranking::stable_sort_by;
use crate::status::is_online;
use crate::system::System;

const VERSUS: &str = "-vs-";

/// Split an `"a-vs-b"` slug into its two sides.
///
/// The last `-vs-` separates the sides, so `"a-vs-b-vs-c"` names
/// `"a-vs-b"` and `"c"`; both sides must be non-empty.
pub fn parse_versus(slug: &str) -> CoreResult<(String, String)> {
    let slug = slug.trim();
    match slug.rsplit_once(VERSUS) {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => Err(CoreError::InvalidVersus(slug.to_string())),
    }
}

/// Build the `"a-vs-b"` slug for two sides.
pub fn versus_slug(a: &str, b: &str) -> String {
    format!("{a}{VERSUS}{b}")
}

/// Display form of a name: spaces become `-` and every ASCII word character
/// that starts a word is upper-cased.
///
/// `"ibm quantum"` becomes `"Ibm-Quantum"`, `"foo-bar"` becomes `"Foo-Bar"`.
pub fn normalize_name(name: &str) -> String {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for c in name.chars().map(|c| if c == ' ' { '-' } else { c }) {
        let word = is_word(c);
        if word && !in_word {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        in_word = word;
    }
    out
}

/// URL slug of a system: lower-cased name, `-{provider_from}` when listed
/// through a marketplace.
pub fn system_slug(system: &System) -> String {
    let base = system.backend_name.to_lowercase().replace(' ', "-");
    match system.provider.provider_from {
        Some(ref from) => format!("{base}-{from}"),
        None => base,
    }
}

/// Find a system by slug, `bid` or id.
pub fn find_system<'a>(systems: &'a [System], key: &str) -> Option<&'a System> {
    systems
        .iter()
        .find(|s| system_slug(s) == key)
        .or_else(|| systems.iter().find(|s| s.bid == key || s.id == key))
}

/// Find a provider by `pid`, id or case-insensitive name.
pub fn find_provider<'a>(providers: &'a [Provider], key: &str) -> Option<&'a Provider> {
    providers.iter().find(|p| {
        p.pid.as_deref() == Some(key)
            || p.id.as_deref() == Some(key)
            || p.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(key))
    })
}

/// Stable reorder placing online systems first.
pub fn online_first(systems: &mut [&System]) {
    stable_sort_by(systems, |a, b| {
        is_online(b.status.as_deref()).cmp(&is_online(a.status.as_deref()))
    });
}

pub fn count_online<'a>(systems: impl IntoIterator<Item = &'a System>) -> usize {
    systems
        .into_iter()
        .filter(|s| is_online(s.status.as_deref()))
        .count()
}

/// One labelled line of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Row-wise view of two systems. Rows where neither side has a value are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemComparison<'a> {
    pub left: &'a System,
    pub right: &'a System,
    pub rows: Vec<ComparisonRow>,
}

impl<'a> SystemComparison<'a> {
    pub fn new(left: &'a System, right: &'a System) -> Self {
        let (l, r) = (facts(left), facts(right));

        let mut labels: Vec<&str> = Vec::new();
        for (label, _) in l.iter().chain(r.iter()) {
            if !labels.contains(&label.as_str()) {
                labels.push(label);
            }
        }

        let lookup = |side: &[(String, String)], label: &str| {
            side.iter().find(|(name, _)| name == label).map(|(_, v)| v.clone())
        };
        let rows = labels
            .into_iter()
            .map(|label| ComparisonRow {
                label: label.to_string(),
                left: lookup(&l, label),
                right: lookup(&r, label),
            })
            .collect();

        Self { left, right, rows }
    }

    /// Rows whose two sides differ.
    pub fn differences(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|row| row.left != row.right)
    }
}

fn facts(system: &System) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    let mut push = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            out.push((label.to_string(), value));
        }
    };

    push("Provider", Some(system.provider.provider_name.clone()));
    push("Marketplace", system.provider.provider_from.clone());
    push("Family", Some(system.family().to_string()));
    push("Status", Some(system.status_category().to_string()));
    push("Qubits", system.qubits.map(|q| q.to_string()));
    push("Queue", system.queue.as_ref().map(|q| q.to_string()));
    push(
        "Price",
        system.price.as_ref().filter(|p| !p.is_empty()).map(|p| p.to_string()),
    );

    let gates = |list: &Option<Vec<String>>| list.as_ref().map(|g| g.join(", "));
    push("Basis gates", gates(&system.ibm.basis_gates));
    push("Supported gates", gates(&system.braket.gates_supported));
    push("CLOPS", system.ibm.clops_h.map(|c| c.to_string()));
    push("Max shots", system.ibm.max_shots.map(|s| s.to_string()));
    push("Max experiments", system.ibm.max_experiments.map(|s| s.to_string()));
    push(
        "Shots range",
        system.braket.shots_range.map(|r| format!("{} - {}", r.min, r.max)),
    );
    push(
        "Device cost",
        system
            .braket
            .device_cost
            .as_ref()
            .map(|c| format!("${}/{}", c.price, c.unit)),
    );
    push("Degraded", system.ionq.degraded.map(|d| d.to_string()));
    push(
        "Noise models",
        system.ionq.noise_models.as_ref().map(|m| m.join(", ")),
    );
    for (label, value) in system.rigetti.metrics() {
        push(label, Some(value.to_string()));
    }
    push("Last checked", system.last_checked.clone());

    out
}

/// One provider's half of a [`ProviderComparison`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSide<'a> {
    pub provider: &'a Provider,
    /// Systems listed in the provider's `backends_ids`, online first.
    pub systems: Vec<&'a System>,
    pub online: usize,
}

impl<'a> ProviderSide<'a> {
    pub fn new(provider: &'a Provider, systems: &'a [System]) -> Self {
        let mut owned: Vec<&System> = systems.iter().filter(|s| provider.lists_backend(s)).collect();
        online_first(&mut owned);
        let online = count_online(owned.iter().copied());
        Self {
            provider,
            systems: owned,
            online,
        }
    }
}

/// Two providers with their systems and the attributes either one populates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderComparison<'a> {
    pub left: ProviderSide<'a>,
    pub right: ProviderSide<'a>,
    /// Union of populated attribute names, first-seen order.
    pub attributes: Vec<String>,
}

impl<'a> ProviderComparison<'a> {
    pub fn new(left: &'a Provider, right: &'a Provider, systems: &'a [System]) -> Self {
        let mut attributes = left.populated_attributes();
        for attr in right.populated_attributes() {
            if !attributes.contains(&attr) {
                attributes.push(attr);
            }
        }
        Self {
            left: ProviderSide::new(left, systems),
            right: ProviderSide::new(right, systems),
            attributes,
        }
    }
}
