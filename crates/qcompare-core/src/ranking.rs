//! Grouped ranking and filtering of systems.
//!
//! The pipeline is a chain of pure stages over borrowed inventory:
//!
//! ```text
//!   group_by_provider ──→ filter_status ──→ filter_criteria ──→ sort_groups
//! ```
//!
//! Every stage drops provider groups left without systems, so a provider
//! whose systems are all filtered out is absent from the result rather than
//! present with an empty list.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::filter::FilterCriteria;
use crate::price::{PriceField, compare_prices};
use crate::provider::Provider;
use crate::queue::{QueueKind, compare_queues};
use crate::status::StatusFilter;
use crate::system::System;

/// Ordering applied within and across provider groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most qubits first; systems without a count go last.
    #[default]
    Qubits,
    /// Shortest queue first (see [`compare_queues`]).
    Queue,
    /// Cheapest first (see [`compare_prices`]).
    Price,
}

impl SortKey {
    /// Compare two systems under this key.
    pub fn compare(self, a: &System, b: &System) -> Ordering {
        match self {
            SortKey::Qubits => match (a.qubits, b.qubits) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Queue => compare_queues(a.queue.as_ref(), b.queue.as_ref()),
            SortKey::Price => compare_prices(a.price.as_ref(), b.price.as_ref()),
        }
    }

    /// The lane `system` is ranked in; `None` when it lacks the sort field.
    ///
    /// [`SortKey::compare`] is a total order inside a lane. Systems in
    /// different lanes, or in [`Lane::Unordered`], compare `Equal`.
    fn lane(self, system: &System) -> Option<Lane> {
        match self {
            SortKey::Qubits => system.qubits.map(|_| Lane::Qubits),
            SortKey::Queue => system.queue.as_ref().map(|queue| match queue.kind {
                QueueKind::AvgTime => Lane::WaitTime,
                QueueKind::JobsRemaining if queue.jobs().is_some() => Lane::JobCount,
                _ => Lane::Unordered,
            }),
            SortKey::Price => system.price.as_ref().map(|price| {
                PriceField::PRIORITY
                    .iter()
                    .find_map(|field| price.get(*field).map(|value| (*field, value)))
                    .map_or(Lane::Unordered, |(field, value)| {
                        if value.is_nan() {
                            Lane::Unordered
                        } else {
                            Lane::Price(field)
                        }
                    })
            }),
        }
    }
}

/// Subset of systems that a sort key can order among themselves.
///
/// Price lanes are keyed by the first field in [`PriceField::PRIORITY`] a
/// price carries, which is the field [`compare_prices`] decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lane {
    Qubits,
    WaitTime,
    JobCount,
    Price(PriceField),
    Unordered,
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qubits" => Ok(SortKey::Qubits),
            "queue" => Ok(SortKey::Queue),
            "price" => Ok(SortKey::Price),
            _ => Err(CoreError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Qubits => "Qubits",
            SortKey::Queue => "Queue",
            SortKey::Price => "Price",
        };
        f.write_str(s)
    }
}

/// Everything that shapes a ranked view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criteria: Option<FilterCriteria>,
    #[serde(default)]
    pub sort: SortKey,
}

impl RankRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }
}

/// A provider together with the systems that survived ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderGroup<'a> {
    pub provider: &'a Provider,
    pub systems: Vec<&'a System>,
}

impl<'a> ProviderGroup<'a> {
    /// The first system of the group, which represents it when groups are sorted.
    pub fn top(&self) -> Option<&'a System> {
        self.systems.first().copied()
    }
}

/// Ordered, grouped result of [`rank`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedView<'a> {
    pub groups: Vec<ProviderGroup<'a>>,
}

impl<'a> RankedView<'a> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of systems across all groups.
    pub fn system_count(&self) -> usize {
        self.groups.iter().map(|g| g.systems.len()).sum()
    }

    /// All systems in display order.
    pub fn systems(&self) -> impl Iterator<Item = &'a System> + '_ {
        self.groups.iter().flat_map(|g| g.systems.iter().copied())
    }
}

/// Group systems under their providers, in provider order.
///
/// A system belongs to the provider whose `id` equals its `provider_id`.
/// Systems whose provider is not in `providers` are left out, as are
/// providers without systems.
pub fn group_by_provider<'a>(providers: &'a [Provider], systems: &'a [System]) -> Vec<ProviderGroup<'a>> {
    let mut by_provider: FxHashMap<&str, Vec<&'a System>> = FxHashMap::default();
    for system in systems {
        by_provider
            .entry(system.provider.provider_id.as_str())
            .or_default()
            .push(system);
    }

    let groups: Vec<ProviderGroup<'a>> = providers
        .iter()
        .filter_map(|provider| {
            let systems = by_provider.remove(provider.id.as_deref()?)?;
            Some(ProviderGroup { provider, systems })
        })
        .collect();

    if !by_provider.is_empty() {
        debug!(
            orphaned = by_provider.values().map(Vec::len).sum::<usize>(),
            "systems reference unknown providers"
        );
    }
    groups
}

/// Keep only systems in the requested status bucket.
pub fn filter_status<'a>(groups: Vec<ProviderGroup<'a>>, status: StatusFilter) -> Vec<ProviderGroup<'a>> {
    if status == StatusFilter::All {
        return groups;
    }
    retain_systems(groups, |s| status.matches(s.status.as_deref()))
}

/// Keep only systems meeting every bound in `criteria`.
pub fn filter_criteria<'a>(
    groups: Vec<ProviderGroup<'a>>,
    criteria: &FilterCriteria,
) -> Vec<ProviderGroup<'a>> {
    if criteria.is_empty() {
        return groups;
    }
    retain_systems(groups, |s| criteria.matches(s))
}

/// Sort systems within each group, then groups by their top system.
///
/// Systems missing the sort field go last. The rest are reordered only
/// within their lane: each lane is sorted inside the positions it already
/// occupies, so a second pass is a no-op even though the queue and price
/// comparators are not total orders.
pub fn sort_groups(mut groups: Vec<ProviderGroup<'_>>, key: SortKey) -> Vec<ProviderGroup<'_>> {
    for group in &mut groups {
        sort_in_lanes(&mut group.systems, |s| key.lane(s), |a, b| key.compare(a, b));
    }
    sort_in_lanes(
        &mut groups,
        |g| g.top().and_then(|s| key.lane(s)),
        |a, b| match (a.top(), b.top()) {
            (Some(a), Some(b)) => key.compare(a, b),
            _ => Ordering::Equal,
        },
    );
    groups
}

/// Group, filter and sort in one pass.
///
/// Never fails: absent or malformed fields fail predicates or sort last.
pub fn rank<'a>(providers: &'a [Provider], systems: &'a [System], request: &RankRequest) -> RankedView<'a> {
    let groups = group_by_provider(providers, systems);
    trace!(groups = groups.len(), "grouped systems by provider");

    let groups = filter_status(groups, request.status);
    let groups = match request.criteria {
        Some(ref criteria) => filter_criteria(groups, criteria),
        None => groups,
    };
    let groups = sort_groups(groups, request.sort);

    let view = RankedView { groups };
    debug!(
        status = %request.status,
        sort = %request.sort,
        providers = view.groups.len(),
        systems = view.system_count(),
        "ranked inventory"
    );
    view
}

/// Return the `page`-th slice (1-based) of `items`; out-of-range pages are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

fn retain_systems<'a>(
    groups: Vec<ProviderGroup<'a>>,
    mut keep: impl FnMut(&System) -> bool,
) -> Vec<ProviderGroup<'a>> {
    groups
        .into_iter()
        .filter_map(|mut group| {
            group.systems.retain(|s| keep(s));
            (!group.systems.is_empty()).then_some(group)
        })
        .collect()
}

/// Move items without a lane to the end, then stable-sort every lane inside
/// the slots its members hold. [`Lane::Unordered`] items stay put.
fn sort_in_lanes<T: Clone>(
    items: &mut [T],
    lane_of: impl Fn(&T) -> Option<Lane>,
    mut compare: impl FnMut(&T, &T) -> Ordering,
) {
    let (mut ranked, absent): (Vec<T>, Vec<T>) =
        items.iter().cloned().partition(|item| lane_of(item).is_some());
    let lanes: Vec<Lane> = ranked.iter().filter_map(&lane_of).collect();

    let mut done: Vec<Lane> = Vec::new();
    for lane in lanes.iter().copied() {
        if lane == Lane::Unordered || done.contains(&lane) {
            continue;
        }
        done.push(lane);
        let slots: Vec<usize> = (0..lanes.len()).filter(|&i| lanes[i] == lane).collect();
        let mut members: Vec<T> = slots.iter().map(|&i| ranked[i].clone()).collect();
        stable_sort_by(&mut members, &mut compare);
        for (slot, member) in slots.into_iter().zip(members) {
            ranked[slot] = member;
        }
    }

    for (slot, item) in items.iter_mut().zip(ranked.into_iter().chain(absent)) {
        *slot = item;
    }
}

/// Stable merge sort that tolerates comparators which are not total orders.
///
/// The queue and price comparators report `Equal` for incomparable pairs,
/// which breaks transitivity; `slice::sort_by` may panic on such input.
pub(crate) fn stable_sort_by<T: Clone>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    if items.len() < 2 {
        return;
    }
    let mut buffer = items.to_vec();
    merge_sort(items, &mut buffer, &mut compare);
}

fn merge_sort<T: Clone>(items: &mut [T], buffer: &mut [T], compare: &mut impl FnMut(&T, &T) -> Ordering) {
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (left_buf, right_buf) = buffer.split_at_mut(mid);
        merge_sort(left, left_buf, compare);
        merge_sort(right, right_buf, compare);
    }

    buffer[..len].clone_from_slice(items);
    let (mut i, mut j) = (0, mid);
    for slot in items.iter_mut() {
        let take_left = j >= len || (i < mid && compare(&buffer[i], &buffer[j]) != Ordering::Greater);
        if take_left {
            *slot = buffer[i].clone();
            i += 1;
        } else {
            *slot = buffer[j].clone();
            j += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;
    use crate::queue::QueueDescriptor;

    fn inventory() -> (Vec<Provider>, Vec<System>) {
        let providers = vec![
            Provider::new("p-ionq", "IonQ"),
            Provider::new("p-ibm", "IBM Quantum"),
            Provider::new("p-empty", "Empty Labs"),
        ];
        let systems = vec![
            System::new("s1", "Harmony", "p-ionq", "IonQ")
                .with_status("available")
                .with_qubits(11)
                .with_queue(QueueDescriptor::avg_time_text("2hrs 0min")),
            System::new("s2", "Aria 1", "p-ionq", "IonQ")
                .with_status("available")
                .with_qubits(25)
                .with_queue(QueueDescriptor::avg_time_text("5hrs 30min")),
            System::new("s3", "Brisbane", "p-ibm", "IBM Quantum")
                .with_status("online")
                .with_qubits(127)
                .with_queue(QueueDescriptor::jobs_remaining(40)),
            System::new("s4", "Kyoto", "p-ibm", "IBM Quantum")
                .with_status("offline")
                .with_qubits(127)
                .with_queue(QueueDescriptor::jobs_remaining(3)),
            System::new("s5", "Orphan", "p-missing", "Nobody").with_qubits(1000),
        ];
        (providers, systems)
    }

    fn ids(view: &RankedView<'_>) -> Vec<Vec<String>> {
        view.groups
            .iter()
            .map(|g| g.systems.iter().map(|s| s.id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_grouping_drops_empty_and_orphans() {
        let (providers, systems) = inventory();
        let groups = group_by_provider(&providers, &systems);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].provider.display_name(), "IonQ");
        assert_eq!(groups[0].systems.len(), 2);
        assert_eq!(groups[1].systems.len(), 2);
    }

    #[test]
    fn test_default_sort_is_qubits_desc() {
        let (providers, systems) = inventory();
        let view = rank(&providers, &systems, &RankRequest::new());
        assert_eq!(ids(&view), vec![vec!["s3", "s4"], vec!["s2", "s1"]]);
        assert_eq!(view.system_count(), 4);
    }

    #[test]
    fn test_status_filters() {
        let (providers, systems) = inventory();
        let online = rank(
            &providers,
            &systems,
            &RankRequest::new().with_status(StatusFilter::Online),
        );
        assert_eq!(ids(&online), vec![vec!["s3"], vec!["s2", "s1"]]);

        let offline = rank(
            &providers,
            &systems,
            &RankRequest::new().with_status(StatusFilter::Offline),
        );
        assert_eq!(ids(&offline), vec![vec!["s4"]]);
    }

    #[test]
    fn test_queue_sort() {
        let (providers, systems) = inventory();
        let view = rank(&providers, &systems, &RankRequest::new().with_sort(SortKey::Queue));
        // Within groups: jobs 3 < 40, and 2hrs < 5hrs 30min. Across groups the
        // tops have different tags, so provider order is kept.
        assert_eq!(ids(&view), vec![vec!["s1", "s2"], vec!["s4", "s3"]]);
    }

    #[test]
    fn test_price_sort_across_groups() {
        let providers = vec![Provider::new("a", "A"), Provider::new("b", "B")];
        let systems = vec![
            System::new("a1", "A1", "a", "A").with_price(Price::per_shot(0.03)),
            System::new("a2", "A2", "a", "A"),
            System::new("b1", "B1", "b", "B").with_price(Price::per_shot(0.01)),
        ];
        let view = rank(&providers, &systems, &RankRequest::new().with_sort(SortKey::Price));
        assert_eq!(ids(&view), vec![vec!["b1"], vec!["a1", "a2"]]);
    }

    #[test]
    fn test_criteria_drop_emptied_providers() {
        let (providers, systems) = inventory();
        let request = RankRequest::new().with_criteria(FilterCriteria::new().with_min_qubits(100));
        let view = rank(&providers, &systems, &request);
        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].provider.display_name(), "IBM Quantum");
    }

    #[test]
    fn test_absent_qubits_sort_last() {
        let providers = vec![Provider::new("p", "P")];
        let mut unknown = System::new("u", "Unknown", "p", "P");
        unknown.qubits = None;
        let systems = vec![unknown, System::new("k", "Known", "p", "P").with_qubits(2)];
        let view = rank(&providers, &systems, &RankRequest::new());
        assert_eq!(ids(&view), vec![vec!["k", "u"]]);
    }

    #[test]
    fn test_stable_sort_survives_inconsistent_comparator() {
        // jobs(5) ~ time ~ jobs(3) but jobs(5) > jobs(3): not transitive.
        let mut queues = vec![
            Some(QueueDescriptor::jobs_remaining(5)),
            Some(QueueDescriptor::avg_time(60_000)),
            Some(QueueDescriptor::jobs_remaining(3)),
            None,
            Some(QueueDescriptor::avg_time(1_000)),
        ];
        stable_sort_by(&mut queues, |a, b| compare_queues(a.as_ref(), b.as_ref()));
        assert_eq!(queues.len(), 5);
        assert!(queues.last().unwrap().is_none());
    }

    #[test]
    fn test_incomparable_queues_stay_adjacent_in_input_order() {
        let providers = vec![Provider::new("p", "P")];
        let systems = vec![
            System::new("short", "Short", "p", "P").with_queue(QueueDescriptor::jobs_remaining(1)),
            System::new("jobs", "Jobs", "p", "P").with_queue(QueueDescriptor::jobs_remaining(5)),
            System::new("time", "Time", "p", "P").with_queue(QueueDescriptor::avg_time(60_000)),
            System::new("none", "None", "p", "P"),
        ];
        let request = RankRequest::new().with_sort(SortKey::Queue);
        let view = rank(&providers, &systems, &request);
        assert_eq!(ids(&view), vec![vec!["short", "jobs", "time", "none"]]);

        // The same pair, handed over the other way round, keeps that order too.
        let swapped = vec![systems[0].clone(), systems[2].clone(), systems[1].clone()];
        let view = rank(&providers, &swapped, &request);
        assert_eq!(ids(&view), vec![vec!["short", "time", "jobs"]]);
    }

    #[test]
    fn test_lanes_sort_inside_their_own_slots() {
        let providers = vec![Provider::new("p", "P")];
        let systems = vec![
            System::new("j5", "J5", "p", "P").with_queue(QueueDescriptor::jobs_remaining(5)),
            System::new("t60", "T60", "p", "P").with_queue(QueueDescriptor::avg_time(60_000)),
            System::new("none", "None", "p", "P"),
            System::new("j3", "J3", "p", "P").with_queue(QueueDescriptor::jobs_remaining(3)),
            System::new("t1", "T1", "p", "P").with_queue(QueueDescriptor::avg_time(1_000)),
        ];
        let request = RankRequest::new().with_sort(SortKey::Queue);
        let view = rank(&providers, &systems, &request);
        // Job counts keep slots 0 and 2, wait times slots 1 and 3.
        assert_eq!(ids(&view), vec![vec!["j3", "t1", "j5", "t60", "none"]]);

        let again: Vec<System> = view.systems().cloned().collect();
        assert_eq!(ids(&rank(&providers, &again, &request)), ids(&view));
    }

    #[test]
    fn test_price_lanes_follow_first_priced_field() {
        let providers = vec![Provider::new("p", "P")];
        let systems = vec![
            System::new("task", "Task", "p", "P").with_price(Price::per_task(0.5)),
            System::new("shot-hi", "ShotHi", "p", "P").with_price(Price::per_shot(0.9)),
            System::new("shot-lo", "ShotLo", "p", "P").with_price(Price::per_shot(0.1)),
            System::new("nan", "NaN", "p", "P").with_price(Price::per_shot(f64::NAN)),
            System::new("task-lo", "TaskLo", "p", "P").with_price(Price::per_task(0.2)),
        ];
        let request = RankRequest::new().with_sort(SortKey::Price);
        let view = rank(&providers, &systems, &request);
        assert_eq!(ids(&view), vec![vec!["task-lo", "shot-lo", "shot-hi", "nan", "task"]]);
    }

    #[test]
    fn test_stable_sort_keeps_ties_in_order() {
        let mut pairs = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        stable_sort_by(&mut pairs, |a, b| a.0.cmp(&b.0));
        assert_eq!(pairs, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn test_paginate() {
        let items = [1, 2, 3, 4, 5, 6, 7];
        assert_eq!(paginate(&items, 1, 3), &[1, 2, 3]);
        assert_eq!(paginate(&items, 3, 3), &[7]);
        assert!(paginate(&items, 4, 3).is_empty());
        assert!(paginate(&items, 0, 3).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
    }

    #[test]
    fn test_pages_hold_whole_provider_groups() {
        let (providers, systems) = inventory();
        let view = rank(&providers, &systems, &RankRequest::new());

        let first = paginate(&view.groups, 1, 1);
        let second = paginate(&view.groups, 2, 1);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].systems.len(), 2);
        assert_eq!(second[0].systems.len(), 2);
        assert_ne!(first[0].provider.display_name(), second[0].provider.display_name());
        assert!(paginate(&view.groups, 3, 1).is_empty());
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("Queue".parse::<SortKey>(), Ok(SortKey::Queue));
        assert!("speed".parse::<SortKey>().is_err());
    }
}
