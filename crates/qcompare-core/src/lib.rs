//! qcompare core: ranking, filtering and comparison of quantum systems
//!
//! This crate holds the inventory model and the pure functions that turn a
//! list of providers and their systems into a grouped, filtered and sorted
//! view.
//!
//! # Overview
//!
//! - [`System`] and [`Provider`] records, deserialized from the inventory API
//! - [`QueueDescriptor`] and [`Price`] with their comparators
//! - Status classification ([`classify`]) and the online/offline [`StatusFilter`]
//! - Detailed bounds in [`FilterCriteria`], parsed from a [`FilterForm`]
//! - The [`rank`] pipeline producing a [`RankedView`]
//! - Side-by-side views in [`compare`] and headline numbers in [`Overview`]
//!
//! # Example
//!
//! ```
//! use qcompare_core::{
//!     FilterCriteria, Provider, QueueDescriptor, RankRequest, SortKey, StatusFilter, System,
//!     rank,
//! };
//!
//! let providers = vec![Provider::new("p1", "IonQ"), Provider::new("p2", "IBM Quantum")];
//! let systems = vec![
//!     System::new("a", "Aria 1", "p1", "IonQ")
//!         .with_status("available")
//!         .with_qubits(25)
//!         .with_queue(QueueDescriptor::avg_time_text("2hrs 5min")),
//!     System::new("b", "Kyoto", "p2", "IBM Quantum")
//!         .with_status("online")
//!         .with_qubits(127),
//! ];
//!
//! let request = RankRequest::new()
//!     .with_status(StatusFilter::Online)
//!     .with_criteria(FilterCriteria::new().with_min_qubits(20))
//!     .with_sort(SortKey::Qubits);
//!
//! let view = rank(&providers, &systems, &request);
//! assert_eq!(view.groups[0].provider.display_name(), "IBM Quantum");
//! assert_eq!(view.system_count(), 2);
//! ```
//!
//! Ranking never fails. Absent or malformed fields make a system fail a
//! bound or sort last; only user input parsing returns [`CoreError`].

pub mod compare;
pub mod duration;
pub mod error;
pub mod filter;
pub mod overview;
pub mod price;
pub mod provider;
pub mod queue;
pub mod ranking;
pub mod status;
pub mod system;

pub use compare::{ProviderComparison, SystemComparison, parse_versus};
pub use duration::{format_duration, format_duration_str, parse_duration};
pub use error::{CoreError, CoreResult};
pub use filter::{FilterCriteria, FilterForm};
pub use overview::{Overview, newest_first};
pub use price::{Price, PriceField, compare_prices};
pub use provider::{Description, DescriptionScope, Provider, ThirdParty};
pub use queue::{QueueDescriptor, QueueKind, compare_queues};
pub use ranking::{ProviderGroup, RankRequest, RankedView, SortKey, paginate, rank};
pub use status::{StatusCategory, StatusFilter, classify, is_online};
pub use system::{ProviderFamily, ProviderRef, System};
