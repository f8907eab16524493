//! Inventory client for qcompare.
//!
//! Fetches providers and systems from the inventory REST service
//! ([`ApiClient`]) or from local JSON exports ([`FileInventory`]), both behind
//! the [`Inventory`] trait. The API client also drives system refreshes and
//! the job endpoints.
//!
//! ```ignore
//! use qcompare_client::{ApiClient, Inventory};
//!
//! let client = ApiClient::with_base_url("http://localhost:8000", None)?;
//! let systems = client.systems().await?;
//! ```

pub mod api;
pub mod error;
pub mod inventory;
pub mod jobs;

pub use api::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, Query};
pub use error::{ClientError, ClientResult};
pub use inventory::{FileInventory, Inventory};
pub use jobs::{ApiKeys, JobRequest, JobSummary};
