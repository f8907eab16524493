//! CLI command implementations.

pub mod common;
pub mod compare;
pub mod jobs;
pub mod overview;
pub mod providers;
pub mod refresh;
pub mod systems;
pub mod version;

pub use common::Session;
