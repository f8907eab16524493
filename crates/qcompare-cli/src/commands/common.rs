//! Shared helpers for CLI commands.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use console::{StyledObject, style};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

use qcompare_client::{ApiClient, FileInventory, Inventory};
use qcompare_core::{Provider, StatusCategory, System, classify};

use crate::config::Config;

/// Everything a command needs besides its own arguments.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub json: bool,
    systems_file: Option<PathBuf>,
    providers_file: Option<PathBuf>,
}

impl Session {
    pub fn new(
        config: Config,
        json: bool,
        systems_file: Option<PathBuf>,
        providers_file: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            json,
            systems_file,
            providers_file,
        }
    }

    /// `true` when either half of the inventory comes from a local file.
    pub fn uses_files(&self) -> bool {
        self.systems_file.is_some() || self.providers_file.is_some()
    }

    /// Client for the configured inventory service.
    pub fn api_client(&self) -> Result<ApiClient> {
        let api = &self.config.api;
        ApiClient::with_timeout(api.url.clone(), api.token.clone(), api.timeout())
            .with_context(|| format!("Failed to create API client for {}", api.url))
    }

    /// Inventory source: local files when given, the API otherwise.
    pub fn inventory(&self) -> Result<Box<dyn Inventory>> {
        if self.uses_files() {
            return Ok(Box::new(FileInventory::new(
                self.systems_file.clone(),
                self.providers_file.clone(),
            )));
        }
        Ok(Box::new(self.api_client()?))
    }

    /// Fetch providers and systems concurrently.
    pub async fn load_inventory(&self) -> Result<(Vec<Provider>, Vec<System>)> {
        let inventory = self.inventory()?;
        let source = inventory.source();
        let pb = spinner(format!("Fetching inventory from {source}"));

        let fetched = tokio::try_join!(inventory.providers(), inventory.systems());
        pb.finish_and_clear();

        let (providers, systems) =
            fetched.with_context(|| format!("Failed to load inventory from {source}"))?;
        debug!(
            providers = providers.len(),
            systems = systems.len(),
            "inventory loaded"
        );
        Ok((providers, systems))
    }
}

/// Spinner on stderr for a network round trip.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

/// Coloured marker for a raw status string.
pub fn status_badge(status: Option<&str>) -> StyledObject<&'static str> {
    match classify(status) {
        StatusCategory::Available => style("●").green(),
        StatusCategory::Offline => style("○").red(),
        StatusCategory::Calibrating => style("◐").yellow(),
        StatusCategory::Other => style("●").yellow(),
        StatusCategory::Unknown => style("?").dim(),
    }
}

/// Status text with its category colour.
pub fn status_label(status: Option<&str>) -> String {
    let text = status.filter(|s| !s.is_empty()).unwrap_or("unknown");
    let styled = match classify(status) {
        StatusCategory::Available => style(text).green(),
        StatusCategory::Offline => style(text).red(),
        StatusCategory::Calibrating | StatusCategory::Other => style(text).yellow(),
        StatusCategory::Unknown => style(text).dim(),
    };
    styled.to_string()
}

pub fn qubits_text(system: &System) -> String {
    system
        .qubits
        .map_or_else(|| "? qubits".to_string(), |q| format!("{q} qubits"))
}

pub fn queue_text(system: &System) -> String {
    system
        .queue
        .as_ref()
        .map_or_else(|| "Queue: N/A".to_string(), ToString::to_string)
}

pub fn price_text(system: &System) -> String {
    system
        .price
        .as_ref()
        .map_or_else(|| "N/A".to_string(), ToString::to_string)
}

/// One-line summary used by listings.
pub fn system_line(system: &System) -> String {
    format!(
        "{} {:<28} {:>12}   {:<28} {}",
        status_badge(system.status.as_deref()),
        system.display_name(),
        qubits_text(system),
        queue_text(system),
        price_text(system)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcompare_core::{Price, QueueDescriptor};

    fn system() -> System {
        System::new("s1", "Aria 1", "p1", "IonQ")
    }

    #[test]
    fn test_texts_for_bare_system() {
        let s = system();
        assert_eq!(qubits_text(&s), "? qubits");
        assert_eq!(queue_text(&s), "Queue: N/A");
        assert_eq!(price_text(&s), "N/A");
    }

    #[test]
    fn test_system_line_includes_fields() {
        console::set_colors_enabled(false);
        let s = system()
            .with_status("online")
            .with_qubits(25)
            .with_queue(QueueDescriptor::jobs_remaining(12))
            .with_price(Price::per_shot(0.03));
        let line = system_line(&s);
        assert!(line.starts_with("● "));
        assert!(line.contains("25 qubits"));
        assert!(line.contains("Queued Jobs: 12"));
        assert!(line.contains("$0.03/shot"));
    }

    #[test]
    fn test_status_label_defaults_to_unknown() {
        console::set_colors_enabled(false);
        assert_eq!(status_label(None), "unknown");
        assert_eq!(status_label(Some("calibrating")), "calibrating");
    }

    #[test]
    fn test_file_session_skips_api() {
        let session = Session::new(
            Config::default(),
            false,
            Some(PathBuf::from("systems.json")),
            None,
        );
        assert!(session.uses_files());
        let inventory = session.inventory().unwrap();
        assert!(inventory.source().starts_with("files"));
    }
}
