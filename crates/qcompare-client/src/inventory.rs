//! Inventory sources: the live API or local JSON exports.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use qcompare_core::compare::{find_provider, find_system};
use qcompare_core::{Provider, System};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Where providers and systems come from.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Short label for log and status lines.
    fn source(&self) -> String;

    async fn systems(&self) -> ClientResult<Vec<System>>;

    async fn providers(&self) -> ClientResult<Vec<Provider>>;

    /// Look up one system by slug, `bid` or id.
    async fn system(&self, key: &str) -> ClientResult<System> {
        let systems = self.systems().await?;
        find_system(&systems, key)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("System {key} not found")))
    }

    /// Look up one provider by `pid`, id or name.
    async fn provider(&self, key: &str) -> ClientResult<Provider> {
        let providers = self.providers().await?;
        find_provider(&providers, key)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Provider {key} not found")))
    }
}

#[async_trait]
impl Inventory for ApiClient {
    fn source(&self) -> String {
        self.base_url().to_string()
    }

    async fn systems(&self) -> ClientResult<Vec<System>> {
        self.list_systems().await
    }

    async fn providers(&self) -> ClientResult<Vec<Provider>> {
        self.list_providers().await
    }

    async fn system(&self, key: &str) -> ClientResult<System> {
        self.get_system(key).await
    }

    async fn provider(&self, key: &str) -> ClientResult<Provider> {
        self.get_provider(key).await
    }
}

/// Inventory read from JSON files shaped like the API responses.
///
/// A missing path yields an empty list for that half of the inventory.
#[derive(Debug, Clone, Default)]
pub struct FileInventory {
    systems_path: Option<PathBuf>,
    providers_path: Option<PathBuf>,
}

impl FileInventory {
    pub fn new(systems_path: Option<PathBuf>, providers_path: Option<PathBuf>) -> Self {
        Self {
            systems_path,
            providers_path,
        }
    }
}

#[async_trait]
impl Inventory for FileInventory {
    fn source(&self) -> String {
        let show = |p: &Option<PathBuf>| {
            p.as_deref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string())
        };
        format!(
            "files (systems: {}, providers: {})",
            show(&self.systems_path),
            show(&self.providers_path)
        )
    }

    async fn systems(&self) -> ClientResult<Vec<System>> {
        read_list(self.systems_path.as_deref()).await
    }

    async fn providers(&self) -> ClientResult<Vec<Provider>> {
        read_list(self.providers_path.as_deref()).await
    }
}

#[instrument]
async fn read_list<T: DeserializeOwned>(path: Option<&Path>) -> ClientResult<Vec<T>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let bytes = tokio::fs::read(path).await.map_err(|source| ClientError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let items: Vec<T> = serde_json::from_slice(&bytes)?;
    debug!(count = items.len(), "loaded inventory file");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(value: serde_json::Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    #[tokio::test]
    async fn test_file_inventory_reads_both_halves() {
        let systems = write_json(serde_json::json!([
            {"_id": "s1", "provider": {"provider_id": "p1", "provider_name": "IonQ"},
             "backend_name": "Aria 1", "bid": "ionq-aria-1", "status": "online", "qubits": 25}
        ]));
        let providers = write_json(serde_json::json!([
            {"_id": "p1", "pid": "native.ionq", "name": "IonQ"}
        ]));
        let inventory = FileInventory::new(
            Some(systems.path().to_path_buf()),
            Some(providers.path().to_path_buf()),
        );

        assert_eq!(inventory.systems().await.unwrap().len(), 1);
        assert_eq!(inventory.providers().await.unwrap().len(), 1);
        assert_eq!(inventory.system("aria-1").await.unwrap().id, "s1");
        assert_eq!(inventory.system("ionq-aria-1").await.unwrap().id, "s1");
        assert_eq!(
            inventory.provider("native.ionq").await.unwrap().display_name(),
            "IonQ"
        );
        assert!(matches!(
            inventory.system("kyoto").await,
            Err(ClientError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_path_is_empty() {
        let inventory = FileInventory::default();
        assert!(inventory.systems().await.unwrap().is_empty());
        assert!(inventory.source().contains("systems: -"));
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_path() {
        let inventory = FileInventory::new(Some(PathBuf::from("/nonexistent/systems.json")), None);
        let err = inventory.systems().await.unwrap_err();
        assert!(matches!(err, ClientError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/systems.json"));
    }

    #[tokio::test]
    async fn test_malformed_file_is_json_error() {
        let file = write_json(serde_json::json!({"not": "a list"}));
        let inventory = FileInventory::new(None, Some(file.path().to_path_buf()));
        assert!(matches!(
            inventory.providers().await,
            Err(ClientError::Json(_))
        ));
    }
}
