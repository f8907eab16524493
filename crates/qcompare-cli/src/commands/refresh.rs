//! Refresh command implementation.

use anyhow::{Context, Result};
use console::style;

use super::common::{Session, print_json, spinner};

/// Execute the refresh command.
pub async fn execute(session: &Session, provider_id: &str) -> Result<()> {
    if session.uses_files() {
        anyhow::bail!("refresh needs the inventory service; drop --systems-file/--providers-file");
    }

    let client = session.api_client()?;
    let pb = spinner(format!("Refreshing systems of {provider_id}..."));
    let result = client.refresh_provider(provider_id).await;
    pb.finish_and_clear();

    let response =
        result.with_context(|| format!("Failed to refresh systems of {provider_id}"))?;

    if session.json {
        return print_json(&response);
    }

    println!(
        "{} Refreshed systems of {}",
        style("✓").green().bold(),
        style(provider_id).bold()
    );
    if let Some(message) = response.get("message").and_then(|m| m.as_str()) {
        println!("  {message}");
    }
    Ok(())
}
