//! Providers command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qcompare_core::compare::{ProviderSide, find_provider};
use qcompare_core::{DescriptionScope, Provider};

use super::common::{Session, print_json, system_line};

/// Execute the providers command.
pub async fn execute(session: &Session) -> Result<()> {
    let (mut providers, systems) = session.load_inventory().await?;
    providers.sort_by(|a, b| {
        a.display_name()
            .to_lowercase()
            .cmp(&b.display_name().to_lowercase())
    });

    if session.json {
        return print_json(&providers);
    }

    println!(
        "{} {} providers:\n",
        style("qcompare").cyan().bold(),
        providers.len()
    );
    for provider in &providers {
        let side = ProviderSide::new(provider, &systems);
        println!(
            "  {} {}",
            style(provider.to_string()).bold(),
            style(format!("({} systems, {} online)", side.systems.len(), side.online)).dim()
        );
        if let Some(summary) = provider.description_text(DescriptionScope::Summary) {
            println!("    {}", first_line(&summary));
        }
        if let Some(ref website) = provider.website {
            println!("    {}", style(website).underlined());
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ProviderDetail<'a> {
    #[serde(flatten)]
    side: &'a ProviderSide<'a>,
    description: Option<String>,
}

/// Execute the provider detail command.
pub async fn show(session: &Session, key: &str, scope: DescriptionScope) -> Result<()> {
    let (providers, systems) = session.load_inventory().await?;
    let provider: &Provider = find_provider(&providers, key)
        .with_context(|| format!("Provider {key} not found"))?;
    let side = ProviderSide::new(provider, &systems);
    let description = provider.description_text(scope);

    if session.json {
        return print_json(&ProviderDetail {
            side: &side,
            description,
        });
    }

    println!("{} {}", style("●").cyan().bold(), style(provider.to_string()).bold());
    if let Some(ref pid) = provider.pid {
        println!("  pid:      {pid}");
    }
    if let Some(ref website) = provider.website {
        println!("  Website:  {}", style(website).underlined());
    }
    if let Some(ref checked) = provider.last_checked {
        println!("  Checked:  {checked}");
    }
    if let Some(text) = description {
        println!();
        for line in text.lines() {
            println!("  {line}");
        }
    }

    println!(
        "\n  Systems ({} of {} online):",
        side.online,
        side.systems.len()
    );
    if side.systems.is_empty() {
        println!("    {}", style("none listed").dim());
    }
    for system in &side.systems {
        println!("    {}", system_line(system));
    }
    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("  Trapped ions.\nMore."), "Trapped ions.");
        assert_eq!(first_line(""), "");
    }
}
