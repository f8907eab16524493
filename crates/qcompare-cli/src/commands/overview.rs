//! Overview command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use qcompare_core::{Overview, System, newest_first};

use super::common::{Session, print_json, status_badge};

const RECENT_SYSTEMS: usize = 5;

#[derive(Serialize)]
struct OverviewReport<'a> {
    #[serde(flatten)]
    totals: &'a Overview,
    recently_checked: Vec<&'a System>,
}

/// Execute the overview command.
pub async fn execute(session: &Session) -> Result<()> {
    let (providers, systems) = session.load_inventory().await?;
    let totals = Overview::from_inventory(&providers, &systems);
    let recent: Vec<&System> = newest_first(&systems)
        .into_iter()
        .take(RECENT_SYSTEMS)
        .collect();

    if session.json {
        return print_json(&OverviewReport {
            totals: &totals,
            recently_checked: recent,
        });
    }

    println!("{} Inventory overview\n", style("qcompare").cyan().bold());
    println!("  Providers:          {}", totals.providers);
    println!(
        "  Systems:            {} ({} online)",
        totals.systems,
        style(totals.online_systems).green()
    );
    println!(
        "  Largest online:     {}",
        totals
            .max_online_qubits
            .map_or_else(|| "N/A".to_string(), |q| format!("{q} qubits"))
    );
    println!("  Shortest wait:      {}", totals.min_online_wait());

    if !recent.is_empty() {
        println!("\n  Recently checked:");
        for system in recent {
            println!(
                "    {} {:<28} {}",
                status_badge(system.status.as_deref()),
                system.display_name(),
                style(system.last_checked.as_deref().unwrap_or("never")).dim()
            );
        }
    }
    Ok(())
}
