//! Systems command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qcompare_client::Inventory;
use qcompare_core::compare::{normalize_name, system_slug};
use qcompare_core::{ProviderGroup, RankRequest, System, paginate, rank};

use super::common::{Session, print_json, price_text, qubits_text, status_label, system_line};
use crate::cli::SystemsArgs;

/// JSON shape of one page of the ranked listing.
#[derive(Serialize)]
struct SystemsPage<'a> {
    request: &'a RankRequest,
    page: usize,
    total_groups: usize,
    groups: &'a [ProviderGroup<'a>],
}

/// Build the ranking request from command-line flags.
pub fn rank_request(args: &SystemsArgs) -> Result<RankRequest> {
    let criteria = args
        .filters
        .to_form()
        .parse()
        .context("Invalid filter")?;

    let mut request = RankRequest::new()
        .with_status(args.status)
        .with_sort(args.sort);
    if !criteria.is_empty() {
        request = request.with_criteria(criteria);
    }
    Ok(request)
}

/// Execute the systems command.
pub async fn execute(session: &Session, args: &SystemsArgs) -> Result<()> {
    let request = rank_request(args)?;
    let (providers, systems) = session.load_inventory().await?;

    let view = rank(&providers, &systems, &request);
    let page_size = session.config.display.page_size;
    let page = paginate(&view.groups, args.page, page_size);

    if session.json {
        return print_json(&SystemsPage {
            request: &request,
            page: args.page,
            total_groups: view.groups.len(),
            groups: page,
        });
    }

    if view.is_empty() {
        println!("{} No systems match the current filters.", style("→").cyan().bold());
        return Ok(());
    }

    println!(
        "{} {} systems from {} providers ({} status, sorted by {})\n",
        style("qcompare").cyan().bold(),
        view.system_count(),
        view.groups.len(),
        request.status,
        request.sort
    );

    if page.is_empty() {
        println!("  Page {} is empty.", args.page);
        return Ok(());
    }

    for group in page {
        println!(
            "  {} {}",
            style(group.provider.to_string()).bold(),
            style(format!("({} systems)", group.systems.len())).dim()
        );
        for system in &group.systems {
            println!("    {}", system_line(system));
        }
        println!();
    }

    let pages = view.groups.len().div_ceil(page_size);
    if pages > 1 {
        println!(
            "  {}",
            style(format!("Page {} of {pages} (--page N for more)", args.page)).dim()
        );
    }
    Ok(())
}

/// Execute the system detail command.
pub async fn show(session: &Session, key: &str) -> Result<()> {
    let inventory = session.inventory()?;
    let system = inventory.system(key).await?;

    if session.json {
        return print_json(&system);
    }

    print_system(&system);
    Ok(())
}

fn print_system(system: &System) {
    println!(
        "{} {} {}",
        style("●").cyan().bold(),
        style(normalize_name(&system.backend_name)).bold(),
        style(format!("[{}]", system_slug(system))).dim()
    );
    println!("  Provider:   {}", system.provider.provider_name);
    if let Some(ref from) = system.provider.provider_from {
        println!("  Via:        {from}");
    }
    println!("  Family:     {}", system.family());
    println!("  Status:     {}", status_label(system.status.as_deref()));
    println!("  Qubits:     {}", qubits_text(system));
    if let Some(ref queue) = system.queue {
        println!("  {}", queue);
    }
    println!("  Price:      {}", price_text(system));

    if let Some(ref gates) = system.braket.gates_supported {
        println!("  Gates:      {}", gates.join(", "));
    }
    if let Some(ref gates) = system.ibm.basis_gates {
        println!("  Basis:      {}", gates.join(", "));
    }
    if let Some(clops) = system.ibm.clops_h {
        println!("  CLOPS:      {clops}");
    }
    if let Some(max) = system.ibm.max_shots {
        println!("  Max shots:  {max}");
    }
    if let Some(range) = system.braket.shots_range {
        println!("  Shots:      {} - {}", range.min, range.max);
    }
    if let Some(degraded) = system.ionq.degraded {
        println!("  Degraded:   {}", if degraded { "yes" } else { "no" });
    }
    for (label, value) in system.rigetti.metrics() {
        println!("  {label}: {value}");
    }
    if let Some(ref checked) = system.last_checked {
        println!("  {}", style(format!("Last checked {checked}")).dim());
    }
}
