//! Job management commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde_json::Value;
use tracing::warn;

use qcompare_client::{ApiClient, ApiKeys, JobRequest, JobSummary};

use super::common::{Session, print_json, spinner};
use crate::cli::JobsAction;

/// Execute a jobs subcommand.
pub async fn execute(session: &Session, action: JobsAction) -> Result<()> {
    let client = session.api_client()?;
    let keys = &session.config.api_keys;
    if keys.is_empty() {
        warn!("no api_keys configured; the service will likely reject job requests");
    }

    match action {
        JobsAction::List => list(session, &client, keys).await,
        JobsAction::Show { id } => {
            let job = client.get_job(id, keys).await?;
            print_value(session, &job)
        }
        JobsAction::Results { id } => {
            let pb = spinner(format!("Fetching results of {id}..."));
            let results = client.get_job_results(id, keys).await;
            pb.finish_and_clear();
            print_value(session, &results?)
        }
        JobsAction::Submit {
            circuit,
            target,
            qubits,
            shots,
            name,
            provider,
        } => {
            let mut job = JobRequest::new(provider, target, qubits, load_circuit(&circuit).await?)
                .with_shots(shots);
            if let Some(name) = name {
                job = job.with_name(name);
            }
            client.create_job(&job, keys).await?;
            println!(
                "{} Submitted job to {} ({} shots)",
                style("✓").green().bold(),
                style(&job.target).yellow(),
                job.shots
            );
            Ok(())
        }
        JobsAction::Delete { id } => {
            client.delete_job(id, keys).await?;
            println!("{} Deleted job {id}", style("✓").green().bold());
            Ok(())
        }
    }
}

async fn list(session: &Session, client: &ApiClient, keys: &ApiKeys) -> Result<()> {
    let jobs = client.list_jobs(keys).await?;
    let summaries: Vec<JobSummary> = jobs.iter().filter_map(JobSummary::from_value).collect();

    if session.json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!("{} No jobs found.", style("→").cyan().bold());
        return Ok(());
    }
    for job in &summaries {
        println!(
            "  {}  {:<12} {:<20} {}",
            style(&job.id).bold(),
            job.status.as_deref().unwrap_or("-"),
            job.target.as_deref().unwrap_or("-"),
            style(job.name.as_deref().unwrap_or("")).dim()
        );
    }
    Ok(())
}

fn print_value(session: &Session, value: &Value) -> Result<()> {
    if session.json {
        return print_json(value);
    }
    let text = serde_yaml_ng::to_string(value).context("Failed to render response")?;
    print!("{text}");
    Ok(())
}

/// Read a circuit: a JSON array of gate operations.
pub async fn load_circuit(path: &Path) -> Result<Value> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read circuit file: {}", path.display()))?;
    let circuit: Value = serde_json::from_str(&source)
        .with_context(|| format!("Circuit file is not valid JSON: {}", path.display()))?;
    if !circuit.is_array() {
        anyhow::bail!("Circuit must be a JSON array of gates: {}", path.display());
    }
    Ok(circuit)
}
