//! Side-by-side comparison commands.

use anyhow::{Context, Result};
use console::style;
use serde_json::Value;

use qcompare_core::compare::{
    ComparisonRow, find_provider, find_system, normalize_name, system_slug, versus_slug,
};
use qcompare_core::{Provider, ProviderComparison, SystemComparison, parse_versus};

use super::common::{Session, print_json, system_line};

const LABEL_WIDTH: usize = 22;
const COLUMN_WIDTH: usize = 30;

/// Execute the compare-systems command.
pub async fn systems(session: &Session, versus: &str, only_differences: bool) -> Result<()> {
    let (left_key, right_key) = parse_versus(versus)?;
    let (_, systems) = session.load_inventory().await?;

    let left = find_system(&systems, &left_key)
        .with_context(|| format!("System {left_key} not found"))?;
    let right = find_system(&systems, &right_key)
        .with_context(|| format!("System {right_key} not found"))?;
    let comparison = SystemComparison::new(left, right);

    if session.json {
        return print_json(&comparison);
    }

    println!(
        "{} {}\n",
        style("Comparing").cyan().bold(),
        versus_slug(&system_slug(left), &system_slug(right))
    );
    print_header(
        &normalize_name(&left.backend_name),
        &normalize_name(&right.backend_name),
    );
    let rows: Vec<&ComparisonRow> = if only_differences {
        comparison.differences().collect()
    } else {
        comparison.rows.iter().collect()
    };
    for row in rows {
        print_row(&row.label, row.left.as_deref(), row.right.as_deref());
    }
    Ok(())
}

/// Execute the compare-providers command.
pub async fn providers(session: &Session, versus: &str) -> Result<()> {
    let (left_key, right_key) = parse_versus(versus)?;
    let (providers, systems) = session.load_inventory().await?;

    let left = find_provider(&providers, &left_key)
        .with_context(|| format!("Provider {left_key} not found"))?;
    let right = find_provider(&providers, &right_key)
        .with_context(|| format!("Provider {right_key} not found"))?;
    let comparison = ProviderComparison::new(left, right, &systems);

    if session.json {
        return print_json(&comparison);
    }

    print_header(left.display_name(), right.display_name());
    let (l, r) = (attribute_values(left), attribute_values(right));
    for attr in &comparison.attributes {
        print_row(attr, lookup(&l, attr), lookup(&r, attr));
    }

    for side in [&comparison.left, &comparison.right] {
        println!(
            "\n  {} {}",
            style(side.provider.display_name()).bold(),
            style(format!("({} of {} systems online)", side.online, side.systems.len())).dim()
        );
        for system in &side.systems {
            println!("    {}", system_line(system));
        }
    }
    Ok(())
}

fn print_header(left: &str, right: &str) {
    println!(
        "  {:<LABEL_WIDTH$} {:<COLUMN_WIDTH$} {}",
        "",
        style(left).cyan().bold(),
        style(right).cyan().bold()
    );
}

fn print_row(label: &str, left: Option<&str>, right: Option<&str>) {
    let (l, r) = (left.unwrap_or("-"), right.unwrap_or("-"));
    let label = if left == right {
        style(label).dim()
    } else {
        style(label).yellow()
    };
    println!("  {label:<LABEL_WIDTH$} {:<COLUMN_WIDTH$} {r}", truncate(l, COLUMN_WIDTH));
}

/// Render each populated provider attribute as a short string.
fn attribute_values(provider: &Provider) -> Vec<(String, String)> {
    let Ok(Value::Object(map)) = serde_json::to_value(provider) else {
        return Vec::new();
    };
    map.into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let text = match v {
                Value::String(s) => s,
                Value::Array(items) => format!("{} entries", items.len()),
                Value::Object(_) if k == "description" => "present".to_string(),
                other => other.to_string(),
            };
            (k, text)
        })
        .collect()
}

fn lookup<'a>(values: &'a [(String, String)], key: &str) -> Option<&'a str> {
    values
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_attribute_values_summarise_lists() {
        let provider = Provider::new("p1", "IonQ").with_backends(["s1", "s2"]);
        let values = attribute_values(&provider);
        assert_eq!(lookup(&values, "name"), Some("IonQ"));
        assert_eq!(lookup(&values, "backends_ids"), Some("2 entries"));
        assert_eq!(lookup(&values, "website"), None);
    }
}
