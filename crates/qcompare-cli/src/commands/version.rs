//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - rank, filter and compare quantum systems",
        style("qcompare").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcompare-core    Inventory model, filtering and ranking");
    println!("  qcompare-client  REST and file inventory sources");
    println!("  qcompare-cli     Command-line interface");
}
