//! Terminal rendering of plans and hints.

use console::style;
use pgdelta::diff::DiffResult;
use pgdelta::hints::Hint;
use pgdelta::render::{Safety, SqlRenderer};

pub fn print_plan_header(result: &DiffResult) {
    let total = result.steps.len();
    let destructive = result.steps.iter().filter(|s| s.is_destructive()).count();

    if destructive > 0 {
        println!(
            "\n📋 {} change{} ({} safe, {} destructive)",
            total,
            if total == 1 { "" } else { "s" },
            total - destructive,
            destructive,
        );
    } else {
        println!("\n📋 {} change{}", total, if total == 1 { "" } else { "s" });
    }
}

/// One line per step.
pub fn print_concise_plan(result: &DiffResult) {
    for step in &result.steps {
        let icon = if step.is_destructive() { "  ⚠" } else { "  ✓" };
        println!("{} {}", icon, step.describe());
    }
}

/// Every statement, labelled with its safety.
pub fn print_statements(result: &DiffResult) {
    for (i, rendered) in result.rendered().iter().enumerate() {
        let label = match rendered.safety {
            Safety::Safe => style("SAFE").green(),
            Safety::Destructive => style("DESTRUCTIVE").red(),
        };
        println!("\n{} {}:", style(format!("Step {}", i + 1)).bold(), label);
        println!("{}", rendered.sql);
    }
}

pub fn print_hints(hints: &[Hint]) {
    if hints.is_empty() {
        return;
    }
    println!(
        "\n{} {} hint{}:",
        style("💡").yellow(),
        hints.len(),
        if hints.len() == 1 { "" } else { "s" }
    );
    for hint in hints {
        println!("   {} {}", style("•").yellow(), hint.step);
        println!("     {}", style(&hint.message).dim());
    }
}
