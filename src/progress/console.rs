use super::ProgressReporter;
use console::style;
use std::time::Duration;

const LABEL_WIDTH: usize = 72;

/// Prints stage headers and per-statement progress to stderr.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn start_stage(&self, name: &str) {
        eprintln!("{} {}", style("→").cyan(), name);
    }

    fn step(&self, current: usize, total: usize, label: &str) {
        if self.verbose {
            eprintln!(
                "  {} {}",
                style(format!("[{}/{}]", current, total)).dim(),
                shorten_label(label)
            );
        } else if total > 1 && (current == total || current % 10 == 0) {
            eprintln!("  {}/{}", current, total);
        }
    }

    fn complete_stage(&self, name: &str, duration: Duration, items: Option<usize>) {
        let items = items.map(|n| format!(", {} item(s)", n)).unwrap_or_default();
        eprintln!(
            "{} {} ({}{})",
            style("✓").green(),
            name,
            style(format_elapsed(duration)).dim(),
            items
        );
    }

    fn fail_stage(&self, name: &str, error: &anyhow::Error) {
        eprintln!(
            "{} {} failed: {}",
            style("✗").red(),
            name,
            style(error.to_string()).red()
        );
    }
}

/// First line of a statement, cut to a terminal-friendly width.
fn shorten_label(label: &str) -> String {
    let first = label.lines().next().unwrap_or_default();
    let mut short: String = first.chars().take(LABEL_WIDTH).collect();
    if short.len() < first.len() || label.contains('\n') {
        short.push_str(" …");
    }
    short
}

fn format_elapsed(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.1}s", d.as_secs_f64())
    }
}
