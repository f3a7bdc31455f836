//! Progress reporting for the live flows (introspection and push).

pub mod console;

pub use console::ConsoleReporter;

use std::time::Duration;

pub trait ProgressReporter: Send + Sync {
    /// A named stage begins, e.g. `"introspect"` or `"execute"`.
    fn start_stage(&self, name: &str);

    /// One unit of work inside the current stage finished.
    fn step(&self, current: usize, total: usize, label: &str);

    fn complete_stage(&self, name: &str, duration: Duration, items: Option<usize>);

    fn fail_stage(&self, name: &str, error: &anyhow::Error);
}

/// Reporter that prints nothing; used by tests and `--quiet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn start_stage(&self, _name: &str) {}
    fn step(&self, _current: usize, _total: usize, _label: &str) {}
    fn complete_stage(&self, _name: &str, _duration: Duration, _items: Option<usize>) {}
    fn fail_stage(&self, _name: &str, _error: &anyhow::Error) {}
}
