use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How strictly two snapshots are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Offline diff between two declared snapshots; every change is emitted.
    #[default]
    Default,
    /// Live reconciliation against an introspected database. Expression text
    /// that the server rewrites (view bodies, generated columns, policy
    /// clauses) is compared by presence only, and removing the last primary
    /// key of a surviving table is refused.
    Push,
}

impl Mode {
    /// Whether the text of server-normalized expressions takes part in comparison.
    pub fn compares_expression_text(&self) -> bool {
        matches!(self, Mode::Default)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::Push => "push",
        }
    }

    /// Compares two optional expressions under this mode.
    pub fn expressions_differ(&self, old: Option<&str>, new: Option<&str>) -> bool {
        match (old, new) {
            (Some(a), Some(b)) => self.compares_expression_text() && a.trim() != b.trim(),
            (None, None) => false,
            _ => true,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Mode::Default),
            "push" => Ok(Mode::Push),
            other => Err(format!(
                "unknown diff mode '{}', expected 'default' or 'push'",
                other
            )),
        }
    }
}
