use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAs {
    #[default]
    Permissive,
    Restrictive,
}

impl PolicyAs {
    pub fn as_sql(&self) -> &'static str {
        match self {
            PolicyAs::Permissive => "PERMISSIVE",
            PolicyAs::Restrictive => "RESTRICTIVE",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyFor {
    #[default]
    All,
    Select,
    Insert,
    Update,
    Delete,
}

impl PolicyFor {
    pub fn as_sql(&self) -> &'static str {
        match self {
            PolicyFor::All => "ALL",
            PolicyFor::Select => "SELECT",
            PolicyFor::Insert => "INSERT",
            PolicyFor::Update => "UPDATE",
            PolicyFor::Delete => "DELETE",
        }
    }

    /// Parses `pg_policy.polcmd`.
    pub fn from_pg_code(code: &str) -> Self {
        match code {
            "r" => PolicyFor::Select,
            "a" => PolicyFor::Insert,
            "w" => PolicyFor::Update,
            "d" => PolicyFor::Delete,
            _ => PolicyFor::All,
        }
    }
}

fn default_roles() -> Vec<String> {
    vec!["public".to_string()]
}

/// A row-level security policy on a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub schema: String,
    pub table: String,
    pub name: String,
    #[serde(default, rename = "as")]
    pub as_clause: PolicyAs,
    #[serde(default, rename = "for")]
    pub for_clause: PolicyFor,
    #[serde(default = "default_roles")]
    pub to: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub using: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_check: Option<String>,
}

impl Policy {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            name: name.into(),
            as_clause: PolicyAs::Permissive,
            for_clause: PolicyFor::All,
            to: default_roles(),
            using: None,
            with_check: None,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Policy {
            schema: self.schema.clone(),
            table: self.table.clone(),
            name: self.name.clone(),
        }
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }

    /// Role list with order and duplicates ignored.
    pub fn roles_sorted(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.to.iter().map(String::as_str).collect();
        roles.sort_unstable();
        roles.dedup();
        roles
    }
}
