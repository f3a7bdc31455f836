use super::{RenameResolver, Renameable, Resolution};
use crate::error::DiffError;
use std::collections::BTreeMap;
use tracing::debug;

/// Conservative resolver: every candidate is a drop or a create.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenames;

impl<T> RenameResolver<T> for NoRenames {
    fn resolve(&self, only_in_from: Vec<T>, only_in_to: Vec<T>) -> Resolution<T> {
        Resolution::unmatched(only_in_from, only_in_to)
    }
}

/// Matches entities against caller-confirmed `"<old>-><new>"` declarations,
/// e.g. `public.users->public.users1` or `public.users1.id->public.users1.id1`.
#[derive(Debug, Clone, Default)]
pub struct DeclaredRenames {
    renames: BTreeMap<String, String>,
}

impl DeclaredRenames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<I, S>(declarations: I) -> Result<Self, DiffError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut renames = BTreeMap::new();
        for declaration in declarations {
            let declaration = declaration.as_ref();
            let (from, to) = declaration
                .split_once("->")
                .map(|(from, to)| (from.trim(), to.trim()))
                .filter(|(from, to)| !from.is_empty() && !to.is_empty() && !to.contains("->"))
                .ok_or_else(|| DiffError::InvalidRename(declaration.to_string()))?;
            renames.insert(from.to_string(), to.to_string());
        }
        Ok(Self { renames })
    }

    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(from.into(), to.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn target_of(&self, from: &str) -> Option<&str> {
        self.renames.get(from).map(String::as_str)
    }
}

impl<T: Renameable> RenameResolver<T> for DeclaredRenames {
    fn resolve(&self, only_in_from: Vec<T>, mut only_in_to: Vec<T>) -> Resolution<T> {
        let mut matched = Vec::new();
        let mut unmatched_from = Vec::new();

        for from in only_in_from {
            let from_key = from.rename_key();
            let position = self
                .target_of(&from_key)
                .and_then(|target| only_in_to.iter().position(|to| to.rename_key() == target));
            match position {
                Some(pos) => {
                    let to = only_in_to.remove(pos);
                    debug!("Resolved {} rename {} -> {}", T::KIND, from_key, to.rename_key());
                    matched.push((from, to));
                }
                None => unmatched_from.push(from),
            }
        }

        Resolution {
            matched,
            unmatched_from,
            unmatched_to: only_in_to,
        }
    }
}
