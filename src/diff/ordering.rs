//! Emission order of migration steps.
//!
//! Steps are collected into fixed phases; the only graph-based ordering is the
//! drop order of tables that reference each other.

use crate::ddl::ForeignKey;
use crate::diff::operations::MigrationStep;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;

/// Phases in execution order. Steps within a phase keep insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    CreateSchemas,
    RenameSchemas,
    Roles,
    EnumsCreate,
    EnumsMove,
    EnumsRename,
    EnumValues,
    Sequences,
    DropViews,
    RenameViews,
    DropPolicies,
    DropForeignKeys,
    DropConstraints,
    DropIndexes,
    DropTables,
    RenameTables,
    RenameColumns,
    RenameConstraints,
    ReplacePrimaryKeys,
    DropColumns,
    RecreateEnums,
    CreateTables,
    AddColumns,
    AlterColumns,
    AddConstraints,
    CreateIndexes,
    AddForeignKeys,
    CreateViews,
    Rls,
    Policies,
    DropEnums,
    DropSequences,
    DropRoles,
    DropSchemas,
}

#[derive(Debug, Default)]
pub struct Plan {
    phases: BTreeMap<Phase, Vec<MigrationStep>>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, phase: Phase, step: MigrationStep) {
        self.phases.entry(phase).or_default().push(step);
    }

    pub fn extend(&mut self, phase: Phase, steps: impl IntoIterator<Item = MigrationStep>) {
        self.phases.entry(phase).or_default().extend(steps);
    }

    pub fn is_empty(&self) -> bool {
        self.phases.values().all(Vec::is_empty)
    }

    pub fn into_steps(self) -> Vec<MigrationStep> {
        self.phases.into_values().flatten().collect()
    }
}

/// Drop order for a set of tables: a table is dropped before every table it
/// references. Foreign keys that close a reference cycle are returned
/// separately and must be dropped before any of the tables.
pub fn table_drop_order<'a>(
    tables: &[(String, String)],
    foreign_keys: impl IntoIterator<Item = &'a ForeignKey>,
) -> (Vec<(String, String)>, Vec<&'a ForeignKey>) {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..tables.len()).map(|i| graph.add_node(i)).collect();
    let position = |schema: &str, name: &str| {
        tables
            .iter()
            .position(|(s, n)| s == schema && n == name)
    };

    let mut edges: Vec<(usize, usize, &ForeignKey)> = Vec::new();
    for fk in foreign_keys {
        let (Some(from), Some(to)) = (
            position(&fk.schema, &fk.table),
            position(&fk.schema_to, &fk.table_to),
        ) else {
            continue;
        };
        if from != to {
            graph.add_edge(nodes[from], nodes[to], ());
            edges.push((from, to, fk));
        }
    }

    let mut component = vec![0usize; tables.len()];
    let mut cyclic = vec![false; tables.len()];
    for (id, scc) in tarjan_scc(&graph).into_iter().enumerate() {
        for node in &scc {
            component[graph[*node]] = id;
            cyclic[graph[*node]] = scc.len() > 1;
        }
    }

    let mut cycle_breakers = Vec::new();
    let mut acyclic: DiGraph<usize, ()> = DiGraph::new();
    let acyclic_nodes: Vec<NodeIndex> = (0..tables.len()).map(|i| acyclic.add_node(i)).collect();
    for (from, to, fk) in edges {
        if cyclic[from] && component[from] == component[to] {
            cycle_breakers.push(fk);
        } else {
            acyclic.add_edge(acyclic_nodes[from], acyclic_nodes[to], ());
        }
    }

    let order = match toposort(&acyclic, None) {
        Ok(sorted) => sorted.into_iter().map(|n| tables[acyclic[n]].clone()).collect(),
        // Unreachable once intra-component edges are removed; keep declaration order.
        Err(_) => tables.to_vec(),
    };
    (order, cycle_breakers)
}
