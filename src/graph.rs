//! Fact Graph - In-memory collection of emitted entries
//!
//! A [`FactSink`] that keeps every entry in emission order and indexes them
//! by subject and target, for summaries and for inspecting the output of an
//! extraction without re-parsing text.

use std::collections::HashMap;
use crate::Result;
use crate::emitter::FactSink;
use crate::schema::{EdgeKind, FactName, node_kind};
use crate::vname::VName;

/// A `(source, name, value)` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub source: VName,
    pub name: FactName,
    pub value: String,
}

/// A `(source, kind, target)` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: VName,
    pub kind: EdgeKind,
    pub target: VName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Fact(Fact),
    Edge(Edge),
}

/// In-memory fact graph.
#[derive(Debug, Default)]
pub struct FactGraph {
    /// All entries in emission order
    entries: Vec<Entry>,
    /// Fact entries per subject
    facts_by_source: HashMap<VName, Vec<usize>>,
    /// Edge entries per source (outgoing edges)
    edges_from: HashMap<VName, Vec<usize>>,
    /// Edge entries per target (incoming edges)
    edges_to: HashMap<VName, Vec<usize>>,
}

impl FactGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fact(&mut self, fact: Fact) {
        let index = self.entries.len();
        self.facts_by_source
            .entry(fact.source.clone())
            .or_default()
            .push(index);
        self.entries.push(Entry::Fact(fact));
    }

    pub fn add_edge(&mut self, edge: Edge) {
        let index = self.entries.len();
        self.edges_from
            .entry(edge.source.clone())
            .or_default()
            .push(index);
        self.edges_to
            .entry(edge.target.clone())
            .or_default()
            .push(index);
        self.entries.push(Entry::Edge(edge));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Fact(fact) => Some(fact),
            Entry::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Edge(edge) => Some(edge),
            Entry::Fact(_) => None,
        })
    }

    /// All facts about a node, in emission order
    pub fn facts_of(&self, vname: &VName) -> Vec<&Fact> {
        self.collect_facts(self.facts_by_source.get(vname))
    }

    /// First value of a named fact about a node
    pub fn fact_value(&self, vname: &VName, name: FactName) -> Option<&str> {
        self.facts_of(vname)
            .into_iter()
            .find(|fact| fact.name == name)
            .map(|fact| fact.value.as_str())
    }

    /// Outgoing edges of a node
    pub fn edges_from(&self, vname: &VName) -> Vec<&Edge> {
        self.collect_edges(self.edges_from.get(vname))
    }

    /// Incoming edges of a node
    pub fn edges_to(&self, vname: &VName) -> Vec<&Edge> {
        self.collect_edges(self.edges_to.get(vname))
    }

    /// Outgoing edges of a specific kind
    pub fn edges_from_by_kind(&self, vname: &VName, kind: EdgeKind) -> Vec<&Edge> {
        self.edges_from(vname)
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }

    /// Incoming edges of a specific kind
    pub fn edges_to_by_kind(&self, vname: &VName, kind: EdgeKind) -> Vec<&Edge> {
        self.edges_to(vname)
            .into_iter()
            .filter(|e| e.kind == kind)
            .collect()
    }

    pub fn edges_by_kind(&self, kind: EdgeKind) -> Vec<&Edge> {
        self.edges().filter(|e| e.kind == kind).collect()
    }

    /// Distinct nodes whose `/kythe/node/kind` fact equals `kind`, in emission order
    pub fn nodes_of_kind(&self, kind: &str) -> Vec<&VName> {
        let mut nodes: Vec<&VName> = Vec::new();
        for fact in self.facts() {
            if fact.name == FactName::NodeKind && fact.value == kind && !nodes.contains(&&fact.source) {
                nodes.push(&fact.source);
            }
        }
        nodes
    }

    /// Find a declared node by its rendered signature
    pub fn find_node(&self, signature: &str) -> Option<&VName> {
        self.facts()
            .filter(|fact| fact.name == FactName::NodeKind)
            .map(|fact| &fact.source)
            .find(|vname| vname.signature.to_string() == signature)
    }

    /// Literal text of an anchor node
    pub fn anchor_text(&self, anchor: &VName) -> Option<&str> {
        self.fact_value(anchor, FactName::Text)
    }

    fn collect_facts(&self, indices: Option<&Vec<usize>>) -> Vec<&Fact> {
        indices
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&i| match &self.entries[i] {
                        Entry::Fact(fact) => Some(fact),
                        Entry::Edge(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn collect_edges(&self, indices: Option<&Vec<usize>>) -> Vec<&Edge> {
        indices
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|&i| match &self.entries[i] {
                        Entry::Edge(edge) => Some(edge),
                        Entry::Fact(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get statistics about the graph
    pub fn stats(&self) -> GraphStats {
        let edges_by_kind = EdgeKind::all()
            .iter()
            .map(|kind| (*kind, self.edges().filter(|e| e.kind == *kind).count()))
            .collect();

        GraphStats {
            total_facts: self.facts().count(),
            total_edges: self.edges().count(),
            declarations: self.nodes_of_kind(node_kind::RECORD).len()
                + self.nodes_of_kind(node_kind::VARIABLE).len(),
            anchors: self.nodes_of_kind(node_kind::ANCHOR).len(),
            edges_by_kind,
        }
    }
}

impl FactSink for FactGraph {
    fn emit_fact(&mut self, source: &VName, name: FactName, value: &str) -> Result<()> {
        self.add_fact(Fact {
            source: source.clone(),
            name,
            value: value.to_string(),
        });
        Ok(())
    }

    fn emit_edge(&mut self, source: &VName, kind: EdgeKind, target: &VName) -> Result<()> {
        self.add_edge(Edge {
            source: source.clone(),
            kind,
            target: target.clone(),
        });
        Ok(())
    }
}

/// Statistics about a fact graph
#[derive(Debug, Clone)]
pub struct GraphStats {
    pub total_facts: usize,
    pub total_edges: usize,
    pub declarations: usize,
    pub anchors: usize,
    pub edges_by_kind: Vec<(EdgeKind, usize)>,
}

impl GraphStats {
    pub fn edges_of(&self, kind: EdgeKind) -> usize {
        self.edges_by_kind
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fact Graph Statistics:")?;
        writeln!(f, "  Facts: {}", self.total_facts)?;
        writeln!(f, "  Declarations: {}", self.declarations)?;
        writeln!(f, "  Anchors: {}", self.anchors)?;
        writeln!(f, "  Edges: {}", self.total_edges)?;
        for (kind, count) in &self.edges_by_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        Ok(())
    }
}
