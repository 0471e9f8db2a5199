use crate::data::errors::{self, Result};
use crate::data::*;
use indexmap::IndexMap;
use itertools::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub address: String,
    pub distribution: String,
    pub observed: bool,
    /// visits across the whole batch
    pub count: usize,
    /// traces that start here
    pub entries: usize,
    /// traces that end here
    pub exits: usize,
}

/// Aggregated control-flow shape of a model over a batch of traces.
///
/// Nodes are addresses, edges are direct temporal successions within a
/// trace, both weighted by how often they occur across the batch. With
/// `use_address_base` (the default) repeated visits of one call site share a
/// node, so loops show up as cycles.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionGraph {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<(String, String), usize>,
    num_traces: usize,
    use_address_base: bool,
}

impl Default for ExecutionGraph {
    fn default() -> Self {
        ExecutionGraph::new(true)
    }
}

impl ExecutionGraph {
    pub fn new(use_address_base: bool) -> Self {
        ExecutionGraph {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            num_traces: 0,
            use_address_base,
        }
    }

    pub fn from_traces<R>(traces: &[Trace<R>], use_address_base: bool) -> Result<Self> {
        if traces.is_empty() {
            return errors::invalid_batch("no traces to build a graph from");
        }
        let mut g = ExecutionGraph::new(use_address_base);
        traces.iter().for_each(|t| g.add_trace(t));
        Ok(g)
    }

    fn key(&self, c: &RandomChoice) -> String {
        if self.use_address_base {
            c.address().base().to_string()
        } else {
            c.address().to_string()
        }
    }

    pub fn add_trace<R>(&mut self, trace: &Trace<R>) {
        self.num_traces += 1;
        let keys = trace.choices().iter().map(|c| self.key(c)).collect_vec();
        for (c, k) in trace.choices().iter().zip(&keys) {
            self.nodes
                .entry(k.clone())
                .or_insert_with(|| GraphNode {
                    address: k.clone(),
                    distribution: c.distribution().name().to_string(),
                    observed: c.is_observed(),
                    count: 0,
                    entries: 0,
                    exits: 0,
                })
                .count += 1;
        }
        if let Some(first) = keys.first() {
            if let Some(n) = self.nodes.get_mut(first) {
                n.entries += 1;
            }
        }
        if let Some(last) = keys.last() {
            if let Some(n) = self.nodes.get_mut(last) {
                n.exits += 1;
            }
        }
        for (from, to) in keys.into_iter().tuple_windows() {
            *self.edges.entry((from, to)).or_insert(0) += 1;
        }
    }

    pub fn num_traces(&self) -> usize {
        self.num_traces
    }
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
    pub fn node(&self, address: &str) -> Option<&GraphNode> {
        self.nodes.get(address)
    }
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.edges
            .iter()
            .map(|((from, to), n)| (from.as_str(), to.as_str(), *n))
    }
    pub fn edge_weight(&self, from: &str, to: &str) -> usize {
        self.edges
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }
    pub fn successors<'g>(&'g self, from: &'g str) -> impl Iterator<Item = (&'g str, usize)> + 'g {
        self.edges()
            .filter(move |(f, _, _)| *f == from)
            .map(|(_, to, n)| (to, n))
    }
    pub fn uses_address_base(&self) -> bool {
        self.use_address_base
    }
}

impl fmt::Display for ExecutionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ExecutionGraph({} traces, {} nodes, {} edges)",
            self.num_traces,
            self.node_count(),
            self.edge_count()
        )?;
        for (i, n) in self.nodes.values().enumerate() {
            writeln!(
                f,
                "  [{}] {}{} {} x{} (in {}, out {})",
                i,
                if n.observed { "observe " } else { "sample " },
                n.distribution,
                n.address,
                n.count,
                n.entries,
                n.exits
            )?;
        }
        for ((from, to), c) in &self.edges {
            let ix = |a: &str| self.nodes.get_index_of(a).unwrap_or(usize::MAX);
            writeln!(f, "  [{}] -> [{}] x{}", ix(from), ix(to), c)?;
        }
        Ok(())
    }
}
