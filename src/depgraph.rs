//! Directed dependency graph used for incremental invalidation.
//!
//! Edges point from a prerequisite to a dependent: `a/note.md → a/index.html`
//! reads "rebuilding `a/index.html` is required when `a/note.md` changes".
//! Emitters each produce a graph for the outputs they own; the pipeline merges
//! them and walks forward from changed inputs to find stale outputs.
//!
//! Storage is a pair of adjacency sets per node (outgoing and incoming), kept
//! in `BTreeMap`/`BTreeSet` so iteration order is deterministic regardless of
//! insertion order. Cycles and self-edges are legal; every traversal tracks a
//! visited set.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Adjacency<K> {
    outgoing: BTreeSet<K>,
    incoming: BTreeSet<K>,
}

impl<K> Default for Adjacency<K> {
    fn default() -> Self {
        Self {
            outgoing: BTreeSet::new(),
            incoming: BTreeSet::new(),
        }
    }
}

/// Directed graph over keys of type `K`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepGraph<K: Ord> {
    nodes: BTreeMap<K, Adjacency<K>>,
}

impl<K: Ord> Default for DepGraph<K> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

/// Flat, serializable form of a [`DepGraph`]. Stored in the build manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport<K> {
    pub nodes: Vec<K>,
    pub edges: Vec<(K, K)>,
}

impl<K: Ord + Clone> DepGraph<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|adj| adj.outgoing.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn has_node(&self, node: &K) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn add_node(&mut self, node: K) {
        self.nodes.entry(node).or_default();
    }

    /// Remove a node along with every edge touching it.
    pub fn remove_node(&mut self, node: &K) {
        let Some(adj) = self.nodes.remove(node) else {
            return;
        };
        for target in &adj.outgoing {
            if let Some(t) = self.nodes.get_mut(target) {
                t.incoming.remove(node);
            }
        }
        for source in &adj.incoming {
            if let Some(s) = self.nodes.get_mut(source) {
                s.outgoing.remove(node);
            }
        }
    }

    /// Insert `from → to`, creating either node if missing. Re-adding an
    /// existing edge leaves the graph unchanged.
    pub fn add_edge(&mut self, from: K, to: K) {
        self.nodes
            .entry(from.clone())
            .or_default()
            .outgoing
            .insert(to.clone());
        self.nodes.entry(to).or_default().incoming.insert(from);
    }

    /// Remove `from → to` if present. Nodes are kept.
    pub fn remove_edge(&mut self, from: &K, to: &K) {
        if let Some(adj) = self.nodes.get_mut(from) {
            adj.outgoing.remove(to);
        }
        if let Some(adj) = self.nodes.get_mut(to) {
            adj.incoming.remove(from);
        }
    }

    pub fn has_edge(&self, from: &K, to: &K) -> bool {
        self.nodes
            .get(from)
            .is_some_and(|adj| adj.outgoing.contains(to))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &K> {
        self.nodes.keys()
    }

    /// All edges as `(from, to)` pairs, sorted.
    pub fn edges(&self) -> impl Iterator<Item = (&K, &K)> {
        self.nodes
            .iter()
            .flat_map(|(from, adj)| adj.outgoing.iter().map(move |to| (from, to)))
    }

    pub fn out_neighbors(&self, node: &K) -> impl Iterator<Item = &K> {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.outgoing.iter())
    }

    pub fn in_neighbors(&self, node: &K) -> impl Iterator<Item = &K> {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.incoming.iter())
    }

    /// Union `other` into this graph. No edge is lost and identical edges
    /// are not duplicated, so merging is commutative and associative on the
    /// resulting edge set.
    pub fn merge(&mut self, other: &DepGraph<K>) {
        for node in other.nodes() {
            self.add_node(node.clone());
        }
        for (from, to) in other.edges() {
            self.add_edge(from.clone(), to.clone());
        }
    }

    /// Make `node`'s incoming edges match those in `other`.
    ///
    /// The node is created if missing. Incoming edges present in `other` are
    /// added; incoming edges absent from `other` are removed. Outgoing edges
    /// are untouched.
    pub fn update_incoming_edges_for_node(&mut self, other: &DepGraph<K>, node: &K) {
        self.add_node(node.clone());

        let wanted: BTreeSet<K> = other.in_neighbors(node).cloned().collect();
        let current: BTreeSet<K> = self.in_neighbors(node).cloned().collect();

        for source in wanted.difference(&current) {
            self.add_edge(source.clone(), node.clone());
        }
        for source in current.difference(&wanted) {
            self.remove_edge(source, node);
        }
    }

    /// Drop nodes with no edges at all. Returns the removed keys.
    pub fn remove_orphan_nodes(&mut self) -> BTreeSet<K> {
        let orphans: BTreeSet<K> = self
            .nodes
            .iter()
            .filter(|(_, adj)| adj.outgoing.is_empty() && adj.incoming.is_empty())
            .map(|(k, _)| k.clone())
            .collect();
        for orphan in &orphans {
            self.nodes.remove(orphan);
        }
        orphans
    }

    /// Every node reachable from `start` by following edges forward.
    ///
    /// `start` itself is only included when it is reachable through a cycle
    /// (including a self-edge).
    pub fn dependents(&self, start: &K) -> BTreeSet<K> {
        let mut visited = BTreeSet::new();
        let mut stack: Vec<&K> = self.out_neighbors(start).collect();
        while let Some(node) = stack.pop() {
            if visited.insert(node.clone()) {
                stack.extend(self.out_neighbors(node));
            }
        }
        visited
    }

    /// Union of [`dependents`](Self::dependents) over several starting nodes.
    pub fn dependents_of<'a>(&self, starts: impl IntoIterator<Item = &'a K>) -> BTreeSet<K>
    where
        K: 'a,
    {
        let mut all = BTreeSet::new();
        for start in starts {
            all.extend(self.dependents(start));
        }
        all
    }

    /// Nodes reachable from `start` (inclusive) that have no outgoing edges.
    pub fn leaf_nodes(&self, start: &K) -> BTreeSet<K> {
        let mut leaves = BTreeSet::new();
        if !self.has_node(start) {
            return leaves;
        }
        let mut visited = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            let mut outs = self.out_neighbors(node).peekable();
            if outs.peek().is_none() {
                leaves.insert(node.clone());
            }
            stack.extend(outs);
        }
        leaves
    }

    /// Ancestors of the leaves reachable from `start`, excluding the leaves.
    ///
    /// For `A → B → C` and `D → B`, the leaves of `A` are `{C}` and the
    /// result is `{A, B, D}`.
    pub fn leaf_node_ancestors(&self, start: &K) -> BTreeSet<K> {
        let leaves = self.leaf_nodes(start);
        let mut visited: BTreeSet<&K> = BTreeSet::new();
        let mut stack: Vec<&K> = leaves.iter().collect();
        let mut ancestors = BTreeSet::new();
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if !leaves.contains(node) {
                ancestors.insert(node.clone());
            }
            stack.extend(self.in_neighbors(node));
        }
        ancestors
    }

    pub fn export(&self) -> GraphExport<K> {
        GraphExport {
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(from, to)| (from.clone(), to.clone()))
                .collect(),
        }
    }
}

impl<K: Ord + Clone> From<GraphExport<K>> for DepGraph<K> {
    fn from(export: GraphExport<K>) -> Self {
        let mut graph = DepGraph::new();
        for node in export.nodes {
            graph.add_node(node);
        }
        for (from, to) in export.edges {
            graph.add_edge(from, to);
        }
        graph
    }
}
