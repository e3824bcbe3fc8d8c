use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};

use crate::contract::ContractId;

/// Directed "appears before" relation over contract identities.
///
/// An edge `a -> b` exists when at least one linearization lists `a` ahead of
/// `b`. Edges are only ever added.
#[derive(Debug, Clone, Default)]
pub struct PrecedenceGraph {
    graph: DiGraphMap<ContractId, ()>,
}

impl PrecedenceGraph {
    pub fn new() -> Self {
        PrecedenceGraph::default()
    }

    pub fn from_chains<'a, I>(chains: I) -> Self
    where
        I: IntoIterator<Item = &'a [ContractId]>,
    {
        let mut graph = PrecedenceGraph::new();
        for chain in chains {
            graph.add_chain(chain);
        }
        graph
    }

    /// Orders every pair of the chain, not only neighbours.
    pub fn add_chain(&mut self, chain: &[ContractId]) {
        for (i, &before) in chain.iter().enumerate() {
            for &after in &chain[i + 1..] {
                if before != after {
                    self.graph.add_edge(before, after, ());
                }
            }
        }
    }

    pub fn contains_edge(&self, before: ContractId, after: ContractId) -> bool {
        self.graph.contains_edge(before, after)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Unordered pairs ordered both ways, as `(lower, higher)` sorted ascending.
    pub fn conflicting_pairs(&self) -> Vec<(ContractId, ContractId)> {
        let mut pairs: Vec<_> = self
            .graph
            .all_edges()
            .filter(|&(a, b, _)| a < b && self.graph.contains_edge(b, a))
            .map(|(a, b, _)| (a, b))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Strongly connected components with at least three members once both
    /// edges of every pair in `resolved` are dropped.
    pub fn cycle_components(&self, resolved: &[(ContractId, ContractId)]) -> Vec<Vec<ContractId>> {
        let mut graph = self.graph.clone();
        for &(a, b) in resolved {
            graph.remove_edge(a, b);
            graph.remove_edge(b, a);
        }

        let mut components: Vec<Vec<ContractId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() >= 3)
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        components.sort_unstable();
        components
    }
}
