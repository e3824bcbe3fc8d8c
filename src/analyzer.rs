use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::artifact::{CompilerOutputArtifact, ExcludePatterns};
use crate::contract::ContractId;
use crate::precedence_graph::PrecedenceGraph;

/// Relative order of a conflicting pair inside one linearization.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// `a` is listed before `b`.
    #[serde(rename = ">")]
    Before,
    /// `a` is listed after `b`.
    #[serde(rename = "<")]
    After,
}

impl Direction {
    pub fn symbol(self) -> &'static str {
        match self {
            Direction::Before => ">",
            Direction::After => "<",
        }
    }
}

/// One linearization that orders both contracts of a conflicting pair.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    /// The contract whose linearization this is (its first element).
    pub through_contract: ContractId,
    pub direction: Direction,
}

/// Two contracts that different linearizations order in opposite ways.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConflictReport {
    pub a: ContractId,
    pub b: ContractId,
    pub chains: Vec<ChainEntry>,
}

/// A precedence cycle of three or more contracts that remains after the edges
/// of every conflicting pair are removed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OrderingCycle {
    pub members: Vec<ContractId>,
    pub through: Vec<ContractId>,
}

#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub exclude: ExcludePatterns,
    /// Also search for cycles longer than two.
    pub long_cycles: bool,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub has_conflicts: bool,
    pub conflicts: Vec<ConflictReport>,
    pub cycles: Option<Vec<OrderingCycle>>,
    pub names: BTreeMap<ContractId, String>,
}

impl AnalysisResult {
    pub fn name_of(&self, id: ContractId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    pub fn cycles(&self) -> &[OrderingCycle] {
        self.cycles.as_deref().unwrap_or_default()
    }
}

/// Looks for pairs of contracts that two linearizations order differently.
pub fn analyze(artifacts: &[CompilerOutputArtifact], exclude: &ExcludePatterns) -> AnalysisResult {
    let config = AnalyzerConfig {
        exclude: exclude.clone(),
        long_cycles: false,
    };
    analyze_with_config(artifacts, &config)
}

pub fn analyze_with_config(
    artifacts: &[CompilerOutputArtifact],
    config: &AnalyzerConfig,
) -> AnalysisResult {
    let mut names = BTreeMap::new();
    let mut chains: Vec<Vec<ContractId>> = Vec::new();

    for artifact in artifacts {
        for (source_path, records) in &artifact.sources {
            if config.exclude.is_excluded(source_path) {
                debug!("skipping excluded source {}", source_path);
                continue;
            }
            for record in records {
                names.insert(record.id, record.name.clone());
                match &record.linearized_bases {
                    Some(bases) if !bases.is_empty() => chains.push(normalize_chain(bases)),
                    Some(_) => {}
                    None => warn!(
                        "{} ({}) in {} has no linearizedBaseContracts, skipping",
                        record.name, record.id, source_path
                    ),
                }
            }
        }
    }

    let graph = PrecedenceGraph::from_chains(chains.iter().map(Vec::as_slice));
    debug!(
        "precedence graph: {} chain(s), {} node(s), {} edge(s)",
        chains.len(),
        graph.node_count(),
        graph.edge_count()
    );

    let conflicts: Vec<ConflictReport> = graph
        .conflicting_pairs()
        .into_iter()
        .map(|(a, b)| ConflictReport {
            a,
            b,
            chains: chain_entries(&chains, a, b),
        })
        .collect();

    let cycles = config
        .long_cycles
        .then(|| ordering_cycles(&graph, &chains, &conflicts));

    let has_conflicts =
        !conflicts.is_empty() || cycles.as_ref().map_or(false, |cycles| !cycles.is_empty());

    AnalysisResult {
        has_conflicts,
        conflicts,
        cycles,
        names,
    }
}

// Keeps the first occurrence of each identity.
fn normalize_chain(bases: &[ContractId]) -> Vec<ContractId> {
    let mut chain = Vec::with_capacity(bases.len());
    for &id in bases {
        if !chain.contains(&id) {
            chain.push(id);
        }
    }
    if chain.len() != bases.len() {
        debug!("dropped repeated entries from linearization of {}", bases[0]);
    }
    chain
}

fn chain_entries(chains: &[Vec<ContractId>], a: ContractId, b: ContractId) -> Vec<ChainEntry> {
    chains
        .iter()
        .filter_map(|chain| {
            let pos_a = chain.iter().position(|&id| id == a)?;
            let pos_b = chain.iter().position(|&id| id == b)?;
            Some(ChainEntry {
                through_contract: chain[0],
                direction: if pos_a < pos_b {
                    Direction::Before
                } else {
                    Direction::After
                },
            })
        })
        .collect()
}

fn ordering_cycles(
    graph: &PrecedenceGraph,
    chains: &[Vec<ContractId>],
    conflicts: &[ConflictReport],
) -> Vec<OrderingCycle> {
    let resolved: Vec<_> = conflicts.iter().map(|conflict| (conflict.a, conflict.b)).collect();
    graph
        .cycle_components(&resolved)
        .into_iter()
        .map(|members| {
            let through = chains
                .iter()
                .filter(|chain| chain.iter().filter(|id| members.contains(id)).count() >= 2)
                .map(|chain| chain[0])
                .collect();
            OrderingCycle { members, through }
        })
        .collect()
}
