#![doc = include_str!("../README.md")]

pub mod analyzer;
pub mod artifact;
pub mod contract;
pub mod errors;
pub mod precedence_graph;
pub mod report;

/// Source prefixes left out of the analysis unless told otherwise: generated
/// exposure wrappers and test mocks.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["contracts-exposed/", "contracts/mocks/"];

pub use analyzer::{analyze, analyze_with_config, AnalysisResult, AnalyzerConfig};
pub use artifact::{CompilerOutputArtifact, ExcludePatterns};
pub use contract::{ContractId, ContractRecord};
