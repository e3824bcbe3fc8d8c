use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::{ContractId, ContractRecord};
use crate::errors::ArtifactError;
use crate::DEFAULT_EXCLUDE_PATTERNS;

/// Contract definitions of one compilation, grouped by source path in the
/// order the compiler listed them.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOutputArtifact {
    pub sources: IndexMap<String, Vec<ContractRecord>>,
}

/// The fields of a `ContractDefinition` AST node the analysis relies on.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ContractDefinitionNode {
    id: u64,
    name: String,
    #[serde(default)]
    linearized_base_contracts: Option<Vec<u64>>,
}

impl CompilerOutputArtifact {
    pub fn new(sources: IndexMap<String, Vec<ContractRecord>>) -> Self {
        CompilerOutputArtifact { sources }
    }

    /// Reads and parses a compiler-output or build-info file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ArtifactError> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(&value)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ArtifactError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Accepts either solc standard-json output or a Hardhat build-info
    /// document wrapping it under `output`.
    pub fn from_value(value: &Value) -> Result<Self, ArtifactError> {
        let output = match value.get("output") {
            Some(output) if output.is_object() => output,
            _ => value,
        };

        let contracts = output
            .get("contracts")
            .and_then(Value::as_object)
            .ok_or(ArtifactError::MissingField("contracts"))?;
        let sources = output
            .get("sources")
            .and_then(Value::as_object)
            .ok_or(ArtifactError::MissingField("sources"))?;

        let mut records = IndexMap::with_capacity(contracts.len());
        for source_path in contracts.keys() {
            let ast = sources
                .get(source_path)
                .and_then(|source| source.get("ast"))
                .filter(|ast| !ast.is_null())
                .ok_or_else(|| ArtifactError::MissingAst(source_path.clone()))?;

            let definitions = find_contract_definitions(ast)
                .into_iter()
                .map(|node| contract_record(source_path, node))
                .collect::<Result<Vec<_>, _>>()?;
            debug!(
                "{}: {} contract definition(s)",
                source_path,
                definitions.len()
            );
            records.insert(source_path.clone(), definitions);
        }

        Ok(CompilerOutputArtifact { sources: records })
    }

    pub fn contract_count(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }
}

// Pre-order walk collecting every node whose nodeType is ContractDefinition.
fn find_contract_definitions(ast: &Value) -> Vec<&Value> {
    let mut found = Vec::new();
    let mut stack = vec![ast];
    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if map.get("nodeType").and_then(Value::as_str) == Some("ContractDefinition") {
                    found.push(node);
                }
                stack.extend(map.values().rev());
            }
            Value::Array(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
    }
    found
}

fn contract_record(source_path: &str, node: &Value) -> Result<ContractRecord, ArtifactError> {
    let definition = ContractDefinitionNode::deserialize(node)
        .map_err(|err| ArtifactError::invalid_definition(source_path, err))?;

    Ok(ContractRecord {
        id: ContractId(definition.id),
        name: definition.name,
        linearized_bases: definition
            .linearized_base_contracts
            .map(|bases| bases.into_iter().map(ContractId).collect()),
    })
}

/// Source path prefixes whose contracts take no part in the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludePatterns(Vec<String>);

impl ExcludePatterns {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExcludePatterns(prefixes.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        ExcludePatterns(Vec::new())
    }

    pub fn with(mut self, prefix: impl Into<String>) -> Self {
        self.0.push(prefix.into());
        self
    }

    pub fn is_excluded(&self, source_path: &str) -> bool {
        self.0
            .iter()
            .any(|prefix| source_path.starts_with(prefix.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for ExcludePatterns {
    fn default() -> Self {
        ExcludePatterns::new(DEFAULT_EXCLUDE_PATTERNS.iter().copied())
    }
}
