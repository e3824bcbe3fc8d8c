use std::fmt;

use serde::{Deserialize, Serialize};

/// Compiler-assigned identity of a contract definition (solc's AST node id).
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(transparent)]
pub struct ContractId(pub u64);

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ContractId {
    fn from(id: u64) -> Self {
        ContractId(id)
    }
}

/// A contract definition together with the linearization solc computed for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub id: ContractId,
    pub name: String,
    /// Self first, then ancestors in resolution order. `None` when the
    /// compiler output carried no linearization for this definition.
    pub linearized_bases: Option<Vec<ContractId>>,
}

impl ContractRecord {
    pub fn new(
        id: impl Into<ContractId>,
        name: impl Into<String>,
        linearized_bases: Vec<ContractId>,
    ) -> ContractRecord {
        ContractRecord {
            id: id.into(),
            name: name.into(),
            linearized_bases: Some(linearized_bases),
        }
    }

    /// Record for a definition whose linearization is unknown.
    pub fn without_linearization(id: impl Into<ContractId>, name: impl Into<String>) -> Self {
        ContractRecord {
            id: id.into(),
            name: name.into(),
            linearized_bases: None,
        }
    }

    /// Builds a record from raw numeric ids: `ContractRecord::from_ids(1, "Foo", &[1, 2, 3])`.
    pub fn from_ids(id: u64, name: impl Into<String>, bases: &[u64]) -> Self {
        ContractRecord::new(id, name, bases.iter().copied().map(ContractId).collect())
    }
}
