use std::io;
use thiserror::Error;

// Errors raised while turning a compiler-output document into contract records.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] io::Error),
    #[error("artifact is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("artifact is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("no ast found for source `{0}`")]
    MissingAst(String),
    #[error("invalid ContractDefinition in `{source_path}`: {reason}")]
    InvalidContractDefinition { source_path: String, reason: String },
}

impl ArtifactError {
    pub(crate) fn invalid_definition(source_path: &str, reason: impl ToString) -> Self {
        ArtifactError::InvalidContractDefinition {
            source_path: source_path.to_string(),
            reason: reason.to_string(),
        }
    }
}
