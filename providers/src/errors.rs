use crate::asset::AssetKind;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single balance lookup, in categories that need different
/// remediation on the operator side.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("{got} address sent to the {expected} backend")]
    AssetMismatch { expected: AssetKind, got: AssetKind },
}

impl ChainError {
    /// Short category name, used for logging.
    pub fn category(&self) -> &'static str {
        match self {
            ChainError::Unreachable(_) => "unreachable",
            ChainError::Timeout(_) => "timeout",
            ChainError::QueryFailed(_) => "query_failed",
            ChainError::HttpStatus(_) => "http_status",
            ChainError::MalformedResponse(_) => "malformed_response",
            ChainError::AssetMismatch { .. } => "asset_mismatch",
        }
    }
}

impl From<web3::Error> for ChainError {
    fn from(e: web3::Error) -> Self {
        match e {
            web3::Error::Unreachable | web3::Error::Transport(_) => {
                ChainError::Unreachable(e.to_string())
            }
            _ => ChainError::QueryFailed(e.to_string()),
        }
    }
}

impl From<web3::contract::Error> for ChainError {
    fn from(e: web3::contract::Error) -> Self {
        match e {
            web3::contract::Error::Api(inner) => inner.into(),
            other => ChainError::QueryFailed(other.to_string()),
        }
    }
}
