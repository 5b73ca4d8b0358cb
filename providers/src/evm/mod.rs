#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod native;
pub mod token;

pub use native::EvmNativeClient;
pub use token::EvmTokenClient;

use crate::errors::ChainError;
use std::{future::Future, str::FromStr, time::Duration};
use web3::{signing::keccak256, transports::Http, types::Address, Web3};

/// Minimal ABI with the single read-only method the token client needs.
pub const ERC20_ABI: &[u8] = br#"[
    {
        "constant": true,
        "inputs": [{ "name": "_owner", "type": "address" }],
        "name": "balanceOf",
        "outputs": [{ "name": "balance", "type": "uint256" }],
        "payable": false,
        "stateMutability": "view",
        "type": "function"
    }
]"#;

/// JSON-RPC endpoint shared by the EVM clients.
///
/// A transport that could not be built is kept as its error so that every
/// lookup against it reports the failure instead of the process refusing
/// to start.
pub struct RpcEndpoint {
    url: String,
    web3: Result<Web3<Http>, String>,
    timeout: Duration,
}

impl RpcEndpoint {
    pub fn new(url: &str, timeout: Duration) -> Self {
        Self {
            url: url.to_string(),
            web3: Http::new(url)
                .map(Web3::new)
                .map_err(|e| format!("web3 provider init error: {e}")),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Liveness probe, returns the client only if the node answers.
    pub async fn connected(&self) -> Result<&Web3<Http>, ChainError> {
        let web3 = self.web3.as_ref().map_err(|e| ChainError::Unreachable(e.clone()))?;

        match web3.web3().client_version().await {
            Ok(version) => {
                log::debug!("{} is up ({version})", self.url);
                Ok(web3)
            }
            Err(e) => Err(ChainError::Unreachable(format!(
                "Cannot connect to RPC node: {e}"
            ))),
        }
    }

    /// Runs `query` under this endpoint's deadline.
    pub async fn with_deadline<T, F>(&self, query: F) -> Result<T, ChainError>
    where
        F: Future<Output = Result<T, ChainError>>,
    {
        tokio::time::timeout(self.timeout, query)
            .await
            .map_err(|_| ChainError::Timeout(self.timeout))?
    }
}

/// Mixed-case checksum encoding of an EVM address.
///
/// Accepts any casing, with or without the `0x` prefix.
pub fn to_checksum(address: &str) -> Result<String, ChainError> {
    let hex = address.strip_prefix("0x").unwrap_or(address);

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::QueryFailed(format!(
            "`{address}` is not an EVM address"
        )));
    }

    let lower = hex.to_ascii_lowercase();
    let hash = keccak256(lower.as_bytes());

    let checksummed = lower
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let nibble = (hash[i / 2] >> if i % 2 == 0 { 4 } else { 0 }) & 0x0f;

            if c.is_ascii_alphabetic() && nibble >= 8 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect::<String>();

    Ok(format!("0x{checksummed}"))
}

/// Checksums `address` and parses it for use in RPC calls.
pub fn checksummed_address(address: &str) -> Result<(String, Address), ChainError> {
    let checksummed = to_checksum(address)?;
    let parsed = Address::from_str(&checksummed[2..])
        .map_err(|e| ChainError::QueryFailed(format!("`{address}`: {e}")))?;

    Ok((checksummed, parsed))
}
