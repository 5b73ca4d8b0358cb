#![deny(clippy::dbg_macro)]

pub mod address;
pub mod asset;
pub mod errors;
pub mod evm;
pub mod rest;
pub mod types;

use async_trait::async_trait;

pub use address::{validate, Address, InvalidFormat};
pub use asset::{AssetKind, Denomination};
pub use errors::ChainError;
pub use evm::{EvmNativeClient, EvmTokenClient};
pub use rest::{RestFlavor, RestJsonClient};
pub use types::{Detail, RawBalance};
pub use web3::types::U256;

/// One backend able to report the balance of an already validated address.
///
/// Implementors hold nothing but immutable endpoint configuration, so a
/// single instance can serve any number of concurrent lookups.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch(&self, address: &Address) -> Result<RawBalance, ChainError>;
}
