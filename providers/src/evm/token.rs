use crate::{
    address::Address,
    asset::AssetKind,
    errors::ChainError,
    evm::{checksummed_address, RpcEndpoint, ERC20_ABI},
    types::{Detail, RawBalance},
    BalanceSource,
};
use async_trait::async_trait;
use std::time::Duration;
use web3::{
    contract::{Contract, Options},
    types::U256,
};

/// ERC-20/BEP-20 `balanceOf` lookup against one configured token contract.
///
/// The token's `decimals()` is never queried, the scale is the fixed
/// denomination of the asset the client serves.
pub struct EvmTokenClient {
    endpoint: RpcEndpoint,
    token_contract: String,
    kind: AssetKind,
}

impl EvmTokenClient {
    pub fn new(rpc_url: &str, token_contract: &str, kind: AssetKind, timeout: Duration) -> Self {
        Self {
            endpoint: RpcEndpoint::new(rpc_url, timeout),
            token_contract: token_contract.to_string(),
            kind,
        }
    }

    async fn query(&self, address: &Address) -> Result<RawBalance, ChainError> {
        let web3 = self.endpoint.connected().await?;

        let (holder_text, holder) = checksummed_address(address.as_str())?;
        let (token_text, token) = checksummed_address(&self.token_contract)?;

        let contract = Contract::from_json(web3.eth(), token, ERC20_ABI)
            .map_err(|e| ChainError::QueryFailed(format!("token ABI: {e}")))?;

        let balance: U256 = contract
            .query("balanceOf", (holder,), None, Options::default(), None)
            .await?;

        log::debug!("{token_text}.balanceOf({holder_text}) = {balance}");

        Ok(RawBalance::new(balance, self.kind.denomination(), Detail::Token))
    }
}

#[async_trait]
impl BalanceSource for EvmTokenClient {
    async fn fetch(&self, address: &Address) -> Result<RawBalance, ChainError> {
        let address = address.ensure_kind(self.kind)?;
        self.endpoint.with_deadline(self.query(address)).await
    }
}
