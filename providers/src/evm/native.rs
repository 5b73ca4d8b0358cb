use crate::{
    address::Address,
    asset::AssetKind,
    errors::ChainError,
    evm::{checksummed_address, RpcEndpoint},
    types::{Detail, RawBalance},
    BalanceSource,
};
use async_trait::async_trait;
use std::time::Duration;

/// Native coin balance and transaction count over EVM JSON-RPC.
pub struct EvmNativeClient {
    endpoint: RpcEndpoint,
    kind: AssetKind,
}

impl EvmNativeClient {
    pub fn new(rpc_url: &str, kind: AssetKind, timeout: Duration) -> Self {
        Self {
            endpoint: RpcEndpoint::new(rpc_url, timeout),
            kind,
        }
    }

    async fn query(&self, address: &Address) -> Result<RawBalance, ChainError> {
        let web3 = self.endpoint.connected().await?;
        let (_, holder) = checksummed_address(address.as_str())?;

        let balance = web3.eth().balance(holder, None).await?;
        let tx_count = web3.eth().transaction_count(holder, None).await?;

        log::debug!(
            "{} at {}: {balance} base units, {tx_count} txs",
            address,
            self.endpoint.url()
        );

        Ok(RawBalance::new(
            balance,
            self.kind.denomination(),
            Detail::Native { tx_count },
        ))
    }
}

#[async_trait]
impl BalanceSource for EvmNativeClient {
    async fn fetch(&self, address: &Address) -> Result<RawBalance, ChainError> {
        let address = address.ensure_kind(self.kind)?;
        self.endpoint.with_deadline(self.query(address)).await
    }
}

#[cfg(test)]
mod test {
    use super::EvmNativeClient;
    use crate::{
        evm::mock::{answer, called_methods, node, rpc_error},
        Address, AssetKind, BalanceSource, ChainError, Detail, U256,
    };
    use serde_json::json;
    use std::time::Duration;
    use wiremock::{
        matchers::{body_partial_json, method},
        Mock, MockServer, ResponseTemplate,
    };

    fn zero_address(kind: AssetKind) -> Address {
        Address::parse(kind, &format!("0x{}", "0".repeat(40))).unwrap()
    }

    #[tokio::test]
    async fn native_balance_and_tx_count() {
        let server = node().await;
        answer(&server, "eth_getBalance", json!("0xde0b6b3a7640000")).await;
        answer(&server, "eth_getTransactionCount", json!("0x2a")).await;

        let client = EvmNativeClient::new(&server.uri(), AssetKind::Bnb, Duration::from_secs(5));
        let raw = client.fetch(&zero_address(AssetKind::Bnb)).await.unwrap();

        assert_eq!(raw.amount, U256::exp10(18));
        assert_eq!(raw.denomination, AssetKind::Bnb.denomination());
        assert_eq!(
            raw.detail,
            Detail::Native {
                tx_count: U256::from(42)
            }
        );
    }

    #[tokio::test]
    async fn other_chain_address_is_refused_before_any_call() {
        let server = node().await;

        let client = EvmNativeClient::new(&server.uri(), AssetKind::Eth, Duration::from_secs(5));

        assert_eq!(
            client.fetch(&zero_address(AssetKind::Bnb)).await,
            Err(ChainError::AssetMismatch {
                expected: AssetKind::Eth,
                got: AssetKind::Bnb,
            })
        );
        assert!(called_methods(&server).await.is_empty());
    }

    #[tokio::test]
    async fn dead_node_is_unreachable() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = EvmNativeClient::new(
            &format!("http://127.0.0.1:{port}"),
            AssetKind::Eth,
            Duration::from_secs(5),
        );

        assert!(matches!(
            client.fetch(&zero_address(AssetKind::Eth)).await,
            Err(ChainError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn bad_url_is_unreachable() {
        let client = EvmNativeClient::new("not a url", AssetKind::Eth, Duration::from_secs(5));

        match client.fetch(&zero_address(AssetKind::Eth)).await {
            Err(ChainError::Unreachable(msg)) => assert!(msg.contains("provider init")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn rpc_error_is_query_failure() {
        let server = node().await;

        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": "eth_getBalance" })))
            .respond_with(rpc_error("header not found"))
            .mount(&server)
            .await;

        let client = EvmNativeClient::new(&server.uri(), AssetKind::Bnb, Duration::from_secs(5));

        assert!(matches!(
            client.fetch(&zero_address(AssetKind::Bnb)).await,
            Err(ChainError::QueryFailed(_))
        ));
    }

    #[tokio::test]
    async fn slow_node_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let timeout = Duration::from_millis(200);
        let client = EvmNativeClient::new(&server.uri(), AssetKind::Eth, timeout);

        assert_eq!(
            client.fetch(&zero_address(AssetKind::Eth)).await,
            Err(ChainError::Timeout(timeout))
        );
    }
}
