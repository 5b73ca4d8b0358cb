//! Validate, look up, format: the single entry point for balance checks.

use crate::{config::Config, format::format_balance};
use providers::{
    Address, AssetKind, BalanceSource, ChainError, EvmNativeClient, EvmTokenClient, RawBalance,
    RestFlavor, RestJsonClient,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::Semaphore;

/// Result of one check: either a formatted balance or a readable reason.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub message: String,
}

impl Outcome {
    pub fn success(message: String) -> Self {
        Self { ok: true, message }
    }

    pub fn failure(message: String) -> Self {
        Self { ok: false, message }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deadline of a single backend call.
    pub timeout: Duration,
    /// Backend calls allowed in flight at once, further checks queue.
    pub workers: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            workers: 16,
        }
    }
}

pub struct Dispatcher {
    sources: HashMap<AssetKind, Arc<dyn BalanceSource>>,
    permits: Arc<Semaphore>,
    limits: Limits,
}

impl Dispatcher {
    pub fn new(limits: Limits) -> Self {
        Self {
            sources: HashMap::new(),
            permits: Arc::new(Semaphore::new(limits.workers.max(1))),
            limits,
        }
    }

    pub fn with_source(mut self, kind: AssetKind, source: Arc<dyn BalanceSource>) -> Self {
        self.sources.insert(kind, source);
        self
    }

    /// Wires every asset to the backend its configuration points at.
    pub fn from_config(config: &Config, limits: Limits) -> Result<Self, ChainError> {
        let timeout = limits.timeout;

        let bnb = EvmNativeClient::new(&config.bsc_rpc, AssetKind::Bnb, timeout);
        let eth = EvmNativeClient::new(&config.eth_rpc, AssetKind::Eth, timeout);
        let usdt = EvmTokenClient::new(
            &config.bsc_rpc,
            &config.usdt_bsc_contract,
            AssetKind::UsdtBsc,
            timeout,
        );
        let btc = RestJsonClient::new(
            &config.btc_api_base,
            RestFlavor::Esplora,
            AssetKind::Btc,
            timeout,
        )?;
        let ton = RestJsonClient::new(
            &config.ton_api_base,
            RestFlavor::Toncenter,
            AssetKind::Ton,
            timeout,
        )?;

        Ok(Self::new(limits)
            .with_source(AssetKind::Bnb, Arc::new(bnb))
            .with_source(AssetKind::Eth, Arc::new(eth))
            .with_source(AssetKind::UsdtBsc, Arc::new(usdt))
            .with_source(AssetKind::Btc, Arc::new(btc))
            .with_source(AssetKind::Ton, Arc::new(ton)))
    }

    /// Checks `text` as an address of `kind` and looks up its balance.
    ///
    /// Never fails: every problem ends up as an `Outcome` with `ok == false`.
    /// An address that does not pass format validation never reaches a
    /// backend.
    pub async fn check(&self, kind: AssetKind, text: &str) -> Outcome {
        let address = match Address::parse(kind, text) {
            Ok(address) => address,
            Err(e) => {
                log::debug!("{kind} check rejected: {e}");
                return Outcome::failure(e.to_string());
            }
        };

        let source = match self.sources.get(&kind) {
            Some(source) => Arc::clone(source),
            None => return Outcome::failure(format!("No backend configured for {kind}")),
        };

        match self.fetch(source, address).await {
            Ok(raw) => Outcome::success(format_balance(&raw)),
            Err(e) => {
                log::warn!("{kind} check failed ({}): {e}", e.category());
                Outcome::failure(format!("{kind} check failed: {e}"))
            }
        }
    }

    /// Runs the lookup as its own task so that the caller only suspends
    /// while waiting for it.
    async fn fetch(
        &self,
        source: Arc<dyn BalanceSource>,
        address: Address,
    ) -> Result<RawBalance, ChainError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ChainError::Unreachable("worker pool is shut down".into()))?;
        let timeout = self.limits.timeout;

        let task = tokio::spawn(async move {
            let _permit = permit;

            tokio::time::timeout(timeout, source.fetch(&address))
                .await
                .map_err(|_| ChainError::Timeout(timeout))?
        });

        match task.await {
            Ok(result) => result,
            Err(e) => Err(ChainError::QueryFailed(format!("lookup task failed: {e}"))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Dispatcher, Limits, Outcome};
    use crate::config::Config;
    use async_trait::async_trait;
    use providers::{
        evm::mock::{answer, called_methods, node},
        Address, AssetKind, BalanceSource, ChainError, Detail, RawBalance, U256,
    };
    use serde_json::json;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::{Duration, Instant},
    };
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    struct Counting {
        calls: AtomicUsize,
        result: Result<RawBalance, ChainError>,
    }

    impl Counting {
        fn new(result: Result<RawBalance, ChainError>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                result,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BalanceSource for Counting {
        async fn fetch(&self, _: &Address) -> Result<RawBalance, ChainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    /// Sleeps for a per-address delay before answering.
    struct Delayed(HashMap<String, Duration>);

    #[async_trait]
    impl BalanceSource for Delayed {
        async fn fetch(&self, address: &Address) -> Result<RawBalance, ChainError> {
            if let Some(delay) = self.0.get(address.as_str()) {
                tokio::time::sleep(*delay).await;
            }

            Ok(RawBalance::new(
                U256::from(1u64),
                AssetKind::Ton.denomination(),
                Detail::Plain,
            ))
        }
    }

    struct Panicking;

    #[async_trait]
    impl BalanceSource for Panicking {
        async fn fetch(&self, _: &Address) -> Result<RawBalance, ChainError> {
            panic!("backend bug")
        }
    }

    fn btc(satoshi: u64) -> RawBalance {
        RawBalance::new(
            U256::from(satoshi),
            AssetKind::Btc.denomination(),
            Detail::Plain,
        )
    }

    fn ton_address(i: usize) -> String {
        format!("EQ{:0>46}", i)
    }

    #[tokio::test]
    async fn invalid_format_never_hits_backend() {
        let source = Counting::new(Ok(btc(1)));
        let dispatcher =
            Dispatcher::new(Limits::default()).with_source(AssetKind::Btc, source.clone());

        let outcome = dispatcher.check(AssetKind::Btc, "not-a-valid-address").await;

        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("invalid format"));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn success_is_formatted() {
        let source = Counting::new(Ok(btc(100_000_000)));
        let dispatcher =
            Dispatcher::new(Limits::default()).with_source(AssetKind::Btc, source.clone());

        let address = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
        let first = dispatcher.check(AssetKind::Btc, address).await;
        let second = dispatcher.check(AssetKind::Btc, address).await;

        assert_eq!(first, Outcome::success("Balance: 1.00000000 BTC".into()));
        assert_eq!(first, second);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failures_name_their_category() {
        let cases = [
            (ChainError::Unreachable("connection refused".into()), "unreachable"),
            (ChainError::MalformedResponse("expected value".into()), "malformed"),
            (ChainError::Timeout(Duration::from_secs(10)), "timed out"),
            (ChainError::HttpStatus(502), "HTTP status 502"),
        ];

        for (error, needle) in cases {
            let dispatcher = Dispatcher::new(Limits::default())
                .with_source(AssetKind::Btc, Counting::new(Err(error)));

            let outcome = dispatcher
                .check(AssetKind::Btc, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
                .await;

            assert!(!outcome.ok);
            assert!(outcome.message.starts_with("BTC check failed"));
            assert!(outcome.message.contains(needle), "{}", outcome.message);
        }
    }

    #[tokio::test]
    async fn missing_backend() {
        let outcome = Dispatcher::new(Limits::default())
            .check(AssetKind::Ton, &ton_address(1))
            .await;

        assert_eq!(outcome, Outcome::failure("No backend configured for TON".into()));
    }

    #[tokio::test]
    async fn panicking_backend_is_contained() {
        let dispatcher =
            Dispatcher::new(Limits::default()).with_source(AssetKind::Ton, Arc::new(Panicking));

        let outcome = dispatcher.check(AssetKind::Ton, &ton_address(1)).await;

        assert!(!outcome.ok);
        assert!(outcome.message.contains("lookup task failed"));
    }

    #[tokio::test]
    async fn timeouts_are_independent() {
        let slow = ton_address(0);
        let delays = HashMap::from([(slow.clone(), Duration::from_secs(30))]);

        let dispatcher = Dispatcher::new(Limits {
            timeout: Duration::from_millis(300),
            workers: 8,
        })
        .with_source(AssetKind::Ton, Arc::new(Delayed(delays)));

        let addresses: Vec<String> = (0..6).map(ton_address).collect();
        let started = Instant::now();

        let outcomes = futures::future::join_all(
            addresses
                .iter()
                .map(|address| dispatcher.check(AssetKind::Ton, address)),
        )
        .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!outcomes[0].ok);
        assert!(outcomes[0].message.contains("timed out after 300ms"));
        assert!(outcomes[1..].iter().all(|o| o.ok));
    }

    #[tokio::test]
    async fn saturated_pool_queues() {
        let delays = (0..4)
            .map(|i| (ton_address(i), Duration::from_millis(100)))
            .collect();

        let dispatcher = Dispatcher::new(Limits {
            timeout: Duration::from_secs(5),
            workers: 1,
        })
        .with_source(AssetKind::Ton, Arc::new(Delayed(delays)));

        let addresses: Vec<String> = (0..4).map(ton_address).collect();
        let started = Instant::now();

        let outcomes = futures::future::join_all(
            addresses
                .iter()
                .map(|address| dispatcher.check(AssetKind::Ton, address)),
        )
        .await;

        assert!(outcomes.iter().all(|o| o.ok));
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn config_routes_each_asset_to_its_endpoint() {
        let bsc = node().await;
        answer(&bsc, "eth_getBalance", json!("0x1bc16d674ec80000")).await;
        answer(&bsc, "eth_getTransactionCount", json!("0x0")).await;
        answer(
            &bsc,
            "eth_call",
            json!(format!("0x{:064x}", 5_000_000_000_000_000_000u128)),
        )
        .await;

        let eth = node().await;
        answer(&eth, "eth_getBalance", json!("0xde0b6b3a7640000")).await;
        answer(&eth, "eth_getTransactionCount", json!("0x0")).await;

        let ton = MockServer::start().await;
        let ton_address = format!("EQ{}", "A".repeat(46));
        Mock::given(method("GET"))
            .and(path("/api/v2/getAddressBalance"))
            .and(query_param("address", ton_address.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": "3000000000"
            })))
            .expect(1)
            .mount(&ton)
            .await;

        let config = Config {
            bsc_rpc: bsc.uri(),
            eth_rpc: eth.uri(),
            ton_api_base: format!("{}/api/v2/getAddressBalance?address=", ton.uri()),
            ..Config::default()
        };
        let dispatcher = Dispatcher::from_config(&config, Limits::default()).unwrap();
        let evm_address = format!("0x{}", "0".repeat(40));

        assert_eq!(
            dispatcher.check(AssetKind::Eth, &evm_address).await,
            Outcome::success("Balance: 1.000000 ETH, txs: 0".into())
        );
        assert_eq!(
            dispatcher.check(AssetKind::Bnb, &evm_address).await,
            Outcome::success("Balance: 2.000000 BNB, txs: 0".into())
        );
        assert_eq!(
            dispatcher.check(AssetKind::UsdtBsc, &evm_address).await,
            Outcome::success(
                "Token balance (raw): 5000000000000000000  (display approx: 5.000000 USDT)".into()
            )
        );
        assert_eq!(
            dispatcher.check(AssetKind::Ton, &ton_address).await,
            Outcome::success("Balance: 3.000000000 TON".into())
        );

        // the token contract lives on BSC, never on the ETH node
        assert!(called_methods(&bsc).await.contains(&"eth_call".to_string()));
        let eth_calls = called_methods(&eth).await;
        assert!(eth_calls.contains(&"eth_getBalance".to_string()));
        assert!(!eth_calls.contains(&"eth_call".to_string()));
    }

    #[tokio::test]
    async fn btc_status_and_garbage_are_distinct() {
        let failing = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&failing)
            .await;

        let garbage = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&garbage)
            .await;

        let mut messages = vec![];

        for server in [&failing, &garbage] {
            let config = Config {
                btc_api_base: format!("{}/address/", server.uri()),
                ..Config::default()
            };
            let dispatcher = Dispatcher::from_config(&config, Limits::default()).unwrap();

            let outcome = dispatcher
                .check(AssetKind::Btc, "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
                .await;

            assert!(!outcome.ok);
            messages.push(outcome.message);
        }

        assert_eq!(messages[0], "BTC check failed: HTTP status 500");
        assert!(messages[1].starts_with("BTC check failed: malformed response"));
    }
}
