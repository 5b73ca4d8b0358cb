pub mod types;

use crate::{
    address::Address,
    asset::AssetKind,
    errors::ChainError,
    types::{Detail, RawBalance},
    BalanceSource,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use self::types::{EsploraAddress, TonBalance};
use std::time::Duration;
use web3::types::U256;

/// Response shape a REST backend speaks.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RestFlavor {
    /// Blockstream style explorer, balance in satoshis.
    Esplora,
    /// toncenter v2, balance in nanotons.
    Toncenter,
}

impl RestFlavor {
    fn name(&self) -> &'static str {
        match self {
            RestFlavor::Esplora => "BTC API",
            RestFlavor::Toncenter => "TON API",
        }
    }
}

/// Single GET of `base_url + address` against a JSON REST API.
pub struct RestJsonClient {
    client: Client,
    base_url: String,
    flavor: RestFlavor,
    kind: AssetKind,
    timeout: Duration,
}

impl RestJsonClient {
    pub fn new(
        base_url: &str,
        flavor: RestFlavor,
        kind: AssetKind,
        timeout: Duration,
    ) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Unreachable(format!("HTTP client init error: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            flavor,
            kind,
            timeout,
        })
    }

    fn request_error(&self, e: reqwest::Error) -> ChainError {
        if e.is_timeout() {
            ChainError::Timeout(self.timeout)
        } else {
            ChainError::Unreachable(format!("{}: {e}", self.flavor.name()))
        }
    }

    fn parse(&self, body: &[u8]) -> Result<RawBalance, ChainError> {
        let malformed = |e: serde_json::Error| {
            ChainError::MalformedResponse(format!("{}: {e}", self.flavor.name()))
        };

        match self.flavor {
            RestFlavor::Esplora => {
                let address: EsploraAddress = serde_json::from_slice(body).map_err(malformed)?;

                Ok(RawBalance::signed(
                    address.chain_stats.balance(),
                    self.kind.denomination(),
                ))
            }
            RestFlavor::Toncenter => {
                let balance: TonBalance = serde_json::from_slice(body).map_err(malformed)?;

                match balance.result {
                    Some(nanotons) => Ok(RawBalance::new(
                        U256::from(nanotons),
                        self.kind.denomination(),
                        Detail::Plain,
                    )),
                    None => Err(ChainError::MalformedResponse(format!(
                        "{} result missing",
                        self.flavor.name()
                    ))),
                }
            }
        }
    }
}

#[async_trait]
impl BalanceSource for RestJsonClient {
    async fn fetch(&self, address: &Address) -> Result<RawBalance, ChainError> {
        let address = address.ensure_kind(self.kind)?;
        let url = format!("{}{}", self.base_url, address);

        log::debug!("GET {url}");

        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        match res.status() {
            StatusCode::OK => {
                let body = res.bytes().await.map_err(|e| self.request_error(e))?;
                self.parse(&body)
            }
            status => Err(ChainError::HttpStatus(status.as_u16())),
        }
    }
}
