//! Endpoint configuration, read once at startup.

use providers::{validate, AssetKind};
use thiserror::Error;

pub const DEFAULT_BSC_RPC: &str = "https://bsc-dataseed.binance.org/";
pub const DEFAULT_ETH_RPC: &str = "https://rpc.ankr.com/eth";
pub const DEFAULT_USDT_BSC_CONTRACT: &str = "0x55d398326f99059fF775485246999027B3197955";
pub const DEFAULT_BTC_API_BASE: &str = "https://blockstream.info/api/address/";
pub const DEFAULT_TON_API_BASE: &str =
    "https://toncenter.com/api/v2/getAddressBalance?address=";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Error: {0} environment variable is required")]
    Missing(String),
    #[error("Environment variable `{0}` is empty")]
    Empty(String),
    #[error("`{0}` is not a valid token contract address")]
    InvalidContract(String),
}

macro_rules! var_or {
    ($lookup:expr, $var:expr, $default:expr) => {
        match $lookup($var) {
            Some(val) if val.trim().is_empty() => Err(ConfigError::Empty($var.into())),
            Some(val) => Ok(val.trim().to_string()),
            None => Ok($default.to_string()),
        }
    };
}

/// Backend endpoints. BNB and the BSC token share `bsc_rpc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bsc_rpc: String,
    pub eth_rpc: String,
    pub usdt_bsc_contract: String,
    pub btc_api_base: String,
    pub ton_api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bsc_rpc: DEFAULT_BSC_RPC.into(),
            eth_rpc: DEFAULT_ETH_RPC.into(),
            usdt_bsc_contract: DEFAULT_USDT_BSC_CONTRACT.into(),
            btc_api_base: DEFAULT_BTC_API_BASE.into(),
            ton_api_base: DEFAULT_TON_API_BASE.into(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            bsc_rpc: var_or!(lookup, "BSC_RPC", DEFAULT_BSC_RPC)?,
            eth_rpc: var_or!(lookup, "ETH_RPC", DEFAULT_ETH_RPC)?,
            usdt_bsc_contract: var_or!(lookup, "USDT_BSC_CONTRACT", DEFAULT_USDT_BSC_CONTRACT)?,
            btc_api_base: var_or!(lookup, "BTC_API_BASE", DEFAULT_BTC_API_BASE)?,
            ton_api_base: var_or!(lookup, "TON_API_BASE", DEFAULT_TON_API_BASE)?,
        };

        if !validate(AssetKind::UsdtBsc, &config.usdt_bsc_contract) {
            return Err(ConfigError::InvalidContract(config.usdt_bsc_contract));
        }

        Ok(config)
    }
}

/// Reads a variable that has no default.
pub fn required_var(var: &str) -> Result<String, ConfigError> {
    required_var_from(|var| std::env::var(var).ok(), var)
}

pub fn required_var_from<F>(lookup: F, var: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(val) if val.trim().is_empty() => Err(ConfigError::Empty(var.into())),
        Some(val) => Ok(val.trim().to_string()),
        None => Err(ConfigError::Missing(var.into())),
    }
}
