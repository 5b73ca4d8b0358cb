use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The fixed set of assets a balance can be checked for.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Bnb,
    Eth,
    #[serde(rename = "USDT", alias = "USDT_BSC")]
    UsdtBsc,
    Btc,
    Ton,
}

impl AssetKind {
    pub const ALL: [AssetKind; 5] = [
        AssetKind::Bnb,
        AssetKind::Eth,
        AssetKind::UsdtBsc,
        AssetKind::Btc,
        AssetKind::Ton,
    ];

    /// Short selector used on the wire, e.g. as button data.
    pub fn code(&self) -> &'static str {
        match self {
            AssetKind::Bnb => "BNB",
            AssetKind::Eth => "ETH",
            AssetKind::UsdtBsc => "USDT",
            AssetKind::Btc => "BTC",
            AssetKind::Ton => "TON",
        }
    }

    /// Human facing name.
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::UsdtBsc => "USDT (BSC)",
            other => other.code(),
        }
    }

    /// Scale and unit every raw amount of this asset is reported in.
    pub fn denomination(&self) -> Denomination {
        match self {
            AssetKind::Bnb => Denomination::new("BNB", 18, 6),
            AssetKind::Eth => Denomination::new("ETH", 18, 6),
            // decimals are not queried from the contract, the configured
            // BSC USDT uses 18
            AssetKind::UsdtBsc => Denomination::new("USDT", 18, 6),
            AssetKind::Btc => Denomination::new("BTC", 8, 8),
            AssetKind::Ton => Denomination::new("TON", 9, 9),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Unknown asset `{0}`")]
pub struct UnknownAsset(pub String);

impl FromStr for AssetKind {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BNB" => Ok(AssetKind::Bnb),
            "ETH" => Ok(AssetKind::Eth),
            "USDT" | "USDT_BSC" => Ok(AssetKind::UsdtBsc),
            "BTC" => Ok(AssetKind::Btc),
            "TON" => Ok(AssetKind::Ton),
            _ => Err(UnknownAsset(s.to_string())),
        }
    }
}

/// Fixed scale of a raw amount: `amount / 10^decimals` units, shown with
/// `precision` fractional digits.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Denomination {
    pub unit: &'static str,
    pub decimals: u32,
    pub precision: u32,
}

impl Denomination {
    pub const fn new(unit: &'static str, decimals: u32, precision: u32) -> Self {
        Self {
            unit,
            decimals,
            precision,
        }
    }
}
