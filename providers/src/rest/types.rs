use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;

/// Esplora `GET /address/:address` response, only the parts we read.
#[derive(Deserialize, Debug)]
pub struct EsploraAddress {
    #[serde(default)]
    pub chain_stats: ChainStats,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChainStats {
    #[serde(default)]
    pub funded_txo_sum: i64,
    #[serde(default)]
    pub spent_txo_sum: i64,
}

impl ChainStats {
    /// Confirmed balance in satoshis. Negative only if the upstream index is
    /// inconsistent.
    pub fn balance(&self) -> i128 {
        self.funded_txo_sum as i128 - self.spent_txo_sum as i128
    }
}

/// toncenter `getAddressBalance` response. `result` arrives either as a
/// JSON number or as a decimal string.
#[derive(Deserialize, Debug)]
pub struct TonBalance {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub result: Option<u64>,
}
