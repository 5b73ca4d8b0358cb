use crate::asset::Denomination;
use web3::types::U256;

/// What a lookup returned besides the amount itself.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Detail {
    /// Native coin of an EVM chain, with the account's transaction count.
    Native { tx_count: U256 },
    /// Token balance, displayed next to the raw contract integer.
    Token,
    Plain,
}

/// Backend amount in base units together with the scale it was read in.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RawBalance {
    pub amount: U256,
    /// Set only when an upstream API reports more spent than funded.
    pub negative: bool,
    pub denomination: Denomination,
    pub detail: Detail,
}

impl RawBalance {
    pub fn new(amount: U256, denomination: Denomination, detail: Detail) -> Self {
        Self {
            amount,
            negative: false,
            denomination,
            detail,
        }
    }

    pub fn signed(amount: i128, denomination: Denomination) -> Self {
        Self {
            amount: U256::from(amount.unsigned_abs()),
            negative: amount < 0,
            denomination,
            detail: Detail::Plain,
        }
    }
}
