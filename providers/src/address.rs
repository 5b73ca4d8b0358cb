//! Format-only address screening for every supported asset.
//!
//! No checksum is decoded and nothing touches the network: a string that
//! passes here may still belong to an account that does not exist.

use crate::{asset::AssetKind, errors::ChainError};
use regex::Regex;
use std::fmt;
use thiserror::Error;

lazy_static::lazy_static! {
    static ref EVM: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
    // Base58-like screening class, `0` and `l` are let through on purpose
    static ref BTC: Regex = Regex::new(r"^(bc1|[13])[a-zA-HJ-NP-Z0-9]{25,39}$").unwrap();
    static ref TON: Regex = Regex::new(r"^(EQ|UQ)[A-Za-z0-9_-]{46}$").unwrap();
}

fn grammar(kind: AssetKind) -> &'static Regex {
    match kind {
        AssetKind::Bnb | AssetKind::Eth | AssetKind::UsdtBsc => &EVM,
        AssetKind::Btc => &BTC,
        AssetKind::Ton => &TON,
    }
}

/// Returns whether `text` is a syntactically valid address for `kind`.
pub fn validate(kind: AssetKind, text: &str) -> bool {
    grammar(kind).is_match(text)
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid format for {0} address")]
pub struct InvalidFormat(pub AssetKind);

/// An address string that has been accepted for exactly one asset.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Address {
    kind: AssetKind,
    text: String,
}

impl Address {
    pub fn parse(kind: AssetKind, text: &str) -> Result<Self, InvalidFormat> {
        if validate(kind, text) {
            Ok(Self {
                kind,
                text: text.to_string(),
            })
        } else {
            Err(InvalidFormat(kind))
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Refuses to hand this address to a backend serving another asset.
    pub fn ensure_kind(&self, expected: AssetKind) -> Result<&Self, ChainError> {
        if self.kind == expected {
            Ok(self)
        } else {
            Err(ChainError::AssetMismatch {
                expected,
                got: self.kind,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
