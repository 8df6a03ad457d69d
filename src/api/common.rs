// SPDX-License-Identifier: GPL-3.0-or-later

use crate::units;
use anyhow::{Error, Result, bail};
use bigdecimal::num_bigint::BigUint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A `0x`-prefixed, 20 byte hex account address. Stored lower-cased.
#[derive(Hash, PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) else {
            bail!("Address {s} is missing the 0x prefix");
        };
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            bail!("Address {s} is not 20 hex encoded bytes");
        }
        Ok(Address(format!("0x{}", hex.to_ascii_lowercase())))
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A market item as recorded by the marketplace contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketItem {
    pub token_id: u64,
    /// Asking price in wei.
    pub price: BigUint,
    pub seller: Address,
    pub owner: Address,
}

/// The off-chain metadata document of a token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A market item merged with its metadata, ready to be displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    /// Asking price in ether, e.g. `"1.0"`.
    pub price: String,
    pub token_id: u64,
    pub seller: Address,
    pub owner: Address,
    pub image: String,
    pub name: String,
    pub description: String,
}

impl Listing {
    /// Merges an on-chain item with its metadata document.
    pub fn new(item: MarketItem, metadata: TokenMetadata) -> Self {
        Listing {
            price: units::format_ether(&item.price),
            token_id: item.token_id,
            seller: item.seller,
            owner: item.owner,
            image: metadata.image,
            name: metadata.name,
            description: metadata.description,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub token_id: u64,
    pub buyer: Address,
    pub value: BigUint,
    pub confirmed_at: DateTime<Utc>,
}
