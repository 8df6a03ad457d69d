// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::{Address, Listing};
use crate::units;
use anyhow::Result;
use bigdecimal::num_bigint::BigUint;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleRequest {
    pub token_id: u64,
    /// Payment in wei.
    pub value: BigUint,
    /// The signing account.
    pub buyer: Address,
}

impl SaleRequest {
    pub fn new(token_id: u64, value: BigUint, buyer: Address) -> Self {
        SaleRequest {
            token_id,
            value,
            buyer,
        }
    }

    /// Creates a request paying the listing's asking price.
    pub fn for_listing(listing: &Listing, buyer: Address) -> Result<Self> {
        Ok(SaleRequest {
            token_id: listing.token_id,
            value: units::parse_ether(&listing.price)?,
            buyer,
        })
    }
}
