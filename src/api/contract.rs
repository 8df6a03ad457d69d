// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::{MarketItem, TransactionReceipt};
use crate::api::request::SaleRequest;
use anyhow::Result;
use async_trait::async_trait;

/// The marketplace contract, reached through its read and write methods.
#[async_trait]
pub trait MarketContract: Send + Sync {
    /// Returns every market item that has not been sold yet.
    async fn fetch_market_items(&self) -> Result<Vec<MarketItem>>;

    /// Returns the metadata URI of the given token.
    async fn token_uri(&self, token_id: u64) -> Result<String>;

    /// Submits a purchase of the token in `req`, paying `req.value`.
    ///
    /// The returned handle resolves once the transaction has been confirmed. Nothing is
    /// guaranteed to have changed on the contract before that.
    async fn create_market_sale(&self, req: SaleRequest) -> Result<Box<dyn PendingTransaction>>;
}

/// A submitted transaction awaiting confirmation.
#[async_trait]
pub trait PendingTransaction: Send {
    fn hash(&self) -> &str;

    async fn wait(self: Box<Self>) -> Result<TransactionReceipt>;
}
