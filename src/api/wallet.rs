// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::Address;
use anyhow::Result;
use async_trait::async_trait;

/// An injected wallet provider, which grants access to the user's accounts.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Returns the accounts the user has already authorized, without prompting.
    async fn list_accounts(&self) -> Result<Vec<Address>>;

    /// Prompts the user for account access and returns the authorized accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>>;
}
