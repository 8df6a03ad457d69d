// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::TokenMetadata;
use anyhow::Result;
use async_trait::async_trait;

/// Fetches off-chain token metadata documents.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata>;
}
