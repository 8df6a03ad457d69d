// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::MetadataSource;
use crate::api::common::TokenMetadata;
use anyhow::{Result, format_err};
use async_trait::async_trait;
use std::collections::HashMap;

/// Metadata documents served from memory, keyed by URI.
#[derive(Clone, Debug, Default)]
pub struct SimulatedMetadata {
    documents: HashMap<String, TokenMetadata>,
}

impl SimulatedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: &str, metadata: TokenMetadata) -> &mut Self {
        self.documents.insert(uri.into(), metadata);
        self
    }
}

#[async_trait]
impl MetadataSource for SimulatedMetadata {
    async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata> {
        self.documents
            .get(uri)
            .cloned()
            .ok_or_else(|| format_err!("No metadata document at {}", uri))
    }
}
