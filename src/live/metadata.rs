// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::MetadataSource;
use crate::api::common::TokenMetadata;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

/// Fetches metadata documents with an HTTP GET.
#[derive(Clone, Debug)]
pub struct HttpMetadataSource {
    client: reqwest::Client,
}

impl HttpMetadataSource {
    pub fn new() -> Result<Self> {
        let mut header_map = HeaderMap::new();
        header_map.insert("accept", HeaderValue::from_str("application/json")?);
        let client = reqwest::ClientBuilder::new()
            .default_headers(header_map)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MetadataSource for HttpMetadataSource {
    async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata> {
        let response = self
            .client
            .get(uri)
            .send()
            .await?
            .error_for_status()?;
        let metadata = response
            .json()
            .await
            .with_context(|| format!("Invalid metadata document at {uri}"))?;
        Ok(metadata)
    }
}
