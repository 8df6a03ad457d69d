// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::Wallet;
use crate::api::common::Address;
use anyhow::{Result, bail, format_err};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use serde_this_or_that::as_u64;
use std::sync::atomic::{AtomicU64, Ordering};

/// A wallet provider reached over JSON-RPC, answering `eth_accounts` and `eth_requestAccounts`.
#[derive(Debug)]
pub struct JsonRpcWallet {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcWallet {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn request<T>(&self, method: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": [],
        });
        let response: RpcResponse<T> = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.id != id {
            bail!("Response id {} does not match request id {}", response.id, id);
        }
        if let Some(error) = response.error {
            bail!("{} failed with code {}: {}", method, error.code, error.message);
        }
        response
            .result
            .ok_or_else(|| format_err!("{} returned no result", method))
    }
}

#[async_trait]
impl Wallet for JsonRpcWallet {
    async fn list_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_accounts").await
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        self.request("eth_requestAccounts").await
    }
}

#[derive(Deserialize, Debug)]
struct RpcResponse<T> {
    #[serde(deserialize_with = "as_u64")]
    id: u64,
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Deserialize, Debug)]
struct RpcError {
    code: i64,
    message: String,
}
