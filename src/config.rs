// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

//! The deployment constants of the marketplace contract.

use crate::api::common::Address;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;

pub const ADDRESS_VAR: &str = "MARKETPLACE_ADDRESS";
pub const ABI_VAR: &str = "MARKETPLACE_ABI";

/// Contract methods the marketplace view calls.
pub const REQUIRED_METHODS: [&str; 3] = ["fetchMarketItems", "tokenURI", "createMarketSale"];

/// Where the marketplace contract lives and how to talk to it.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    address: Address,
    abi: Value,
}

impl Deployment {
    /// Fails if the interface description misses any of the [REQUIRED_METHODS].
    pub fn new(address: Address, abi: Value) -> Result<Self> {
        // Build artifacts wrap the interface description in an object
        let abi = match abi {
            Value::Object(mut artifact) if artifact.contains_key("abi") => artifact
                .remove("abi")
                .unwrap_or(Value::Null),
            abi => abi,
        };
        if !abi.is_array() {
            bail!("Contract interface description is not a JSON array");
        }
        let deployment = Deployment { address, abi };
        for method in REQUIRED_METHODS {
            if !deployment.has_function(method) {
                bail!("Contract interface description is missing function {method}");
            }
        }
        Ok(deployment)
    }

    pub fn from_abi_json(address: Address, abi_json: &str) -> Result<Self> {
        let abi = serde_json::from_str(abi_json)
            .context("Contract interface description is not valid JSON")?;
        Self::new(address, abi)
    }

    pub fn from_abi_file(address: Address, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let abi_json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_abi_json(address, &abi_json)
    }

    /// Reads the address from `MARKETPLACE_ADDRESS` and the interface description from the file
    /// at `MARKETPLACE_ABI`.
    pub fn from_env() -> Result<Self> {
        let address = env::var(ADDRESS_VAR)
            .with_context(|| format!("{ADDRESS_VAR} is not set"))?
            .parse()?;
        let abi_path = env::var(ABI_VAR).with_context(|| format!("{ABI_VAR} is not set"))?;
        Self::from_abi_file(address, abi_path)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn abi(&self) -> &Value {
        &self.abi
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.abi.as_array().is_some_and(|entries| {
            entries.iter().any(|entry| {
                entry["type"].as_str().unwrap_or("function") == "function"
                    && entry["name"].as_str() == Some(name)
            })
        })
    }
}
