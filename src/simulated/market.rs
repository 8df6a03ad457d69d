// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::common::{Address, MarketItem, TransactionReceipt};
use crate::api::request::SaleRequest;
use crate::api::{MarketContract, PendingTransaction};
use anyhow::{Result, anyhow, format_err};
use async_trait::async_trait;
use bigdecimal::num_bigint::BigUint;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// A call received by a [SimulatedMarket], in the order it was received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContractCall {
    FetchMarketItems,
    TokenUri(u64),
    CreateMarketSale(SaleRequest),
    Confirm(String),
}

/// An in-memory marketplace contract.
///
/// Listed items are owned by the contract until sold. Sales only take effect once the pending
/// transaction returned by [MarketContract::create_market_sale] is awaited.
#[derive(Clone, Debug)]
pub struct SimulatedMarket {
    state: Arc<Mutex<MarketState>>,
}

#[derive(Debug)]
struct MarketState {
    contract_address: Address,
    entries: Vec<MarketEntry>,
    calls: Vec<ContractCall>,
    receipts: Vec<TransactionReceipt>,
}

#[derive(Clone, Debug)]
struct MarketEntry {
    item: MarketItem,
    token_uri: String,
    sold: bool,
}

pub struct SimulatedMarketBuilder {
    contract_address: Address,
    entries: Vec<MarketEntry>,
}

impl SimulatedMarketBuilder {
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            entries: Vec::new(),
        }
    }

    /// Lists a token for sale, the token id has to be unique.
    pub fn list_item(
        &mut self,
        token_id: u64,
        seller: Address,
        price: BigUint,
        token_uri: &str,
    ) -> &mut Self {
        self.entries.retain(|entry| entry.item.token_id != token_id);
        self.entries.push(MarketEntry {
            item: MarketItem {
                token_id,
                price,
                seller,
                owner: self.contract_address.clone(),
            },
            token_uri: token_uri.into(),
            sold: false,
        });
        self
    }

    pub fn build(&self) -> SimulatedMarket {
        SimulatedMarket {
            state: Arc::new(Mutex::new(MarketState {
                contract_address: self.contract_address.clone(),
                entries: self.entries.clone(),
                calls: Vec::new(),
                receipts: Vec::new(),
            })),
        }
    }
}

impl SimulatedMarket {
    pub fn contract_address(&self) -> Result<Address> {
        Ok(self.state()?.contract_address.clone())
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Result<Vec<ContractCall>> {
        Ok(self.state()?.calls.clone())
    }

    /// Returns the receipts of all confirmed sales.
    pub fn receipts(&self) -> Result<Vec<TransactionReceipt>> {
        Ok(self.state()?.receipts.clone())
    }

    /// Returns the item of the given token, sold or not.
    pub fn get_item(&self, token_id: u64) -> Result<MarketItem> {
        let state = self.state()?;
        let entry = state.find_entry(token_id)?;
        Ok(entry.item.clone())
    }

    fn state(&self) -> Result<MutexGuard<'_, MarketState>> {
        lock(&self.state)
    }
}

impl MarketState {
    fn find_entry(&self, token_id: u64) -> Result<&MarketEntry> {
        self.entries
            .iter()
            .find(|entry| entry.item.token_id == token_id)
            .ok_or_else(|| format_err!("Token {} does not exist", token_id))
    }

    fn find_entry_mut(&mut self, token_id: u64) -> Result<&mut MarketEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.item.token_id == token_id)
            .ok_or_else(|| format_err!("Token {} does not exist", token_id))
    }

    fn check_sale(&self, req: &SaleRequest) -> Result<()> {
        let entry = self.find_entry(req.token_id)?;
        if entry.sold {
            return Err(format_err!("Token {} has already been sold", req.token_id));
        }
        if entry.item.price != req.value {
            return Err(anyhow!(
                "Please submit the asking price in order to complete the purchase"
            ));
        }
        Ok(())
    }
}

fn lock(state: &Mutex<MarketState>) -> Result<MutexGuard<'_, MarketState>> {
    state
        .lock()
        .map_err(|_| anyhow!("Simulated market state is poisoned"))
}

#[async_trait]
impl MarketContract for SimulatedMarket {
    async fn fetch_market_items(&self) -> Result<Vec<MarketItem>> {
        let mut state = self.state()?;
        state.calls.push(ContractCall::FetchMarketItems);
        let items = state
            .entries
            .iter()
            .filter(|entry| !entry.sold)
            .map(|entry| entry.item.clone())
            .collect();
        Ok(items)
    }

    async fn token_uri(&self, token_id: u64) -> Result<String> {
        let mut state = self.state()?;
        state.calls.push(ContractCall::TokenUri(token_id));
        let token_uri = state.find_entry(token_id)?.token_uri.clone();
        Ok(token_uri)
    }

    async fn create_market_sale(&self, req: SaleRequest) -> Result<Box<dyn PendingTransaction>> {
        let mut state = self.state()?;
        state.calls.push(ContractCall::CreateMarketSale(req.clone()));
        state.check_sale(&req)?;
        Ok(Box::new(SimulatedTransaction {
            hash: format!("0x{}", Uuid::new_v4().simple()),
            request: req,
            state: Arc::clone(&self.state),
        }))
    }
}

struct SimulatedTransaction {
    hash: String,
    request: SaleRequest,
    state: Arc<Mutex<MarketState>>,
}

#[async_trait]
impl PendingTransaction for SimulatedTransaction {
    fn hash(&self) -> &str {
        &self.hash
    }

    async fn wait(self: Box<Self>) -> Result<TransactionReceipt> {
        let mut state = lock(&self.state)?;
        state.calls.push(ContractCall::Confirm(self.hash.clone()));
        // Another sale of the same token may have been confirmed in the meantime
        state.check_sale(&self.request)?;

        let entry = state.find_entry_mut(self.request.token_id)?;
        entry.sold = true;
        entry.item.owner = self.request.buyer.clone();

        let receipt = TransactionReceipt {
            transaction_hash: self.hash.clone(),
            token_id: self.request.token_id,
            buyer: self.request.buyer.clone(),
            value: self.request.value.clone(),
            confirmed_at: Utc::now(),
        };
        state.receipts.push(receipt.clone());
        Ok(receipt)
    }
}
