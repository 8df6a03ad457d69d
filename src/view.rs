// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

pub use render::{Card, NO_ITEMS, Page};
mod render;

use crate::api::common::{Address, Listing, LoadState, MarketItem, TransactionReceipt};
use crate::api::request::SaleRequest;
use crate::api::{LogNotifier, MarketContract, MetadataSource, Notifier, Wallet};
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, error, info, warn};

pub const INSTALL_WALLET_ALERT: &str = "Please install MetaMask!";

/// The marketplace page: the connected account, the unsold listings and the load state.
///
/// Every operation catches its own failures and logs them, the view is left as it was before
/// the failing step.
pub struct MarketplaceView {
    wallet: Option<Box<dyn Wallet>>,
    contract: Box<dyn MarketContract>,
    metadata: Box<dyn MetadataSource>,
    notifier: Box<dyn Notifier>,
    account: Option<Address>,
    listings: Vec<Listing>,
    load_state: LoadState,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl MarketplaceView {
    /// Creates a view without a wallet provider, alerts go to the log.
    pub fn new<C, M>(contract: C, metadata: M) -> Self
    where
        C: MarketContract + 'static,
        M: MetadataSource + 'static,
    {
        MarketplaceView {
            wallet: None,
            contract: Box::new(contract),
            metadata: Box::new(metadata),
            notifier: Box::new(LogNotifier),
            account: None,
            listings: Vec::new(),
            load_state: LoadState::NotLoaded,
            last_loaded_at: None,
        }
    }

    pub fn with_wallet<W>(mut self, wallet: W) -> Self
    where
        W: Wallet + 'static,
    {
        self.wallet = Some(Box::new(wallet));
        self
    }

    pub fn with_notifier<N>(mut self, notifier: N) -> Self
    where
        N: Notifier + 'static,
    {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn account(&self) -> Option<&Address> {
        self.account.as_ref()
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }

    /// Connects the wallet, picks up an already authorized account and loads the listings.
    pub async fn start(&mut self) {
        self.connect_wallet().await;
        self.check_if_wallet_is_connected().await;
        if let Err(err) = self.load_listings().await {
            error!("Failed to load listings: {err:#}");
        }
    }

    /// Requests account access and keeps the first account granted.
    pub async fn connect_wallet(&mut self) {
        let Some(wallet) = &self.wallet else {
            self.notifier.alert(INSTALL_WALLET_ALERT);
            return;
        };
        match wallet.request_accounts().await {
            Ok(accounts) => {
                self.account = accounts.into_iter().next();
                match &self.account {
                    Some(account) => info!("Connected {account}"),
                    None => warn!("Wallet granted access to no accounts"),
                }
            }
            Err(err) => error!("Failed to connect wallet: {err:#}"),
        }
    }

    /// Picks up an account the user has already authorized, without prompting.
    pub async fn check_if_wallet_is_connected(&mut self) {
        let Some(wallet) = &self.wallet else {
            warn!("{INSTALL_WALLET_ALERT}");
            return;
        };
        match wallet.list_accounts().await {
            Ok(accounts) => {
                self.account = accounts.into_iter().next();
                match &self.account {
                    Some(account) => debug!("Found authorized account {account}"),
                    None => info!("No authorized account found"),
                }
            }
            Err(err) => error!("Failed to list wallet accounts: {err:#}"),
        }
    }

    /// Replaces the listings with the contract's unsold items, merged with their metadata.
    ///
    /// Metadata is fetched concurrently for all items. If any item fails the listings and the
    /// load state are left untouched.
    pub async fn load_listings(&mut self) -> Result<()> {
        let items = self
            .contract
            .fetch_market_items()
            .await
            .context("Failed to fetch market items")?;
        let listings = try_join_all(items.into_iter().map(|item| self.enrich(item))).await?;
        info!("Loaded {} listings", listings.len());
        self.listings = listings;
        self.load_state = LoadState::Loaded;
        self.last_loaded_at = Some(Utc::now());
        Ok(())
    }

    /// Buys the listing at its asking price and reloads once the purchase is confirmed.
    ///
    /// Returns the receipt of the confirmed purchase, or `None` if it failed.
    pub async fn buy_listing(&mut self, listing: &Listing) -> Option<TransactionReceipt> {
        let receipt = match self.purchase(listing).await {
            Ok(receipt) => receipt,
            Err(err) => {
                error!("Failed to buy token {}: {err:#}", listing.token_id);
                return None;
            }
        };
        if let Err(err) = self.load_listings().await {
            error!("Failed to reload listings: {err:#}");
        }
        Some(receipt)
    }

    /// Renders the current state of the view.
    pub fn render(&self) -> Page<'_> {
        Page::new(self.load_state, &self.listings)
    }

    async fn enrich(&self, item: MarketItem) -> Result<Listing> {
        let token_id = item.token_id;
        let token_uri = self
            .contract
            .token_uri(token_id)
            .await
            .with_context(|| format!("Failed to get the metadata URI of token {token_id}"))?;
        let metadata = self
            .metadata
            .fetch_metadata(&token_uri)
            .await
            .with_context(|| format!("Failed to fetch metadata of token {token_id}"))?;
        let listing = Listing::new(item, metadata);
        debug!(?listing, "Merged listing");
        Ok(listing)
    }

    async fn purchase(&self, listing: &Listing) -> Result<TransactionReceipt> {
        if self.wallet.is_none() {
            return Err(anyhow!("No wallet provider to sign the purchase"));
        }
        let buyer = self
            .account
            .clone()
            .ok_or_else(|| anyhow!("No connected account to sign the purchase"))?;
        let req = SaleRequest::for_listing(listing, buyer)?;
        let transaction = self.contract.create_market_sale(req).await?;
        info!(
            "Submitted purchase of token {} in transaction {}",
            listing.token_id,
            transaction.hash()
        );
        let receipt = transaction.wait().await?;
        info!(
            "Purchase of token {} confirmed in transaction {}",
            receipt.token_id, receipt.transaction_hash
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::TokenMetadata;
    use crate::simulated::{
        ContractCall, SimulatedMarket, SimulatedMarketBuilder, SimulatedMetadata, SimulatedWallet,
    };
    use async_trait::async_trait;
    use bigdecimal::num_bigint::BigUint;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::Barrier;

    const MARKET: &str = "0x000000000000000000000000000000000000beef";
    const SELLER: &str = "0x00000000000000000000000000000000000000aa";
    const BUYER: &str = "0x00000000000000000000000000000000000000bb";

    #[tokio::test]
    async fn empty_market_renders_no_items() -> Result<()> {
        let market = SimulatedMarketBuilder::new(address(MARKET)).build();
        let mut view = MarketplaceView::new(market, SimulatedMetadata::new());

        view.load_listings().await?;

        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(view.render(), Page::Empty);
        assert_eq!(view.render().to_string(), NO_ITEMS);
        Ok(())
    }

    #[tokio::test]
    async fn not_loaded_renders_empty_grid() {
        let market = SimulatedMarketBuilder::new(address(MARKET)).build();
        let view = MarketplaceView::new(market, SimulatedMetadata::new());

        assert_eq!(view.load_state(), LoadState::NotLoaded);
        assert_eq!(view.render(), Page::Grid(Vec::new()));
        assert!(view.last_loaded_at().is_none());
    }

    #[tokio::test]
    async fn load_listings_merges_metadata() -> Result<()> {
        let (market, metadata) = create_backends();
        let mut view = MarketplaceView::new(market, metadata);

        view.load_listings().await?;

        assert_eq!(
            view.listings(),
            &[
                Listing {
                    price: "1.0".into(),
                    token_id: 1,
                    seller: address(SELLER),
                    owner: address(MARKET),
                    image: "a.png".into(),
                    name: "N".into(),
                    description: "D".into(),
                },
                Listing {
                    price: "0.5".into(),
                    token_id: 2,
                    seller: address(SELLER),
                    owner: address(MARKET),
                    image: "b.png".into(),
                    name: "M".into(),
                    description: "E".into(),
                },
            ]
        );
        assert!(view.last_loaded_at().is_some());
        Ok(())
    }

    #[tokio::test]
    async fn failed_metadata_fetch_aborts_whole_load() -> Result<()> {
        let (market, _) = create_backends();
        let mut metadata = SimulatedMetadata::new();
        metadata.insert("https://meta.test/1.json", metadata_for("a.png", "N", "D"));
        let mut view = MarketplaceView::new(market, metadata);

        let err = view.load_listings().await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch metadata of token 2");
        assert!(view.listings().is_empty());
        assert_eq!(view.load_state(), LoadState::NotLoaded);
        Ok(())
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_listings() -> Result<()> {
        let (market, metadata) = create_backends();
        let failing = Arc::new(AtomicBool::new(false));
        let metadata = FlakyMetadata {
            inner: metadata,
            failing: Arc::clone(&failing),
        };
        let mut view = MarketplaceView::new(market, metadata);
        view.load_listings().await?;
        let loaded_at = view.last_loaded_at();

        failing.store(true, Ordering::SeqCst);
        assert!(view.load_listings().await.is_err());

        assert_eq!(view.listings().len(), 2);
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(view.last_loaded_at(), loaded_at);
        Ok(())
    }

    #[tokio::test]
    async fn metadata_is_fetched_concurrently() -> Result<()> {
        let (market, metadata) = create_backends();
        let metadata = BarrierMetadata {
            inner: metadata,
            barrier: Barrier::new(2),
        };
        let mut view = MarketplaceView::new(market, metadata);

        // Each fetch waits for the other one, a sequential load would never finish
        tokio::time::timeout(Duration::from_secs(5), view.load_listings()).await??;

        assert_eq!(view.listings().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn connect_without_wallet_alerts_user() {
        let (market, metadata) = create_backends();
        let notifier = RecordingNotifier::default();
        let mut view = MarketplaceView::new(market, metadata).with_notifier(notifier.clone());

        view.connect_wallet().await;
        view.check_if_wallet_is_connected().await;

        assert_eq!(notifier.alerts(), vec![INSTALL_WALLET_ALERT.to_string()]);
        assert!(view.account().is_none());
    }

    #[tokio::test]
    async fn connect_wallet_keeps_first_account() {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::new(vec![address(BUYER), address(SELLER)]);
        let mut view = MarketplaceView::new(market, metadata).with_wallet(wallet);

        view.connect_wallet().await;

        assert_eq!(view.account(), Some(&address(BUYER)));
    }

    #[tokio::test]
    async fn rejected_connection_leaves_account_empty() {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::rejecting(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market, metadata).with_wallet(wallet);

        view.connect_wallet().await;
        view.check_if_wallet_is_connected().await;

        assert!(view.account().is_none());
    }

    #[tokio::test]
    async fn check_picks_up_authorized_account() {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::authorized(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market, metadata).with_wallet(wallet);

        view.check_if_wallet_is_connected().await;

        assert_eq!(view.account(), Some(&address(BUYER)));
    }

    #[tokio::test]
    async fn wallet_steps_do_not_reset_load_state() -> Result<()> {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::new(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market, metadata).with_wallet(wallet);

        view.load_listings().await?;
        view.connect_wallet().await;
        view.check_if_wallet_is_connected().await;

        assert_eq!(view.load_state(), LoadState::Loaded);
        Ok(())
    }

    #[tokio::test]
    async fn start_connects_and_loads() {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::new(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market, metadata).with_wallet(wallet);

        view.start().await;

        assert_eq!(view.account(), Some(&address(BUYER)));
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(view.listings().len(), 2);
    }

    #[tokio::test]
    async fn buy_listing_pays_asking_price_and_reloads_after_confirmation() -> Result<()> {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::new(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market.clone(), metadata).with_wallet(wallet);
        view.start().await;
        let listing = view.listings()[0].clone();

        let receipt = view.buy_listing(&listing).await;

        let receipt = receipt.ok_or_else(|| anyhow!("Purchase failed"))?;
        let sale = SaleRequest::new(1, one_ether(), address(BUYER));
        let calls = market.calls()?;
        let sale_index = position(&calls, &ContractCall::CreateMarketSale(sale))?;
        let confirm_index = position(&calls, &ContractCall::Confirm(receipt.transaction_hash))?;
        assert!(sale_index < confirm_index);
        assert_eq!(calls[confirm_index + 1], ContractCall::FetchMarketItems);

        assert_eq!(view.listings().len(), 1);
        assert_eq!(view.listings()[0].token_id, 2);
        assert_eq!(market.get_item(1)?.owner, address(BUYER));
        Ok(())
    }

    #[tokio::test]
    async fn buy_listing_without_account_is_logged_only() -> Result<()> {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::rejecting(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market.clone(), metadata).with_wallet(wallet);
        view.start().await;
        let listing = view.listings()[0].clone();

        assert!(view.buy_listing(&listing).await.is_none());

        assert!(market.receipts()?.is_empty());
        assert_eq!(view.listings().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn buy_listing_without_wallet_is_logged_only() -> Result<()> {
        let (market, metadata) = create_backends();
        let mut view = MarketplaceView::new(market.clone(), metadata);
        view.start().await;
        let listing = view.listings()[0].clone();

        assert!(view.buy_listing(&listing).await.is_none());
        assert!(market.receipts()?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn rejected_purchase_does_not_reload() -> Result<()> {
        let (market, metadata) = create_backends();
        let wallet = SimulatedWallet::new(vec![address(BUYER)]);
        let mut view = MarketplaceView::new(market.clone(), metadata).with_wallet(wallet);
        view.start().await;
        let mut listing = view.listings()[0].clone();
        listing.price = "0.9".into();

        assert!(view.buy_listing(&listing).await.is_none());

        let calls = market.calls()?;
        assert!(matches!(calls.last(), Some(ContractCall::CreateMarketSale(_))));
        assert!(market.receipts()?.is_empty());
        Ok(())
    }

    fn create_backends() -> (SimulatedMarket, SimulatedMetadata) {
        let market = SimulatedMarketBuilder::new(address(MARKET))
            .list_item(1, address(SELLER), one_ether(), "https://meta.test/1.json")
            .list_item(2, address(SELLER), one_ether() / 2u32, "https://meta.test/2.json")
            .build();
        let mut metadata = SimulatedMetadata::new();
        metadata
            .insert("https://meta.test/1.json", metadata_for("a.png", "N", "D"))
            .insert("https://meta.test/2.json", metadata_for("b.png", "M", "E"));
        (market, metadata)
    }

    fn metadata_for(image: &str, name: &str, description: &str) -> TokenMetadata {
        TokenMetadata {
            image: image.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    fn address(s: &str) -> Address {
        Address::from_str(s).unwrap()
    }

    fn one_ether() -> BigUint {
        BigUint::from(10u32).pow(18)
    }

    fn position(calls: &[ContractCall], call: &ContractCall) -> Result<usize> {
        calls
            .iter()
            .position(|c| c == call)
            .ok_or_else(|| anyhow!("Missing call {call:?}"))
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        alerts: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNotifier {
        fn alerts(&self) -> Vec<String> {
            self.alerts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.into());
        }
    }

    struct BarrierMetadata {
        inner: SimulatedMetadata,
        barrier: Barrier,
    }

    #[async_trait]
    impl MetadataSource for BarrierMetadata {
        async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata> {
            self.barrier.wait().await;
            self.inner.fetch_metadata(uri).await
        }
    }

    struct FlakyMetadata {
        inner: SimulatedMetadata,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl MetadataSource for FlakyMetadata {
        async fn fetch_metadata(&self, uri: &str) -> Result<TokenMetadata> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(anyhow!("Metadata server is down"));
            }
            self.inner.fetch_metadata(uri).await
        }
    }
}
