// SPDX-License-Identifier: GPL-3.0-or-later

use anyhow::Result;
use bigdecimal::num_bigint::BigUint;
use ironmarket::api::common::{Address, TokenMetadata};
use ironmarket::config::Deployment;
use ironmarket::simulated::{SimulatedMarketBuilder, SimulatedMetadata, SimulatedWallet};
use ironmarket::units::parse_ether;
use ironmarket::{MarketplaceView, logging};
use std::str::FromStr;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    // Use the configured deployment address if there is one
    let market_address = match Deployment::from_env() {
        Ok(deployment) => deployment.address().clone(),
        Err(err) => {
            warn!("Using the default market address: {err:#}");
            Address::from_str("0x5fbdb2315678afecb367f032d93f642f64180aa3")?
        }
    };
    let seller = Address::from_str("0x70997970c51812dc3a010c7d01b50e0d17dc79c8")?;
    let buyer = Address::from_str("0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc")?;

    // List two tokens for sale
    let market = SimulatedMarketBuilder::new(market_address)
        .list_item(1, seller.clone(), parse_ether("1")?, "ipfs://token/1")
        .list_item(2, seller, parse_ether("0.25")?, "ipfs://token/2")
        .build();

    let mut metadata = SimulatedMetadata::new();
    metadata
        .insert("ipfs://token/1", token("ipfs://image/1.png", "Iron Fox", "A fox forged in iron"))
        .insert("ipfs://token/2", token("ipfs://image/2.png", "Rust Owl", "Slightly oxidised"));

    let wallet = SimulatedWallet::new(vec![buyer]);
    let mut view = MarketplaceView::new(market.clone(), metadata).with_wallet(wallet);

    view.start().await;
    println!("{}\n", view.render());

    let listing = view.listings()[0].clone();
    if let Some(receipt) = view.buy_listing(&listing).await {
        println!(
            "Bought token {} for {} wei in transaction {} at {}\n",
            receipt.token_id, receipt.value, receipt.transaction_hash, receipt.confirmed_at
        );
    }
    println!("{}", view.render());

    // The second listing is bought with the wrong amount, the failure is only logged
    let mut listing = view.listings()[0].clone();
    listing.price = "0.1".into();
    assert!(view.buy_listing(&listing).await.is_none());
    assert_eq!(market.receipts()?.len(), 1);
    assert_eq!(market.get_item(2)?.price, BigUint::from(250_000_000_000_000_000u64));

    Ok(())
}

fn token(image: &str, name: &str, description: &str) -> TokenMetadata {
    TokenMetadata {
        image: image.into(),
        name: name.into(),
        description: description.into(),
    }
}
