// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

pub use market::{ContractCall, SimulatedMarket, SimulatedMarketBuilder};
mod market;

pub use wallet::SimulatedWallet;
mod wallet;

pub use metadata::SimulatedMetadata;
mod metadata;
