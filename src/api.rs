// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

pub use wallet::Wallet;
mod wallet;

pub use contract::{MarketContract, PendingTransaction};
mod contract;

pub use metadata::MetadataSource;
mod metadata;

pub use notifier::{LogNotifier, Notifier};
mod notifier;

pub mod common;
pub mod request;
