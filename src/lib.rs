// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

pub mod api;
pub mod config;
pub mod logging;
pub mod simulated;
pub mod units;
pub mod view;

#[cfg(feature = "live")]
pub mod live;

pub use view::MarketplaceView;
