// Copyright (C) 2025 Agostinho Junior
// SPDX-License-Identifier: GPL-3.0-or-later

pub use metadata::HttpMetadataSource;
mod metadata;

pub use wallet::JsonRpcWallet;
mod wallet;
