// SPDX-License-Identifier: GPL-3.0-or-later

use crate::api::Wallet;
use crate::api::common::Address;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

/// A wallet holding a fixed set of accounts.
///
/// Accounts are only listed after the user granted access, either up front with
/// [SimulatedWallet::authorized] or through [Wallet::request_accounts].
#[derive(Debug)]
pub struct SimulatedWallet {
    accounts: Vec<Address>,
    authorized: AtomicBool,
    rejects_requests: bool,
}

impl SimulatedWallet {
    pub fn new(accounts: Vec<Address>) -> Self {
        Self {
            accounts,
            authorized: AtomicBool::new(false),
            rejects_requests: false,
        }
    }

    /// A wallet whose user already granted access.
    pub fn authorized(accounts: Vec<Address>) -> Self {
        Self {
            authorized: AtomicBool::new(true),
            ..Self::new(accounts)
        }
    }

    /// A wallet whose user rejects every access request.
    pub fn rejecting(accounts: Vec<Address>) -> Self {
        Self {
            rejects_requests: true,
            ..Self::new(accounts)
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Wallet for SimulatedWallet {
    async fn list_accounts(&self) -> Result<Vec<Address>> {
        if self.is_authorized() {
            Ok(self.accounts.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn request_accounts(&self) -> Result<Vec<Address>> {
        if self.rejects_requests {
            bail!("User rejected the request.");
        }
        self.authorized.store(true, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }
}
