// SPDX-License-Identifier: GPL-3.0-or-later

use tracing::warn;

/// Surfaces a message directly to the user, outside of the diagnostic log.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier for headless use, alerts end up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(target: "ironmarket::alert", "{message}");
    }
}
