// Wallet session - connection state, persistence and balance display

use std::sync::Arc;
use tracing::{info, warn};

use crate::api_client::{BalanceApi, BalanceOutcome};
use crate::error::{SessionError, SessionResult};
use crate::provider::WalletProvider;
use crate::storage::SessionStore;

pub const INSTALL_NOTICE: &str = "Please install Phantom Wallet to use this feature.";
pub const CONNECT_FAILED_NOTICE: &str = "Wallet connection failed. Please try again.";
pub const SAVE_FAILED_NOTICE: &str = "Could not remember the wallet. Please try again.";
pub const CLEAR_FAILED_NOTICE: &str = "Could not forget the wallet. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Disconnected,
    Connected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BalanceDisplay {
    /// Nothing fetched (disconnected)
    Unknown,
    Loading,
    Value(f64),
    /// The API answered without a balance
    NotFound,
    Error,
}

/// Everything the user sees, derived from the session
#[derive(Debug, Clone, PartialEq)]
pub struct WalletView {
    pub status: String,
    pub toggle_label: String,
    pub balance_label: String,
    pub retry_visible: bool,
    /// One-shot message for the user (missing wallet, rejected connection)
    pub notice: Option<String>,
}

type Renderer = Box<dyn Fn(&WalletView) + Send + Sync>;

pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    store: Arc<dyn SessionStore>,
    api: Arc<dyn BalanceApi>,
    symbol: String,
    state: SessionState,
    balance: BalanceDisplay,
    notice: Option<String>,
    renderer: Option<Renderer>,
}

impl WalletSession {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        store: Arc<dyn SessionStore>,
        api: Arc<dyn BalanceApi>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            store,
            api,
            symbol: symbol.into(),
            state: SessionState::Disconnected,
            balance: BalanceDisplay::Unknown,
            notice: None,
            renderer: None,
        }
    }

    /// Called with the new view after every change
    pub fn with_renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&WalletView) + Send + Sync + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn balance(&self) -> &BalanceDisplay {
        &self.balance
    }

    pub fn wallet(&self) -> Option<&str> {
        match &self.state {
            SessionState::Connected(wallet) => Some(wallet),
            SessionState::Disconnected => None,
        }
    }

    /// Adopt the stored wallet, if any, without fetching its balance
    pub fn resume(&mut self) -> bool {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Could not read stored session: {}", e);
                None
            }
        };

        match stored {
            Some(wallet) => {
                info!("Restoring session for {}", wallet);
                self.state = SessionState::Connected(wallet);
                self.notice = None;
                true
            }
            None => false,
        }
    }

    /// Resume a previously stored wallet without asking the provider again
    ///
    /// Returns true when a stored wallet was found (and a fetch issued).
    pub async fn restore(&mut self) -> bool {
        let resumed = self.resume();
        self.render();
        if resumed {
            self.fetch_balance().await;
        }
        resumed
    }

    /// Ask the provider for access and, on success, fetch the balance
    pub async fn connect(&mut self) -> SessionResult<()> {
        if !self.provider.is_available() {
            self.notice = Some(INSTALL_NOTICE.to_string());
            self.render();
            return Err(SessionError::WalletNotInstalled);
        }

        match self.provider.request_connection().await {
            Ok(wallet) => {
                info!("Connected {} via {}", wallet, self.provider.name());
                if let Err(e) = self.store.save(&wallet) {
                    warn!("Could not persist session for {}: {}", wallet, e);
                    self.notice = Some(SAVE_FAILED_NOTICE.to_string());
                    self.render();
                    return Err(e);
                }
                self.enter_connected(wallet).await;
                Ok(())
            }
            Err(e) => {
                warn!("Wallet connection failed: {}", e);
                self.notice = Some(CONNECT_FAILED_NOTICE.to_string());
                self.render();
                Err(e)
            }
        }
    }

    /// Forget the wallet; the session stays connected if the store cannot be cleared
    pub fn disconnect(&mut self) -> SessionResult<()> {
        if let Err(e) = self.store.clear() {
            warn!("Could not clear stored session: {}", e);
            self.notice = Some(CLEAR_FAILED_NOTICE.to_string());
            self.render();
            return Err(e);
        }

        self.state = SessionState::Disconnected;
        self.balance = BalanceDisplay::Unknown;
        self.notice = None;
        self.render();
        Ok(())
    }

    pub async fn toggle(&mut self) -> SessionResult<()> {
        if matches!(self.state, SessionState::Connected(_)) {
            self.disconnect()
        } else {
            self.connect().await
        }
    }

    /// Refresh the displayed balance; a no-op while disconnected
    ///
    /// Always ends in a settled display, never in `Loading`.
    pub async fn fetch_balance(&mut self) -> &BalanceDisplay {
        let wallet = match &self.state {
            SessionState::Connected(wallet) => wallet.clone(),
            SessionState::Disconnected => return &self.balance,
        };

        self.balance = BalanceDisplay::Loading;
        self.render();

        self.balance = match self.api.fetch_balance(&wallet).await {
            Ok(BalanceOutcome::Balance(amount)) => BalanceDisplay::Value(amount),
            Ok(BalanceOutcome::NotFound) => BalanceDisplay::NotFound,
            Err(e) => {
                warn!("Balance fetch for {} failed: {}", wallet, e);
                BalanceDisplay::Error
            }
        };
        self.render();

        &self.balance
    }

    pub fn view(&self) -> WalletView {
        let (status, toggle_label, retry_visible) = match &self.state {
            SessionState::Connected(wallet) => (
                format!("Connected: {}", short_address(wallet)),
                "Disconnect Wallet",
                true,
            ),
            SessionState::Disconnected => ("Wallet not connected".to_string(), "Connect Wallet", false),
        };

        let balance_label = match &self.balance {
            BalanceDisplay::Unknown => "Balance: -".to_string(),
            BalanceDisplay::Loading => "Balance: ...".to_string(),
            BalanceDisplay::Value(amount) => format!("Balance: {} {}", amount, self.symbol),
            BalanceDisplay::NotFound => "Balance not found".to_string(),
            BalanceDisplay::Error => "Error fetching balance".to_string(),
        };

        WalletView {
            status,
            toggle_label: toggle_label.to_string(),
            balance_label,
            retry_visible,
            notice: self.notice.clone(),
        }
    }

    async fn enter_connected(&mut self, wallet: String) {
        self.state = SessionState::Connected(wallet);
        self.notice = None;
        self.render();
        self.fetch_balance().await;
    }

    fn render(&self) {
        if let Some(renderer) = &self.renderer {
            renderer(&self.view());
        }
    }
}

/// `ABCD...WXYZ`
fn short_address(wallet: &str) -> String {
    let chars: Vec<char> = wallet.chars().collect();
    if chars.len() <= 8 {
        return wallet.to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("So11111111111111111111111111111111111111112"),
            "So11...1112"
        );
        assert_eq!(short_address("abc"), "abc");
    }
}
