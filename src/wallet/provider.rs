//! Consumed wallet-provider boundary.

use async_trait::async_trait;

use super::types::WalletProviderError;
use crate::rpc::AccountId;

/// External wallet provider the session tracker observes.
///
/// The exact transport is provider-defined; the core only consumes "is
/// connected" plus the exposed account identifier.
#[async_trait]
pub trait WalletProvider: Send + Sync {
	/// Establish a connection and return the exposed account.
	async fn connect(&mut self) -> Result<AccountId, WalletProviderError>;

	/// Tear down the connection.
	async fn disconnect(&mut self);

	/// The currently exposed account, if connected.
	fn current_account(&self) -> Option<AccountId>;
}

/// Provider backed by a fixed account address, for headless runs.
pub struct StaticAccountProvider {
	account: AccountId,
	connected: bool,
}

impl StaticAccountProvider {
	pub fn new(account: AccountId) -> Self {
		Self {
			account,
			connected: false,
		}
	}
}

#[async_trait]
impl WalletProvider for StaticAccountProvider {
	async fn connect(&mut self) -> Result<AccountId, WalletProviderError> {
		if self.account.as_str().is_empty() {
			return Err(WalletProviderError::NoAccount);
		}
		self.connected = true;
		Ok(self.account.clone())
	}

	async fn disconnect(&mut self) {
		self.connected = false;
	}

	fn current_account(&self) -> Option<AccountId> {
		self.connected.then(|| self.account.clone())
	}
}
