use crate::rpc::AccountId;

/// Normalized wallet session state.
///
/// Owned exclusively by the session tracker; the synchronizer only reads it
/// and reacts to transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletSession {
	Disconnected,
	Connected(AccountId),
}

impl WalletSession {
	pub fn is_connected(&self) -> bool {
		matches!(self, WalletSession::Connected(_))
	}

	/// The connected account identifier, if any.
	pub fn account(&self) -> Option<&AccountId> {
		match self {
			WalletSession::Connected(id) => Some(id),
			WalletSession::Disconnected => None,
		}
	}
}

/// Errors surfaced by a wallet provider while establishing a connection.
///
/// These belong to the provider boundary: a failed connect leaves the session
/// `Disconnected` and is never a tracker-level error.
#[derive(Debug, thiserror::Error)]
pub enum WalletProviderError {
	#[error("wallet provider unavailable: {0}")]
	Unavailable(String),

	#[error("provider exposed no account")]
	NoAccount,
}
