//! Types for the ledger JSON-RPC boundary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account address on the ledger, as handed out by the wallet
/// provider. Immutable once obtained; compared by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
	pub fn new(address: impl Into<String>) -> Self {
		Self(address.into())
	}

	/// Get the address as a string for RPC calls
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Mint address of the fungible token of interest. Configured once and
/// constant for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenMint(String);

impl TokenMint {
	pub fn new(address: impl Into<String>) -> Self {
		Self(address.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TokenMint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One token-holding account's balance as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenHolding {
	/// Raw amount in the token's smallest unit, stringified by the endpoint.
	pub amount: String,
	/// Decimal places of the token's mint.
	pub decimals: u8,
	/// Decimal amount, endpoint-reported or computed from the raw amount.
	pub ui_amount: f64,
}

/// Error types for ledger RPC queries
#[derive(Debug, thiserror::Error)]
pub enum LedgerRpcError {
	#[error("RPC error: {0}")]
	Rpc(String),

	#[error("HTTP error: {0}")]
	Http(#[from] reqwest::Error),

	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("malformed response: {0}")]
	Malformed(String),
}
