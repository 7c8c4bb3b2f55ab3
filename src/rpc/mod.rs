//! Ledger RPC boundary
//!
//! This module provides the client and types for the remote ledger-query
//! endpoint. The endpoint answers two read-only, idempotent queries: the
//! native balance of an account, and the token-holding accounts of an owner
//! filtered by mint. The synchronizer consumes it through the `LedgerQuery`
//! trait so tests can substitute the network.

/// JSON-RPC client for the ledger query endpoint
mod client;
/// Type definitions for RPC data structures
mod types;

pub use client::SolanaRpcClient;
pub use types::*;

use async_trait::async_trait;

/// Read-only ledger queries the balance synchronizer depends on.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
	/// Native balance of `account`, in the smallest native unit.
	async fn native_balance(&self, account: &AccountId) -> Result<u64, LedgerRpcError>;

	/// Token-holding accounts owned by `owner`, filtered by `mint`.
	async fn token_accounts_by_owner(
		&self,
		owner: &AccountId,
		mint: &TokenMint,
	) -> Result<Vec<TokenHolding>, LedgerRpcError>;
}
