//! Sync status model exposed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Balances observed in one fetch cycle.
///
/// Both amounts always originate from the same cycle; a partially fetched
/// snapshot is never published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSnapshot {
	/// Native balance in whole native units.
	pub native_amount: f64,
	/// Balance of the configured token; zero when no holding account exists.
	pub token_amount: f64,
	/// Completion time of the fetch cycle that produced this snapshot.
	pub observed_at: DateTime<Utc>,
}

/// Current state of balance synchronization.
///
/// Exactly one value is current at any time. The synchronizer is the only
/// writer; readers subscribe and never write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SyncStatus {
	/// No session, no fetch in flight, no stale data displayed.
	Idle,
	/// A fetch cycle is in flight for the connected account.
	Syncing,
	/// Both queries completed for the still-current account.
	Loaded(BalanceSnapshot),
	/// Either query failed; a later session transition triggers a fresh attempt.
	Failed(String),
}

impl SyncStatus {
	/// Whether this status ends a fetch cycle.
	pub fn is_terminal(&self) -> bool {
		matches!(self, SyncStatus::Loaded(_) | SyncStatus::Failed(_))
	}
}

impl fmt::Display for SyncStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SyncStatus::Idle => write!(f, "wallet disconnected"),
			SyncStatus::Syncing => write!(f, "fetching balances..."),
			SyncStatus::Loaded(snapshot) => write!(
				f,
				"balances loaded at {}",
				snapshot.observed_at.format("%Y-%m-%d %H:%M:%S UTC")
			),
			SyncStatus::Failed(reason) => write!(f, "error: {}", reason),
		}
	}
}
