//! Balance synchronizer state machine.
//!
//! Owns the `SyncStatus` value and keeps it consistent with the most recent
//! wallet session. Every transition into `Connected` launches one fetch cycle
//! against the ledger; a later transition supersedes any cycle still in
//! flight, and a superseded cycle's eventual result is discarded rather than
//! applied, whichever way it resolved.
//!
//! Status transitions and snapshot construction run synchronously between the
//! two await points (issuing and awaiting the queries), so the status value
//! needs no locking beyond the watch channel itself.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use super::status::{BalanceSnapshot, SyncStatus};
use crate::rpc::{AccountId, LedgerQuery, TokenMint};
use crate::utils::{NATIVE_DECIMALS, amount_to_decimal, format_token_amount};
use crate::wallet::session::SessionListener;
use crate::wallet::types::WalletSession;

/// Drives the asynchronous two-part balance fetch and owns the status value.
///
/// Cheap to clone; clones share the same status channel and generation
/// counter.
#[derive(Clone)]
pub struct BalanceSynchronizer {
	inner: Arc<SyncInner>,
}

struct SyncInner {
	ledger: Arc<dyn LedgerQuery>,
	token_mint: TokenMint,
	/// Generation marker for in-flight cycles. Bumped on every session
	/// transition; a cycle publishes only while its generation is current.
	generation: AtomicU64,
	status_tx: watch::Sender<SyncStatus>,
}

impl BalanceSynchronizer {
	pub fn new(ledger: Arc<dyn LedgerQuery>, token_mint: TokenMint) -> Self {
		let (status_tx, _) = watch::channel(SyncStatus::Idle);

		Self {
			inner: Arc::new(SyncInner {
				ledger,
				token_mint,
				generation: AtomicU64::new(0),
				status_tx,
			}),
		}
	}

	/// The current sync status.
	pub fn status(&self) -> SyncStatus {
		self.inner.status_tx.borrow().clone()
	}

	/// Read-only subscription to status transitions.
	pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
		self.inner.status_tx.subscribe()
	}
}

impl SessionListener for BalanceSynchronizer {
	fn session_changed(&self, session: &WalletSession) {
		match session {
			WalletSession::Disconnected => {
				// Supersede any in-flight cycle and drop back to idle.
				self.inner.generation.fetch_add(1, Ordering::SeqCst);
				self.inner.status_tx.send_replace(SyncStatus::Idle);
			}
			WalletSession::Connected(account) => {
				let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
				self.inner.status_tx.send_replace(SyncStatus::Syncing);

				info!("Starting fetch cycle {} for account {}", generation, account);

				let inner = self.inner.clone();
				let account = account.clone();
				tokio::spawn(async move {
					let status = inner.run_fetch_cycle(&account).await;

					if inner.generation.load(Ordering::SeqCst) == generation {
						inner.status_tx.send_replace(status);
					} else {
						debug!(
							"Discarding superseded fetch cycle {} for account {}",
							generation, account
						);
					}
				});
			}
		}
	}

	fn name(&self) -> &'static str {
		"BalanceSynchronizer"
	}
}

impl SyncInner {
	/// Run one fetch cycle for `account`.
	///
	/// Both queries must return before the cycle resolves; a partial success
	/// is never published.
	async fn run_fetch_cycle(&self, account: &AccountId) -> SyncStatus {
		let (native, holdings) = tokio::join!(
			self.ledger.native_balance(account),
			self.ledger.token_accounts_by_owner(account, &self.token_mint),
		);

		let lamports = match native {
			Ok(lamports) => lamports,
			Err(e) => {
				error!("Native balance query failed: {}", e);
				return SyncStatus::Failed(e.to_string());
			}
		};

		let holdings = match holdings {
			Ok(holdings) => holdings,
			Err(e) => {
				error!("Token account query failed: {}", e);
				return SyncStatus::Failed(e.to_string());
			}
		};

		// No holding account means a balance of exactly zero. When several
		// holding accounts exist the first one wins; amounts are not
		// aggregated.
		let token_amount = holdings.first().map(|h| h.ui_amount).unwrap_or(0.0);

		info!(
			"Fetch cycle complete: native {} / token {}",
			format_token_amount(lamports, NATIVE_DECIMALS),
			token_amount
		);

		SyncStatus::Loaded(BalanceSnapshot {
			native_amount: amount_to_decimal(lamports, NATIVE_DECIMALS),
			token_amount,
			observed_at: Utc::now(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rpc::{LedgerRpcError, TokenHolding};
	use std::collections::HashMap;
	use std::time::Duration;

	/// Programmed outcome for one account.
	#[derive(Clone)]
	struct StubAccount {
		delay: Duration,
		native: Result<u64, String>,
		holdings: Result<Vec<TokenHolding>, String>,
	}

	impl StubAccount {
		fn loaded(native: u64, holdings: Vec<TokenHolding>) -> Self {
			Self {
				delay: Duration::ZERO,
				native: Ok(native),
				holdings: Ok(holdings),
			}
		}

		fn after(mut self, delay: Duration) -> Self {
			self.delay = delay;
			self
		}
	}

	struct StubLedger {
		accounts: HashMap<String, StubAccount>,
	}

	impl StubLedger {
		fn new() -> Self {
			Self {
				accounts: HashMap::new(),
			}
		}

		fn with_account(mut self, id: &str, account: StubAccount) -> Self {
			self.accounts.insert(id.to_string(), account);
			self
		}

		fn lookup(&self, id: &AccountId) -> StubAccount {
			self.accounts
				.get(id.as_str())
				.cloned()
				.expect("query for unprogrammed account")
		}
	}

	#[async_trait::async_trait]
	impl LedgerQuery for StubLedger {
		async fn native_balance(&self, account: &AccountId) -> Result<u64, LedgerRpcError> {
			let programmed = self.lookup(account);
			tokio::time::sleep(programmed.delay).await;
			programmed.native.map_err(LedgerRpcError::Rpc)
		}

		async fn token_accounts_by_owner(
			&self,
			owner: &AccountId,
			_mint: &TokenMint,
		) -> Result<Vec<TokenHolding>, LedgerRpcError> {
			let programmed = self.lookup(owner);
			tokio::time::sleep(programmed.delay).await;
			programmed.holdings.map_err(LedgerRpcError::Rpc)
		}
	}

	fn holding(amount: &str, decimals: u8, ui_amount: f64) -> TokenHolding {
		TokenHolding {
			amount: amount.to_string(),
			decimals,
			ui_amount,
		}
	}

	fn synchronizer_with(ledger: StubLedger) -> BalanceSynchronizer {
		BalanceSynchronizer::new(Arc::new(ledger), TokenMint::new("Mint11111111111111111111111111111111111111"))
	}

	fn connected(id: &str) -> WalletSession {
		WalletSession::Connected(AccountId::new(id))
	}

	/// Let spawned cycles run to completion under paused virtual time.
	async fn settle() {
		tokio::time::sleep(Duration::from_secs(60)).await;
	}

	fn expect_loaded(status: SyncStatus) -> BalanceSnapshot {
		match status {
			SyncStatus::Loaded(snapshot) => snapshot,
			status => panic!("expected Loaded, got {:?}", status),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn loads_native_and_token_balances() {
		let ledger = StubLedger::new().with_account(
			"ACC1",
			StubAccount::loaded(2_500_000_000, vec![holding("42000000000", 9, 42.0)]),
		);
		let sync = synchronizer_with(ledger);

		assert_eq!(sync.status(), SyncStatus::Idle);

		sync.session_changed(&connected("ACC1"));
		assert_eq!(sync.status(), SyncStatus::Syncing);

		settle().await;

		let snapshot = expect_loaded(sync.status());
		assert_eq!(snapshot.native_amount, 2.5);
		assert_eq!(snapshot.token_amount, 42.0);
	}

	#[tokio::test(start_paused = true)]
	async fn empty_token_result_is_zero_balance() {
		let ledger =
			StubLedger::new().with_account("ACC1", StubAccount::loaded(1_000_000_000, vec![]));
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		settle().await;

		let snapshot = expect_loaded(sync.status());
		assert_eq!(snapshot.native_amount, 1.0);
		assert_eq!(snapshot.token_amount, 0.0);
	}

	#[tokio::test(start_paused = true)]
	async fn first_holding_wins_when_several_exist() {
		let ledger = StubLedger::new().with_account(
			"ACC1",
			StubAccount::loaded(
				1_000_000_000,
				vec![holding("7000000", 6, 7.0), holding("3000000", 6, 3.0)],
			),
		);
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		settle().await;

		assert_eq!(expect_loaded(sync.status()).token_amount, 7.0);
	}

	#[tokio::test(start_paused = true)]
	async fn query_failure_is_surfaced_as_failed() {
		let ledger = StubLedger::new().with_account(
			"ACC1",
			StubAccount {
				delay: Duration::ZERO,
				native: Err("connection refused".to_string()),
				holdings: Ok(vec![holding("42000000000", 9, 42.0)]),
			},
		);
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		settle().await;

		match sync.status() {
			SyncStatus::Failed(reason) => assert!(reason.contains("connection refused")),
			status => panic!("expected Failed, got {:?}", status),
		}
	}

	#[tokio::test(start_paused = true)]
	async fn disconnect_resets_to_idle() {
		let ledger =
			StubLedger::new().with_account("ACC1", StubAccount::loaded(1_000_000_000, vec![]));
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		settle().await;
		assert!(sync.status().is_terminal());

		sync.session_changed(&WalletSession::Disconnected);
		assert_eq!(sync.status(), SyncStatus::Idle);
	}

	#[tokio::test(start_paused = true)]
	async fn disconnect_mid_cycle_discards_result() {
		let ledger = StubLedger::new().with_account(
			"ACC1",
			StubAccount::loaded(1_000_000_000, vec![]).after(Duration::from_secs(5)),
		);
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		tokio::task::yield_now().await;

		sync.session_changed(&WalletSession::Disconnected);
		assert_eq!(sync.status(), SyncStatus::Idle);

		// The superseded cycle eventually completes; its result must not
		// overwrite the idle status.
		settle().await;
		assert_eq!(sync.status(), SyncStatus::Idle);
	}

	#[tokio::test(start_paused = true)]
	async fn account_switch_discards_stale_cycle() {
		let ledger = StubLedger::new()
			.with_account(
				"ACC1",
				StubAccount::loaded(99_000_000_000, vec![holding("99000000000", 9, 99.0)])
					.after(Duration::from_secs(5)),
			)
			.with_account(
				"ACC2",
				StubAccount::loaded(1_000_000_000, vec![holding("1000000000", 9, 1.0)])
					.after(Duration::from_secs(1)),
			);
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		tokio::task::yield_now().await;

		// Switch accounts while ACC1's cycle is still in flight. ACC1's
		// cycle finishes later but must never own the status again.
		sync.session_changed(&connected("ACC2"));
		settle().await;

		let snapshot = expect_loaded(sync.status());
		assert_eq!(snapshot.native_amount, 1.0);
		assert_eq!(snapshot.token_amount, 1.0);
	}

	#[tokio::test(start_paused = true)]
	async fn reissuing_same_account_resyncs() {
		let ledger = StubLedger::new().with_account(
			"ACC1",
			StubAccount::loaded(2_500_000_000, vec![holding("42000000000", 9, 42.0)]),
		);
		let sync = synchronizer_with(ledger);

		sync.session_changed(&connected("ACC1"));
		settle().await;
		let first = expect_loaded(sync.status());

		sync.session_changed(&connected("ACC1"));
		assert_eq!(sync.status(), SyncStatus::Syncing);
		settle().await;

		let second = expect_loaded(sync.status());
		assert_eq!(second.native_amount, first.native_amount);
		assert_eq!(second.token_amount, first.token_amount);
		assert!(second.observed_at >= first.observed_at);
	}
}
