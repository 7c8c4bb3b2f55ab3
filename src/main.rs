mod config;
mod rpc;
mod utils;
mod wallet;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::EndpointConfig;
use crate::rpc::{AccountId, SolanaRpcClient};
use crate::utils::shorten_account;
use crate::wallet::provider::{StaticAccountProvider, WalletProvider};
use crate::wallet::{BalanceSynchronizer, SyncStatus, WalletSessionTracker};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			tracing_subscriber::EnvFilter::from_default_env()
				.add_directive(tracing::Level::INFO.into()),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	info!("Starting wallet balance service");

	let config = match EndpointConfig::from_env() {
		Ok(config) => config,
		Err(e) => {
			error!("Failed to load endpoint configuration: {}", e);
			std::process::exit(1);
		}
	};

	let account = match std::env::var("WALLET_ACCOUNT") {
		Ok(address) => AccountId::new(address),
		Err(_) => {
			error!("Failed to load wallet configuration: missing required environment variable WALLET_ACCOUNT");
			std::process::exit(1);
		}
	};

	let rpc_client = Arc::new(SolanaRpcClient::new(config.rpc_url.clone()));
	info!("Created ledger RPC client for {}", config.rpc_url);

	let tracker = WalletSessionTracker::new();
	let synchronizer = BalanceSynchronizer::new(rpc_client, config.token_mint.clone());
	tracker.on_session_change(Box::new(synchronizer.clone()));

	let mut status_rx = synchronizer.subscribe();

	let mut provider = StaticAccountProvider::new(account);
	if let Err(e) = provider.connect().await {
		// The provider surfaces its own failures; the session simply stays
		// disconnected.
		error!("Wallet connection failed: {}", e);
		return;
	}

	tracker.observe(provider.current_account());

	let session = tracker.current_session();
	let Some(connected_account) = session.account() else {
		error!("Provider exposed no account after connect");
		return;
	};
	info!("Wallet connected: {}", shorten_account(connected_account.as_str()));

	// Wait for the fetch cycle to settle.
	loop {
		if status_rx.changed().await.is_err() {
			break;
		}

		let status = status_rx.borrow_and_update().clone();
		info!("Status: {}", status);

		if status.is_terminal() {
			if let SyncStatus::Loaded(snapshot) = &status {
				info!("Native balance: {:.4}", snapshot.native_amount);
				info!(
					"Token balance ({}): {}",
					shorten_account(config.token_mint.as_str()),
					snapshot.token_amount
				);
			}
			break;
		}
	}

	provider.disconnect().await;
	tracker.observe(None);
	info!("Wallet disconnected, session idle");
}
