//! Wallet session tracking.
//!
//! This module translates provider connect, disconnect, and account-switch
//! reports into the two-valued `WalletSession` model and notifies registered
//! listeners once per actual transition. Repeated identical provider reports
//! are suppressed; provider connect failures never surface here, the session
//! simply stays `Disconnected`.

use std::sync::Mutex;
use tracing::{debug, info};

use super::types::WalletSession;
use crate::rpc::AccountId;

/// Listener invoked with the new session on every actual transition.
///
/// Callbacks run synchronously on the thread reporting the transition, so a
/// listener that starts asynchronous work must hand it off (the synchronizer
/// spawns its fetch cycle).
pub trait SessionListener: Send + Sync {
	fn session_changed(&self, session: &WalletSession);

	/// Get the name of this listener for logging and diagnostics.
	fn name(&self) -> &'static str;
}

/// Tracks the wallet session and fans transitions out to listeners.
///
/// Listeners are notified in registration order; each listener receives every
/// transition exactly once, in chronological order.
pub struct WalletSessionTracker {
	state: Mutex<TrackerState>,
}

struct TrackerState {
	session: WalletSession,
	listeners: Vec<Box<dyn SessionListener>>,
}

impl WalletSessionTracker {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(TrackerState {
				session: WalletSession::Disconnected,
				listeners: Vec::new(),
			}),
		}
	}

	/// The current session. Synchronous, always succeeds.
	pub fn current_session(&self) -> WalletSession {
		self.state.lock().unwrap().session.clone()
	}

	/// Register a listener for session transitions.
	pub fn on_session_change(&self, listener: Box<dyn SessionListener>) {
		self.state.lock().unwrap().listeners.push(listener);
	}

	/// Ingest a provider report: `Some(account)` while connected, `None`
	/// otherwise.
	pub fn observe(&self, account: Option<AccountId>) {
		let next = match account {
			Some(id) => WalletSession::Connected(id),
			None => WalletSession::Disconnected,
		};

		// Dispatch runs under the lock so every listener sees transitions in
		// chronological order.
		let state = &mut *self.state.lock().unwrap();
		if state.session == next {
			debug!("Ignoring repeated session report: {:?}", next);
			return;
		}

		info!("Session transition: {:?} -> {:?}", state.session, next);
		state.session = next.clone();

		for listener in &state.listeners {
			debug!("Notifying session listener {}", listener.name());
			listener.session_changed(&next);
		}
	}
}
