//! Balance Synchronization Module
//!
//! This module owns the sync state machine for the connected wallet. It is
//! composed of two submodules:
//!
//! - `status`: The `SyncStatus` model and `BalanceSnapshot` published to the
//!   presentation layer.
//! - `synchronizer`: The `BalanceSynchronizer`, which reacts to session
//!   transitions, drives the two-part balance fetch, and guards against
//!   superseded cycles publishing stale results.

/// Status model published to readers
pub mod status;
/// The synchronizer state machine
pub mod synchronizer;

pub use status::{BalanceSnapshot, SyncStatus};
pub use synchronizer::BalanceSynchronizer;
