pub mod provider;
pub mod session;
pub mod sync;
pub mod types;

pub use session::{SessionListener, WalletSessionTracker};
pub use sync::{BalanceSnapshot, BalanceSynchronizer, SyncStatus};
pub use types::*;
