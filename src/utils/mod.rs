//!
//! Utility module for balance display.
//!
//! Formatting helpers shared by the RPC layer, the synchronizer, and the
//! service entry point.

/// Number of decimal places in the ledger's native unit.
pub const NATIVE_DECIMALS: u32 = 9;

/// Convert a raw smallest-unit amount into its decimal representation.
pub fn amount_to_decimal(amount: u64, decimals: u32) -> f64 {
	amount as f64 / 10f64.powi(decimals as i32)
}

pub fn format_token_amount(amount: u64, decimals: u32) -> String {
	format!("{:.*}", decimals as usize, amount_to_decimal(amount, decimals))
}

/// Shorten an account address for display: first six and last four characters.
pub fn shorten_account(address: &str) -> String {
	if address.len() <= 10 {
		return address.to_string();
	}
	format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
