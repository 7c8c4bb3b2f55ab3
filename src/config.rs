//! Endpoint configuration, resolved once at process start.

use crate::rpc::TokenMint;

const RPC_URL_VAR: &str = "LEDGER_RPC_URL";
const TOKEN_MINT_VAR: &str = "TOKEN_MINT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("missing required environment variable {0}")]
	MissingVar(&'static str),
}

/// Immutable description of the ledger-query endpoint and the token to track.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
	/// URL of the ledger RPC endpoint.
	pub rpc_url: String,
	/// Mint address of the fungible token of interest.
	pub token_mint: TokenMint,
}

impl EndpointConfig {
	/// Read the endpoint configuration from the environment.
	///
	/// Missing configuration is fatal at startup; it is never represented as
	/// a runtime sync status.
	pub fn from_env() -> Result<Self, ConfigError> {
		let rpc_url =
			std::env::var(RPC_URL_VAR).map_err(|_| ConfigError::MissingVar(RPC_URL_VAR))?;
		let token_mint =
			std::env::var(TOKEN_MINT_VAR).map_err(|_| ConfigError::MissingVar(TOKEN_MINT_VAR))?;

		Ok(Self {
			rpc_url,
			token_mint: TokenMint::new(token_mint),
		})
	}
}
