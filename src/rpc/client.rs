//!
//! JSON-RPC client for the ledger query endpoint.
//!
//! This module provides an async client answering the two balance queries the
//! synchronizer issues: `getBalance` and `getTokenAccountsByOwner` filtered by
//! mint. All methods are async and designed for use with Tokio.

use super::LedgerQuery;
use super::types::*;
use crate::utils::amount_to_decimal;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

/// Ledger JSON-RPC client
#[derive(Clone)]
pub struct SolanaRpcClient {
	/// The underlying HTTP client for RPC queries.
	http_client: Client,
	/// The URL of the ledger query endpoint.
	rpc_url: String,
}

impl SolanaRpcClient {
	/// Create a new RPC client for the given endpoint URL.
	pub fn new(rpc_url: String) -> Self {
		let http_client = Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.expect("Failed to create HTTP client");

		Self {
			http_client,
			rpc_url,
		}
	}

	/// Execute a JSON-RPC request and return the `result` member.
	///
	/// # Errors
	/// Returns `LedgerRpcError` on transport failure, a non-success HTTP
	/// status, an endpoint-reported `error` member, or a missing `result`.
	async fn execute_request(&self, method: &str, params: Value) -> Result<Value, LedgerRpcError> {
		let request_body = json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params,
		});

		debug!("Executing RPC request: {}", method);

		let response = self
			.http_client
			.post(&self.rpc_url)
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await?;

		if !response.status().is_success() {
			return Err(LedgerRpcError::Rpc(format!(
				"HTTP error: {}",
				response.status()
			)));
		}

		let response_json: Value = response.json().await?;

		if let Some(error) = response_json.get("error") {
			return Err(LedgerRpcError::Rpc(format!("endpoint error: {}", error)));
		}

		response_json
			.get("result")
			.cloned()
			.ok_or_else(|| LedgerRpcError::Malformed("response missing result".to_string()))
	}
}

#[async_trait]
impl LedgerQuery for SolanaRpcClient {
	async fn native_balance(&self, account: &AccountId) -> Result<u64, LedgerRpcError> {
		let result = self
			.execute_request("getBalance", json!([account.as_str()]))
			.await?;

		parse_balance_result(&result)
	}

	async fn token_accounts_by_owner(
		&self,
		owner: &AccountId,
		mint: &TokenMint,
	) -> Result<Vec<TokenHolding>, LedgerRpcError> {
		let params = json!([
			owner.as_str(),
			{ "mint": mint.as_str() },
			{ "encoding": "jsonParsed" },
		]);

		let result = self
			.execute_request("getTokenAccountsByOwner", params)
			.await?;

		parse_token_accounts_result(&result)
	}
}

/// The `tokenAmount` shape returned under `jsonParsed` encoding. Some
/// endpoints omit `uiAmount`, so it stays optional here.
#[derive(Debug, Deserialize)]
struct RpcTokenAmount {
	amount: String,
	decimals: u8,
	#[serde(rename = "uiAmount")]
	ui_amount: Option<f64>,
}

fn parse_balance_result(result: &Value) -> Result<u64, LedgerRpcError> {
	result
		.get("value")
		.and_then(Value::as_u64)
		.ok_or_else(|| {
			LedgerRpcError::Malformed("getBalance result missing numeric value".to_string())
		})
}

fn parse_token_accounts_result(result: &Value) -> Result<Vec<TokenHolding>, LedgerRpcError> {
	let entries = result.get("value").and_then(Value::as_array).ok_or_else(|| {
		LedgerRpcError::Malformed("getTokenAccountsByOwner result missing value array".to_string())
	})?;

	entries.iter().map(parse_token_holding).collect()
}

fn parse_token_holding(entry: &Value) -> Result<TokenHolding, LedgerRpcError> {
	let token_amount = entry
		.pointer("/account/data/parsed/info/tokenAmount")
		.ok_or_else(|| {
			LedgerRpcError::Malformed("token account entry missing tokenAmount".to_string())
		})?;

	let raw: RpcTokenAmount = serde_json::from_value(token_amount.clone())?;

	let ui_amount = match raw.ui_amount {
		Some(ui) => ui,
		None => raw
			.amount
			.parse::<u64>()
			.map(|amount| amount_to_decimal(amount, raw.decimals as u32))
			.map_err(|_| {
				LedgerRpcError::Malformed(format!("unparseable token amount: {}", raw.amount))
			})?,
	};

	Ok(TokenHolding {
		amount: raw.amount,
		decimals: raw.decimals,
		ui_amount,
	})
}
