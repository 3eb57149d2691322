//! Balance lookup against a JSON-RPC ledger node.
//!
//! The HTTP client lives behind the `balance-check` feature flag.  Callers
//! ask [`balance_client`] for a [`BalanceLookup`] and get `None` when the
//! capability was not compiled in.  The node endpoint is always passed in
//! through [`RpcConfig`]; nothing here reads global state.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WalletVaultError};

/// Wei per ether.
const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Connection settings for the ledger node (the `[rpc]` table in
/// `.walletvault.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    /// HTTP(S) JSON-RPC endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Overall request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://ethereum.publicnode.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Something that can report an account balance in wei.
pub trait BalanceLookup {
    fn balance_wei(&self, address: &str) -> Result<u128>;
}

/// Build the balance client for `config`, if this build has one.
#[cfg(feature = "balance-check")]
pub fn balance_client(config: &RpcConfig) -> Option<Box<dyn BalanceLookup>> {
    Some(Box::new(client::JsonRpcClient::new(config)))
}

/// Build the balance client for `config`, if this build has one.
#[cfg(not(feature = "balance-check"))]
pub fn balance_client(_config: &RpcConfig) -> Option<Box<dyn BalanceLookup>> {
    None
}

#[cfg(feature = "balance-check")]
mod client {
    use std::time::Duration;

    use super::{parse_reply, BalanceLookup, RpcConfig, RpcReply};
    use crate::errors::{Result, WalletVaultError};

    /// `eth_getBalance` over HTTP with `ureq`.
    pub struct JsonRpcClient {
        agent: ureq::Agent,
        endpoint: String,
    }

    impl JsonRpcClient {
        pub fn new(config: &RpcConfig) -> Self {
            let agent_config = ureq::Agent::config_builder()
                .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
                .build();
            Self {
                agent: ureq::Agent::new_with_config(agent_config),
                endpoint: config.endpoint.clone(),
            }
        }
    }

    impl BalanceLookup for JsonRpcClient {
        fn balance_wei(&self, address: &str) -> Result<u128> {
            let request = serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getBalance",
                "params": [address, "latest"],
            });

            tracing::debug!(endpoint = %self.endpoint, "eth_getBalance");

            let mut response = self
                .agent
                .post(&self.endpoint)
                .send_json(&request)
                .map_err(|e| WalletVaultError::RpcError(format!("request failed: {e}")))?;

            let reply: RpcReply = response
                .body_mut()
                .read_json()
                .map_err(|e| WalletVaultError::RpcError(format!("invalid response: {e}")))?;

            parse_reply(reply)
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "balance-check"), allow(dead_code))]
pub(crate) struct RpcReply {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(not(feature = "balance-check"), allow(dead_code))]
pub(crate) struct RpcErrorBody {
    code: i64,
    message: String,
}

#[cfg_attr(not(feature = "balance-check"), allow(dead_code))]
pub(crate) fn parse_reply(reply: RpcReply) -> Result<u128> {
    if let Some(err) = reply.error {
        return Err(WalletVaultError::RpcError(format!(
            "node returned error {}: {}",
            err.code, err.message
        )));
    }
    let result = reply
        .result
        .ok_or_else(|| WalletVaultError::RpcError("response has no result".into()))?;
    parse_quantity(&result)
}

/// Parse a JSON-RPC hex quantity (`"0x1a"`) into an integer.
pub fn parse_quantity(hex: &str) -> Result<u128> {
    let digits = hex
        .strip_prefix("0x")
        .ok_or_else(|| WalletVaultError::RpcError(format!("quantity '{hex}' lacks 0x prefix")))?;
    if digits.is_empty() {
        return Err(WalletVaultError::RpcError("empty quantity".into()));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| WalletVaultError::RpcError(format!("bad quantity '{hex}': {e}")))
}

/// Render a wei amount as decimal ether without trailing zeros.
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{frac:018}");
    format!("{whole}.{}", frac.trim_end_matches('0'))
}
