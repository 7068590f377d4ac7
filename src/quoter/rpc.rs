// src/quoter/rpc.rs
//! JSON-RPC `eth_call` client for the Uniswap V3 quoter contract.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use log::{debug, error, warn};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::ExactOutputQuoter;
use crate::error::SwapError;

sol! {
    interface IQuoter {
        function quoteExactOutput(bytes path, uint256 amountOut) external returns (uint256 amountIn);
    }
}

pub struct RpcQuoter {
    client: reqwest::Client,
    rpc_url: Url,
    quoter: Address,
}

impl RpcQuoter {
    pub fn new(rpc_url: &str, quoter: Address, timeout: Duration) -> Result<Self, SwapError> {
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| SwapError::Config(format!("invalid RPC url '{}': {}", rpc_url, e)))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            rpc_url,
            quoter,
        })
    }
}

/// ABI-encoded `quoteExactOutput(path, amountOut)` call data.
pub fn quote_exact_output_calldata(path: &Bytes, amount_out: U256) -> Vec<u8> {
    IQuoter::quoteExactOutputCall {
        path: path.clone(),
        amountOut: amount_out,
    }
    .abi_encode()
}

/// Pull `amountIn` out of an `eth_call` response.
///
/// Only the first return word is read, so both the V1 Quoter and
/// QuoterV2 (which appends tick and gas data) decode the same way.
pub fn parse_call_result(response: &Value) -> Result<U256, SwapError> {
    if let Some(err) = response.get("error") {
        let message = err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown");
        let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        return Err(SwapError::Rpc(format!("code {}: {}", code, message)));
    }

    let result = response
        .get("result")
        .and_then(|r| r.as_str())
        .ok_or_else(|| SwapError::InvalidResponse("no result in RPC response".to_string()))?;
    let bytes = hex::decode(result.trim_start_matches("0x"))
        .map_err(|e| SwapError::InvalidResponse(format!("invalid hex result: {}", e)))?;
    if bytes.len() < 32 {
        return Err(SwapError::InvalidResponse(format!(
            "quoter returned {} bytes, expected at least 32",
            bytes.len()
        )));
    }
    Ok(U256::from_be_slice(&bytes[..32]))
}

/// Decode a raw JSON-RPC response body. A body that is not JSON at all (an
/// HTML error page, a truncated reply) is a malformed result, not a transport
/// failure.
pub fn parse_response_body(body: &str) -> Result<U256, SwapError> {
    let response: Value = serde_json::from_str(body).map_err(|e| {
        SwapError::InvalidResponse(format!("RPC response is not JSON: {}", e))
    })?;
    parse_call_result(&response)
}

#[async_trait::async_trait]
impl ExactOutputQuoter for RpcQuoter {
    async fn quote_exact_output(&self, path: &Bytes, amount_out: U256) -> Result<U256, SwapError> {
        let calldata = quote_exact_output_calldata(path, amount_out);
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{
                "to": self.quoter.to_string(),
                "data": format!("0x{}", hex::encode(&calldata)),
            }, "latest"]
        });

        debug!(
            "eth_call quoteExactOutput on {} (amount_out {})",
            self.quoter, amount_out
        );
        let response = self
            .client
            .post(self.rpc_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Quoter RPC request failed: {}", e);
                SwapError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SwapError::Rpc(format!("HTTP status {}", status)));
        }

        let body = response.text().await?;
        parse_response_body(&body).map_err(|e| {
            warn!("Quoter call failed for path 0x{}: {}", hex::encode(path), e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{FeeTier, Route};
    use crate::tokens::{USDC, WETH};

    #[test]
    fn test_calldata_layout() {
        let route = Route::new(vec![WETH.clone(), USDC.clone()], vec![FeeTier::Low]).unwrap();
        let path = route.encode_exact_output().unwrap();
        let calldata = quote_exact_output_calldata(&path, U256::from(1_000_000u64));

        assert_eq!(&calldata[..4], IQuoter::quoteExactOutputCall::SELECTOR.as_slice());
        // selector, offset, amountOut, length, 43 bytes padded to 64
        assert_eq!(calldata.len(), 4 + 32 + 32 + 32 + 64);
        assert_eq!(U256::from_be_slice(&calldata[36..68]), U256::from(1_000_000u64));
        assert_eq!(U256::from_be_slice(&calldata[68..100]), U256::from(43u64));
        assert_eq!(&calldata[100..143], &path[..]);
    }

    #[test]
    fn test_parse_single_word_result() {
        let response = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": format!("0x{:064x}", 123_456u64),
        });
        assert_eq!(parse_call_result(&response).unwrap(), U256::from(123_456u64));
    }

    #[test]
    fn test_parse_reads_first_word_of_longer_result() {
        let response = json!({
            "result": format!("0x{:064x}{:064x}", 42u64, 99u64),
        });
        assert_eq!(parse_call_result(&response).unwrap(), U256::from(42u64));
    }

    #[test]
    fn test_parse_rpc_error_object() {
        let response = json!({
            "error": { "code": 3, "message": "execution reverted" }
        });
        assert_eq!(
            parse_call_result(&response).unwrap_err(),
            SwapError::Rpc("code 3: execution reverted".to_string())
        );
    }

    #[test]
    fn test_parse_malformed_results() {
        assert!(matches!(
            parse_call_result(&json!({})),
            Err(SwapError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_call_result(&json!({ "result": "0xzz" })),
            Err(SwapError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_call_result(&json!({ "result": "0x01" })),
            Err(SwapError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_non_json_body_is_an_invalid_response() {
        assert!(matches!(
            parse_response_body("<html>502 Bad Gateway</html>"),
            Err(SwapError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_response_body(""),
            Err(SwapError::InvalidResponse(_))
        ));
        let body = format!(r#"{{"jsonrpc":"2.0","id":1,"result":"0x{:064x}"}}"#, 7u64);
        assert_eq!(parse_response_body(&body).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_rejects_invalid_url() {
        let result = RpcQuoter::new("not a url", Address::ZERO, Duration::from_secs(1));
        assert!(matches!(result, Err(SwapError::Config(_))));
    }
}
