pub mod payload;

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use std::time::Duration;

use crate::domain::time::Clock;
use payload::ApiPayload;

type HmacSha256 = Hmac<Sha256>;

/// API credentials for the authenticated CLOB endpoints.
#[derive(Debug, Clone, Default)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
}

/// Thin transport over the CLOB HTTP API. Carries no order logic: it ships a
/// ready-made [`ApiPayload`] and reports the response discriminator.
#[derive(Clone)]
pub struct ClobClient {
    http: Client,
    base_url: String,
    credentials: ApiCredentials,
}

/// Shape of the order endpoint's response. Anything that fails to
/// deserialize into this is a collaborator error, not a rejection.
#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    #[serde(rename = "errorMsg")]
    pub error_msg: Option<String>,
}

impl ClobClient {
    pub fn new(base_url: String, credentials: ApiCredentials) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("HTTP client");

        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// Submits a signed order. Returns the accepted order id; a rejected
    /// order or a malformed response is an error, propagated unchanged.
    pub async fn submit_order(
        &self,
        order_payload: &ApiPayload,
        clock: &dyn Clock,
    ) -> Result<OrderResponse> {
        let path = "/order";
        let body = serde_json::to_string(order_payload)?;
        let timestamp = clock.now_secs();
        let signature = self.request_signature(timestamp, "POST", path, &body)?;

        info!(
            "📤 Submitting {} order for market {}",
            order_payload.side, order_payload.market_id
        );

        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("X-API-KEY", &self.credentials.api_key)
            .header("X-SIGNATURE", &signature)
            .header("X-TIMESTAMP", timestamp.to_string())
            .header("X-PASSPHRASE", &self.credentials.api_passphrase)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .context("order submission request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("reading order response")?;

        if !status.is_success() {
            warn!("❌ Order rejected: {} — {}", status, text);
            return Err(anyhow!("order rejected: {} - {}", status, text));
        }

        let parsed: OrderResponse = serde_json::from_str(&text)
            .with_context(|| format!("unexpected order response shape: {text}"))?;

        if !parsed.success {
            let reason = parsed.error_msg.as_deref().unwrap_or("no reason given");
            warn!("❌ Order rejected by matching engine: {}", reason);
            return Err(anyhow!("order rejected: {reason}"));
        }

        info!(
            "✅ Order accepted{}",
            parsed
                .order_id
                .as_deref()
                .map(|id| format!(", id {id}"))
                .unwrap_or_default()
        );
        Ok(parsed)
    }

    /// Raw open-order history for a market. Pass-through: the caller gets
    /// the API's JSON after a shape check, nothing more.
    pub async fn open_orders(
        &self,
        market_id: &str,
        clock: &dyn Clock,
    ) -> Result<serde_json::Value> {
        let path = format!("/orders?marketId={market_id}");
        let timestamp = clock.now_secs();
        let signature = self.request_signature(timestamp, "GET", &path, "")?;

        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .header("X-API-KEY", &self.credentials.api_key)
            .header("X-SIGNATURE", &signature)
            .header("X-TIMESTAMP", timestamp.to_string())
            .header("X-PASSPHRASE", &self.credentials.api_passphrase)
            .send()
            .await
            .context("open orders request failed")?;

        let status = resp.status();
        let value: serde_json::Value = resp
            .json()
            .await
            .context("open orders response was not JSON")?;

        if !status.is_success() {
            return Err(anyhow!("open orders query failed: {} - {}", status, value));
        }
        Ok(value)
    }

    /// HMAC-SHA256 over `timestamp + method + path + body`, base64-encoded,
    /// keyed by the base64-decoded API secret.
    fn request_signature(
        &self,
        timestamp: u64,
        method: &str,
        path: &str,
        body: &str,
    ) -> Result<String> {
        let message = format!("{timestamp}{method}{path}{body}");

        let secret = general_purpose::URL_SAFE
            .decode(&self.credentials.api_secret)
            .context("API secret must be valid base64")?;

        let mut mac =
            HmacSha256::new_from_slice(&secret).map_err(|e| anyhow!("HMAC init failed: {e}"))?;
        mac.update(message.as_bytes());

        Ok(general_purpose::URL_SAFE.encode(mac.finalize().into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_signature_is_stable() {
        let client = ClobClient::new(
            "http://localhost".to_string(),
            ApiCredentials {
                api_key: "k".into(),
                // base64 of "secret-bytes"
                api_secret: general_purpose::URL_SAFE.encode(b"secret-bytes"),
                api_passphrase: "p".into(),
            },
        );
        let a = client
            .request_signature(1_700_000_000, "POST", "/order", "{}")
            .unwrap();
        let b = client
            .request_signature(1_700_000_000, "POST", "/order", "{}")
            .unwrap();
        assert_eq!(a, b);

        let c = client
            .request_signature(1_700_000_001, "POST", "/order", "{}")
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn response_shape_discriminator() {
        let ok: OrderResponse =
            serde_json::from_str(r#"{"success":true,"orderId":"abc"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.order_id.as_deref(), Some("abc"));

        let rejected: OrderResponse =
            serde_json::from_str(r#"{"success":false,"errorMsg":"bad price"}"#).unwrap();
        assert!(!rejected.success);
        assert_eq!(rejected.error_msg.as_deref(), Some("bad price"));
    }
}
