use serde::Serialize;

use crate::domain::time::Clock;
use crate::domain::SignedOrder;
use crate::execution::errors::OrderError;
use crate::numeric::price_to_market_fraction;

/// Market context the wire payload carries alongside the signed order.
#[derive(Debug, Clone)]
pub struct PayloadContext<'a> {
    pub market_id: &'a str,
    /// The user-facing 0-100 limit price.
    pub limit_price: &'a str,
    pub collateral_address: &'a str,
    pub chain_id: u64,
    pub stable_collateral: bool,
    /// Passed through verbatim; "0" unless the caller has a safe rate quote.
    pub safe_rate: &'a str,
}

/// The flattened wire form of a signed order.
///
/// Every uint256 travels as a decimal string — numeric JSON would silently
/// lose precision past 2^53 on the receiving side. The signature is
/// duplicated under two names because the order endpoint and the matching
/// engine read different fields.
#[derive(Debug, Clone, Serialize)]
pub struct ApiPayload {
    #[serde(rename = "marketId")]
    pub market_id: String,
    /// Fractional price text, 3 decimal places for stable-collateral markets.
    pub price: String,
    pub side: String,
    pub salt: String,
    pub maker: String,
    pub signer: String,
    pub taker: String,
    #[serde(rename = "tokenId")]
    pub token_id: String,
    #[serde(rename = "makerAmount")]
    pub maker_amount: String,
    #[serde(rename = "takerAmount")]
    pub taker_amount: String,
    pub expiration: String,
    pub nonce: String,
    #[serde(rename = "feeRateBps")]
    pub fee_rate_bps: String,
    #[serde(rename = "signatureType")]
    pub signature_type: u8,
    pub signature: String,
    #[serde(rename = "orderSignature")]
    pub order_signature: String,
    pub timestamp: String,
    pub currency: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    #[serde(rename = "safeRate")]
    pub safe_rate: String,
}

/// Projects a signed order plus market context into the exact field set the
/// order endpoint expects. Pure string plumbing: all validation happened
/// upstream.
pub fn build_api_payload(
    signed: &SignedOrder,
    ctx: &PayloadContext<'_>,
    clock: &dyn Clock,
) -> Result<ApiPayload, OrderError> {
    let price = if ctx.stable_collateral {
        price_to_market_fraction(ctx.limit_price)?
    } else {
        ctx.limit_price.to_string()
    };

    let order = &signed.order;
    Ok(ApiPayload {
        market_id: ctx.market_id.to_string(),
        price,
        side: order.side.as_str().to_string(),
        salt: order.salt.to_string(),
        maker: format!("{:?}", order.maker),
        signer: format!("{:?}", order.signer),
        taker: format!("{:?}", order.taker),
        token_id: order.token_id.to_string(),
        maker_amount: order.maker_amount.to_string(),
        taker_amount: order.taker_amount.to_string(),
        expiration: order.expiration.to_string(),
        nonce: order.nonce.to_string(),
        fee_rate_bps: order.fee_rate_bps.to_string(),
        signature_type: order.signature_type.as_u8(),
        signature: signed.signature.clone(),
        order_signature: signed.signature.clone(),
        timestamp: clock.now_secs().to_string(),
        currency: ctx.collateral_address.to_ascii_lowercase(),
        chain_id: ctx.chain_id,
        safe_rate: ctx.safe_rate.to_string(),
    })
}
