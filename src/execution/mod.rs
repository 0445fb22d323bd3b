pub mod amounts;
pub mod builder;
pub mod errors;

use crate::domain::time::{Clock, SystemClock};
use crate::domain::{Side, SignedOrder, VolumeMode};
use crate::wallet::{ExchangeDomain, WalletSigner};
use amounts::calculate_order_amounts;
use builder::{build_order, OrderParams};
use errors::OrderError;

/// A fully enumerated limit-order request. Every recognized option appears
/// here with its default fixed at construction — there is no loose option
/// bag to destructure downstream.
#[derive(Debug, Clone)]
pub struct LimitOrderRequest {
    pub token_id: String,
    pub side: Side,
    /// 0-100 percentage scale.
    pub limit_price: String,
    pub shares: Option<String>,
    pub volume_mode: VolumeMode,
    /// Currency amount used verbatim in AMOUNT mode.
    pub buy_input_value: Option<String>,
    pub stable_collateral: bool,
    /// Unix seconds; "0" never expires.
    pub expiration: String,
    pub fee_rate_bps: String,
}

impl LimitOrderRequest {
    /// Share-count driven order, the common case.
    pub fn from_shares(
        token_id: impl Into<String>,
        side: Side,
        limit_price: impl Into<String>,
        shares: impl Into<String>,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            side,
            limit_price: limit_price.into(),
            shares: Some(shares.into()),
            volume_mode: VolumeMode::Shares,
            buy_input_value: None,
            stable_collateral: true,
            expiration: "0".to_string(),
            fee_rate_bps: "0".to_string(),
        }
    }

    /// Currency-amount driven buy order.
    pub fn from_amount(
        token_id: impl Into<String>,
        side: Side,
        limit_price: impl Into<String>,
        shares: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            volume_mode: VolumeMode::Amount,
            buy_input_value: Some(amount.into()),
            ..Self::from_shares(token_id, side, limit_price, shares)
        }
    }
}

/// The stateless order pipeline: amount calculation → assembly → signing.
///
/// Holds the signer credential and the clock explicitly; everything else is
/// derived per call, so independent requests never share mutable state.
pub struct OrderPipeline {
    signer: WalletSigner,
    maker: String,
    domain: ExchangeDomain,
    clock: Box<dyn Clock>,
}

impl OrderPipeline {
    pub fn new(signer: WalletSigner, maker: impl Into<String>) -> Self {
        Self {
            signer,
            maker: maker.into(),
            domain: ExchangeDomain::default(),
            clock: Box::new(SystemClock),
        }
    }

    /// Injects a clock, primarily so tests get deterministic salts.
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_domain(mut self, domain: ExchangeDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        &*self.clock
    }

    /// Runs the whole pipeline for one request. Validation and arithmetic
    /// failures surface before any signing work happens.
    pub fn build_signed_order(&self, req: &LimitOrderRequest) -> Result<SignedOrder, OrderError> {
        let (maker_amount, taker_amount) = calculate_order_amounts(
            req.side,
            req.shares.as_deref(),
            &req.limit_price,
            req.volume_mode,
            req.buy_input_value.as_deref(),
            req.stable_collateral,
        )?;

        let signer_address = format!("{:?}", self.signer.address());
        let order = build_order(
            &OrderParams {
                maker: &self.maker,
                signer: &signer_address,
                token_id: &req.token_id,
                maker_amount: &maker_amount,
                taker_amount: &taker_amount,
                side: req.side,
                expiration: &req.expiration,
                fee_rate_bps: &req.fee_rate_bps,
            },
            &*self.clock,
        )?;

        let signature = self.signer.sign_order(&order, &self.domain)?;
        Ok(SignedOrder { order, signature })
    }
}
