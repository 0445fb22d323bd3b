use std::str::FromStr;

use ethers::types::{Address, U256};

use crate::domain::time::Clock;
use crate::domain::{Order, Side, SignatureType};
use crate::execution::errors::OrderError;

/// Everything the assembler needs to produce a canonical [`Order`]. Amounts
/// arrive as base-unit integer strings from the amount calculator.
#[derive(Debug, Clone)]
pub struct OrderParams<'a> {
    pub maker: &'a str,
    pub signer: &'a str,
    pub token_id: &'a str,
    pub maker_amount: &'a str,
    pub taker_amount: &'a str,
    pub side: Side,
    pub expiration: &'a str,
    pub fee_rate_bps: &'a str,
}

impl<'a> OrderParams<'a> {
    pub fn new(
        maker: &'a str,
        signer: &'a str,
        token_id: &'a str,
        maker_amount: &'a str,
        taker_amount: &'a str,
        side: Side,
    ) -> Self {
        Self {
            maker,
            signer,
            token_id,
            maker_amount,
            taker_amount,
            side,
            expiration: "0",
            fee_rate_bps: "0",
        }
    }
}

/// Assembles the canonical order record.
///
/// Pure apart from the clock read: the salt is the current millisecond count,
/// which is what makes two otherwise identical orders hash differently.
/// Callers that sign more than once per millisecond must serialize their
/// calls or inject a counter-backed clock.
pub fn build_order(params: &OrderParams<'_>, clock: &dyn Clock) -> Result<Order, OrderError> {
    let maker = parse_address("maker", params.maker)?;
    let signer = parse_address("signer", params.signer)?;

    let token_id = parse_uint("tokenId", params.token_id)?;
    let maker_amount = parse_uint("makerAmount", params.maker_amount)?;
    let taker_amount = parse_uint("takerAmount", params.taker_amount)?;
    let expiration = parse_uint("expiration", params.expiration)?;
    let fee_rate_bps = parse_uint("feeRateBps", params.fee_rate_bps)?;

    Ok(Order {
        salt: U256::from(clock.now_millis()),
        maker,
        signer,
        taker: Address::zero(),
        token_id,
        maker_amount,
        taker_amount,
        expiration,
        nonce: U256::zero(),
        fee_rate_bps,
        side: params.side,
        signature_type: SignatureType::SafeOwner,
    })
}

fn parse_address(field: &'static str, text: &str) -> Result<Address, OrderError> {
    Address::from_str(text.trim())
        .map_err(|_| OrderError::validation(field, format!("{text:?} is not a 20-byte hex address")))
}

fn parse_uint(field: &'static str, text: &str) -> Result<U256, OrderError> {
    U256::from_dec_str(text.trim())
        .map_err(|_| OrderError::validation(field, format!("{text:?} is not an unsigned integer")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::time::FixedClock;

    const MAKER: &str = "0xAAaAaAaaAaAaAaaAaAAAAAAAAaaaAaAaAaaAaaAa";
    const SIGNER: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn params<'a>() -> OrderParams<'a> {
        OrderParams::new(
            MAKER,
            SIGNER,
            "123456789",
            "9900000000000000000",
            "10000000000000000000",
            Side::Sell,
        )
    }

    #[test]
    fn builds_deterministically_with_injected_clock() {
        let clock = FixedClock { millis: 1_700_000_000_123 };
        let a = build_order(&params(), &clock).unwrap();
        let b = build_order(&params(), &clock).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.salt, U256::from(1_700_000_000_123u64));
    }

    #[test]
    fn fixes_taker_nonce_and_signature_type() {
        let clock = FixedClock { millis: 1 };
        let order = build_order(&params(), &clock).unwrap();
        assert_eq!(order.taker, Address::zero());
        assert_eq!(order.nonce, U256::zero());
        assert_eq!(order.signature_type, SignatureType::SafeOwner);
        assert_eq!(order.expiration, U256::zero());
        assert_eq!(order.fee_rate_bps, U256::zero());
    }

    #[test]
    fn normalizes_mixed_case_addresses() {
        let clock = FixedClock { millis: 1 };
        let order = build_order(&params(), &clock).unwrap();
        // ethers renders Address as lowercase 0x-hex
        assert_eq!(
            format!("{:?}", order.maker),
            MAKER.to_ascii_lowercase()
        );
    }

    #[test]
    fn rejects_malformed_addresses_naming_the_field() {
        let clock = FixedClock { millis: 1 };
        let mut p = params();
        p.maker = "0x1234";
        let err = build_order(&p, &clock).unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "maker", .. }
        ));

        let mut p = params();
        p.signer = "not-an-address";
        let err = build_order(&p, &clock).unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "signer", .. }
        ));
    }

    #[test]
    fn rejects_non_numeric_token_id() {
        let clock = FixedClock { millis: 1 };
        let mut p = params();
        p.token_id = "0xdeadbeef";
        let err = build_order(&p, &clock).unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "tokenId", .. }
        ));
    }
}
