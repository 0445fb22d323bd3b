use ethers::types::U256;

use crate::domain::{Side, VolumeMode};
use crate::execution::errors::OrderError;
use crate::numeric::{
    self, amount_from_shares_and_price, scale_to_integer, to_base_units, BASE_UNIT_DECIMALS,
};

/// Derives the base-unit `(maker_amount, taker_amount)` pair for a limit
/// order.
///
/// A buyer offers currency and expects shares; a seller offers shares and
/// expects currency. Both legs leave here at the 18-decimal base-unit scale.
/// Non-stable collateral markets quote their price a fixed factor of 100
/// above the percentage scale, so the price is rescaled before the amount
/// formula runs.
pub fn calculate_order_amounts(
    side: Side,
    shares: Option<&str>,
    limit_price: &str,
    volume_mode: VolumeMode,
    buy_input_value: Option<&str>,
    stable_collateral: bool,
) -> Result<(String, String), OrderError> {
    let (price_int, price_places) = scale_to_integer(limit_price)
        .map_err(|e| OrderError::validation("price", e.to_string()))?;

    let limit = numeric::pow10(price_places)?
        .checked_mul(U256::from(100u8))
        .ok_or_else(|| OrderError::validation("price", "too many decimal places"))?;
    if price_int > limit {
        return Err(OrderError::validation(
            "price",
            format!("{limit_price} is outside the 0-100 percentage range"),
        ));
    }

    let shares = shares
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| OrderError::validation("shares", "missing share count"))?;

    let effective_price = if stable_collateral {
        limit_price.to_string()
    } else {
        // non-stable markets quote price at 100x the percentage scale
        let scaled = price_int
            .checked_mul(U256::from(100u8))
            .ok_or_else(|| OrderError::validation("price", "price too large to rescale"))?;
        numeric::render_decimal(scaled, price_places)?
    };

    let amount = match volume_mode {
        VolumeMode::Shares => {
            let (shares_int, _) = scale_to_integer(shares)
                .map_err(|e| OrderError::validation("shares", e.to_string()))?;
            if shares_int.is_zero() {
                return Err(OrderError::validation(
                    "shares",
                    "share count must be positive in SHARES mode",
                ));
            }
            amount_from_shares_and_price(shares, &effective_price)?
        }
        VolumeMode::Amount => buy_input_value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| OrderError::validation("amount", "missing currency amount"))?
            .to_string(),
    };

    let amount_units = to_base_units(&amount, BASE_UNIT_DECIMALS)?;
    let share_units = to_base_units(shares, BASE_UNIT_DECIMALS)?;

    Ok(match side {
        Side::Buy => (amount_units, share_units),
        Side::Sell => (share_units, amount_units),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_ten_shares_at_99() {
        let (maker, taker) = calculate_order_amounts(
            Side::Sell,
            Some("10.00"),
            "99",
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap();
        assert_eq!(maker, "10000000000000000000");
        assert_eq!(taker, "9900000000000000000");
    }

    #[test]
    fn swapping_side_swaps_the_amounts() {
        let sell = calculate_order_amounts(
            Side::Sell,
            Some("1.5"),
            "99.11",
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap();
        let buy = calculate_order_amounts(
            Side::Buy,
            Some("1.5"),
            "99.11",
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap();
        assert_eq!(sell.0, buy.1);
        assert_eq!(sell.1, buy.0);
    }

    #[test]
    fn buy_amounts_are_exact() {
        // 1.5 * 99.11 / 100 = 1.48665
        let (maker, taker) = calculate_order_amounts(
            Side::Buy,
            Some("1.5"),
            "99.11",
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap();
        assert_eq!(maker, "1486650000000000000");
        assert_eq!(taker, "1500000000000000000");
    }

    #[test]
    fn amount_mode_takes_currency_verbatim() {
        let (maker, taker) = calculate_order_amounts(
            Side::Buy,
            Some("20"),
            "50",
            VolumeMode::Amount,
            Some("12.5"),
            true,
        )
        .unwrap();
        assert_eq!(maker, "12500000000000000000");
        assert_eq!(taker, "20000000000000000000");
    }

    #[test]
    fn nonstable_price_rescales_by_100() {
        // effective price 50 * 100 = 5000; 2 * 5000 / 100 = 100
        let (maker, _) = calculate_order_amounts(
            Side::Buy,
            Some("2"),
            "50",
            VolumeMode::Shares,
            None,
            false,
        )
        .unwrap();
        assert_eq!(maker, "100000000000000000000");
    }

    #[test]
    fn price_out_of_range_fails_before_any_arithmetic() {
        let err = calculate_order_amounts(
            Side::Buy,
            Some("1"),
            "101",
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "price", .. }
        ));
    }

    #[test]
    fn absurdly_precise_price_is_rejected_not_panicked() {
        // 76 fractional digits: 10^76 fits in 256 bits but 100 * 10^76 does not
        let price = format!("0.{}1", "0".repeat(75));
        let err = calculate_order_amounts(
            Side::Buy,
            Some("1"),
            &price,
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "price", .. }
        ));

        // one more digit and pow10 itself overflows; still an error, not a panic
        let price = format!("0.{}1", "0".repeat(77));
        let err = calculate_order_amounts(
            Side::Buy,
            Some("1"),
            &price,
            VolumeMode::Shares,
            None,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::Arithmetic(_)));
    }

    #[test]
    fn missing_inputs_name_the_field() {
        let err =
            calculate_order_amounts(Side::Buy, None, "50", VolumeMode::Shares, None, true)
                .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "shares", .. }
        ));

        let err =
            calculate_order_amounts(Side::Buy, Some("1"), "50", VolumeMode::Amount, None, true)
                .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "amount", .. }
        ));
    }

    #[test]
    fn zero_shares_rejected_in_shares_mode() {
        let err =
            calculate_order_amounts(Side::Sell, Some("0"), "50", VolumeMode::Shares, None, true)
                .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation { field: "shares", .. }
        ));
    }
}
