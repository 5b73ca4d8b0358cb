//! Fixed-point rendering of raw backend amounts.
//!
//! All arithmetic is done on `U256`, so token balances up to `2^256 - 1`
//! base units render exactly before the final digit cut.

use providers::{Detail, RawBalance, U256};

/// Renders `amount / 10^decimals` with exactly `precision` fractional
/// digits, rounding half up when `precision < decimals`.
pub fn format_amount(amount: U256, negative: bool, decimals: u32, precision: u32) -> String {
    let scaled = if precision >= decimals {
        amount
    } else {
        let divisor = U256::exp10((decimals - precision) as usize);
        let (quotient, remainder) = amount.div_mod(divisor);

        // quotient is at most MAX / 10, the increment cannot overflow
        if remainder + remainder >= divisor {
            quotient + U256::one()
        } else {
            quotient
        }
    };

    let shown = decimals.min(precision);
    let (integer, fraction) = scaled.div_mod(U256::exp10(shown as usize));

    let mut out = String::new();

    if negative && !scaled.is_zero() {
        out.push('-');
    }

    out.push_str(&integer.to_string());

    if precision > 0 {
        let mut digits = if shown > 0 {
            format!("{:0>width$}", fraction.to_string(), width = shown as usize)
        } else {
            String::new()
        };
        digits.push_str(&"0".repeat((precision - shown) as usize));

        out.push('.');
        out.push_str(&digits);
    }

    out
}

/// Human readable summary of a lookup result.
pub fn format_balance(raw: &RawBalance) -> String {
    let denomination = raw.denomination;
    let amount = format_amount(
        raw.amount,
        raw.negative,
        denomination.decimals,
        denomination.precision,
    );

    match raw.detail {
        Detail::Native { tx_count } => {
            format!("Balance: {amount} {}, txs: {tx_count}", denomination.unit)
        }
        Detail::Token => format!(
            "Token balance (raw): {}  (display approx: {amount} {})",
            raw.amount, denomination.unit
        ),
        Detail::Plain => format!("Balance: {amount} {}", denomination.unit),
    }
}
