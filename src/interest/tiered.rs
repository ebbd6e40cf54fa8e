use serde::{Deserialize, Serialize};

use crate::decimal::{mul_div_floor, Money, RATE_FACTOR, SECONDS_PER_DAY};
use crate::errors::Result;
use crate::types::RateTier;

/// simple interest for one segment, split by tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredInterest {
    pub total: Money,
    pub by_tier: Vec<Money>,
}

/// Simple interest on `amount` for `elapsed_seconds`, allocated across tiers.
///
/// Tiers are filled in order: each takes `min(remaining, cap)` (or everything
/// left when its cap is zero) and earns
/// `allocated * rate * elapsed / (SECONDS_PER_DAY * RATE_FACTOR)`, rounded down.
/// Principal beyond the last capped tier earns nothing.
pub fn calculate_tiered_interest(
    amount: Money,
    tiers: &[RateTier],
    elapsed_seconds: u64,
) -> Result<TieredInterest> {
    let mut by_tier = vec![Money::ZERO; tiers.len()];
    let mut total = Money::ZERO;
    let mut remaining = amount;
    let denominator = SECONDS_PER_DAY as u128 * RATE_FACTOR as u128;

    for (i, tier) in tiers.iter().enumerate() {
        if remaining.is_zero() {
            break;
        }

        let allocated = if tier.is_unbounded() {
            remaining
        } else {
            remaining.min(tier.cap)
        };

        let interest = Money::from_units(mul_div_floor(
            allocated.units(),
            tier.rate.raw() as u128,
            elapsed_seconds as u128,
            denominator,
        )?);

        by_tier[i] = interest;
        total = total.checked_add(interest)?;
        remaining -= allocated;
    }

    Ok(TieredInterest { total, by_tier })
}
