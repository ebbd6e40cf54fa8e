use crate::decimal::{Money, SECONDS_PER_DAY};
use crate::errors::{Result, YieldError};
use crate::interest::tiered::{calculate_tiered_interest, TieredInterest};
use crate::types::{is_day_aligned, next_day_start, RateTier, Timestamp, YieldResult};

/// Compound `balance` daily over `[from, to)` under a single set of tiers.
///
/// The interval is cut into an optional leading partial day, whole days, and
/// an optional trailing partial day. Whole days compound: each day's interest
/// is added to the balance the next day earns on. `live_seed` is the stream
/// yield left over from the previous update; it is folded in at the first day
/// boundary reached, or stays in the trailing partial when none is reached.
/// An empty window or a zero balance yields an all-zero result.
pub fn compound_daily(
    from: Timestamp,
    to: Timestamp,
    tiers: &[RateTier],
    balance: Money,
    live_seed: Money,
) -> Result<YieldResult> {
    if from > to {
        return Err(YieldError::InvalidTimeRange { from, to });
    }

    let mut result = YieldResult::zero(tiers.len());
    if from == to || balance.is_zero() {
        return Ok(result);
    }
    result.carried_stream = live_seed;

    let mut cursor = from;
    let mut balance = balance;
    let next_day = next_day_start(from);

    if !is_day_aligned(from) {
        let partial = calculate_tiered_interest(balance, tiers, to.min(next_day) - from)?;

        if to <= next_day {
            // never reaches a fresh day, so nothing settles
            result.last_day_partial_yield = partial.total.checked_add(live_seed)?;
            accumulate(&mut result.last_day_partial_by_tier, &partial);
            return Ok(result);
        }

        result.first_day_partial_yield = partial.total.checked_add(live_seed)?;
        accumulate(&mut result.first_day_partial_by_tier, &partial);
        balance = balance.checked_add(result.first_day_partial_yield)?;
        cursor = next_day;
    } else {
        result.first_day_partial_yield = live_seed;

        if to < next_day {
            let partial =
                calculate_tiered_interest(balance.checked_add(live_seed)?, tiers, to - cursor)?;
            result.last_day_partial_yield = partial.total;
            accumulate(&mut result.last_day_partial_by_tier, &partial);
            return Ok(result);
        }

        balance = balance.checked_add(live_seed)?;
    }

    while to - cursor >= SECONDS_PER_DAY {
        let daily = calculate_tiered_interest(balance, tiers, SECONDS_PER_DAY)?;
        balance = balance.checked_add(daily.total)?;
        result.full_days_yield = result.full_days_yield.checked_add(daily.total)?;
        accumulate(&mut result.full_days_by_tier, &daily);
        cursor += SECONDS_PER_DAY;
    }

    if cursor < to {
        let partial = calculate_tiered_interest(balance, tiers, to - cursor)?;
        result.last_day_partial_yield = partial.total;
        accumulate(&mut result.last_day_partial_by_tier, &partial);
    }

    Ok(result)
}

fn accumulate(into: &mut [Money], interest: &TieredInterest) {
    for (slot, earned) in into.iter_mut().zip(&interest.by_tier) {
        *slot += *earned;
    }
}
