use crate::decimal::Money;
use crate::errors::{Result, YieldError};
use crate::interest::compound::compound_daily;
use crate::types::{Timestamp, YieldRate, YieldResult};

/// Compound `[from, to)` across the schedule entries `rates[start..=end]`.
///
/// Each entry gets its own sub-interval, cut at entry boundaries. The first
/// sub-interval starts from `balance + settled_seed` and carries `live_seed`;
/// every later one starts from the running balance (everything before plus
/// all yield produced so far) with no live seed.
#[allow(clippy::too_many_arguments)]
pub fn split_and_compound(
    rates: &[YieldRate],
    from: Timestamp,
    to: Timestamp,
    start: usize,
    end: usize,
    balance: Money,
    live_seed: Money,
    settled_seed: Money,
) -> Result<Vec<YieldResult>> {
    if start > end || end >= rates.len() {
        return Err(YieldError::InvalidScheduleOrdering {
            message: format!("bad rate range {}..={} for {} rates", start, end, rates.len()),
        });
    }

    let opening = balance.checked_add(settled_seed)?;

    if start == end {
        return Ok(vec![compound_daily(from, to, &rates[start].tiers, opening, live_seed)?]);
    }

    let mut results = Vec::with_capacity(end - start + 1);

    let first = compound_daily(
        from,
        rates[start + 1].effective_from(),
        &rates[start].tiers,
        opening,
        live_seed,
    )?;
    let mut running = opening.checked_add(first.total())?;
    results.push(first);

    for i in start + 1..end {
        let middle = compound_daily(
            rates[i].effective_from(),
            rates[i + 1].effective_from(),
            &rates[i].tiers,
            running,
            Money::ZERO,
        )?;
        running = running.checked_add(middle.total())?;
        results.push(middle);
    }

    results.push(compound_daily(
        rates[end].effective_from(),
        to,
        &rates[end].tiers,
        running,
        Money::ZERO,
    )?);

    Ok(results)
}
