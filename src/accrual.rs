use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decimal::Money;
use crate::errors::{Result, YieldError};
use crate::interest::{aggregate_yield, split_and_compound};
use crate::schedule::resolve_rate_range;
use crate::state::YieldState;
use crate::types::{Timestamp, YieldRate, YieldResult};

/// read-only projection of an account's accrual up to a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccruePreview {
    pub state_before: YieldState,
    pub timestamp: Timestamp,
    /// schedule entries the window touched, oldest first
    pub rates: Vec<YieldRate>,
    /// one result per touched entry
    pub results: Vec<YieldResult>,
    pub settled_before: Money,
    pub live_before: Money,
    pub settled_after: Money,
    pub live_after: Money,
}

impl AccruePreview {
    fn unchanged(state: &YieldState) -> Self {
        Self {
            state_before: state.clone(),
            timestamp: state.last_update_timestamp,
            rates: Vec::new(),
            results: Vec::new(),
            settled_before: state.accrued_yield,
            live_before: state.stream_yield,
            settled_after: state.accrued_yield,
            live_after: state.stream_yield,
        }
    }

    /// the state a commit of this preview writes back
    pub fn state_after(&self) -> YieldState {
        YieldState {
            last_update_timestamp: self.timestamp,
            accrued_yield: self.settled_after,
            stream_yield: self.live_after,
            ..self.state_before.clone()
        }
    }

    /// yield newly settled by this window
    pub fn newly_settled(&self) -> Money {
        self.settled_after - self.settled_before
    }

    pub fn is_unchanged(&self) -> bool {
        self.timestamp == self.state_before.last_update_timestamp
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Project `state` forward to `now` under `rates` without mutating anything.
///
/// The balance since the last update compounds on top of the already settled
/// yield. Whatever was live at the last update is carried into the first day
/// touched. `now` equal to the last update is a no-op; earlier is an error.
pub fn preview(state: &YieldState, rates: &[YieldRate], now: Timestamp) -> Result<AccruePreview> {
    if rates.is_empty() {
        return Err(YieldError::EmptyRateSchedule);
    }

    let from = state.last_update_timestamp;
    if now < from {
        return Err(YieldError::InvalidTimeRange { from, to: now });
    }
    if now == from {
        return Ok(AccruePreview::unchanged(state));
    }

    let (start, end) = resolve_rate_range(rates, from, now)?;
    debug!(from, to = now, start, end, "accrual: resolved rate range");

    let results = split_and_compound(
        rates,
        from,
        now,
        start,
        end,
        state.last_update_balance,
        state.stream_yield,
        state.accrued_yield,
    )?;
    let aggregated = aggregate_yield(&results);

    Ok(AccruePreview {
        state_before: state.clone(),
        timestamp: now,
        rates: rates[start..=end].to_vec(),
        results,
        settled_before: state.accrued_yield,
        live_before: state.stream_yield,
        settled_after: state.accrued_yield.checked_add(aggregated.settled)?,
        live_after: aggregated.live,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::{Rate, SECONDS_PER_DAY};
    use crate::types::RateTier;
    use proptest::prelude::*;

    const DAY: u64 = SECONDS_PER_DAY;

    fn tiered(day: u64, first_pct: u32, rest_pct: u32) -> YieldRate {
        YieldRate::new(day, vec![
            RateTier::new(Rate::from_percentage(first_pct), Money::from_units(1_000_000)),
            RateTier::unbounded(Rate::from_percentage(rest_pct)),
        ])
    }

    fn schedule() -> Vec<YieldRate> {
        vec![tiered(0, 3, 1), tiered(12, 2, 1), tiered(15, 4, 2)]
    }

    #[test]
    fn test_same_timestamp_is_noop() {
        let state = YieldState::new(Money::from_units(1_000_000), 10 * DAY + 5);
        let p = preview(&state, &schedule(), 10 * DAY + 5).unwrap();
        assert!(p.is_unchanged());
        assert_eq!(p.state_after(), state);
    }

    #[test]
    fn test_time_going_backward_rejected() {
        let state = YieldState::new(Money::from_units(1_000_000), 10 * DAY);
        assert_eq!(
            preview(&state, &schedule(), DAY).unwrap_err(),
            YieldError::InvalidTimeRange { from: 10 * DAY, to: DAY }
        );
    }

    #[test]
    fn test_empty_schedule_rejected() {
        let state = YieldState::new(Money::from_units(1), 0);
        assert_eq!(preview(&state, &[], 0).unwrap_err(), YieldError::EmptyRateSchedule);
    }

    #[test]
    fn test_partial_day_stays_live() {
        let state = YieldState::new(Money::from_units(1_000_000), 10 * DAY);
        let p = preview(&state, &schedule(), 10 * DAY + DAY / 2).unwrap();

        assert_eq!(p.settled_after, Money::ZERO);
        assert_eq!(p.live_after, Money::from_units(15_000));
        assert_eq!(p.rates, vec![tiered(0, 3, 1)]);
    }

    #[test]
    fn test_live_yield_settles_once_day_closes() {
        let mut state = YieldState::new(Money::from_units(1_000_000), 10 * DAY + DAY / 2);
        state.stream_yield = Money::from_units(15_000);
        state.accrued_yield = Money::from_units(100);

        let p = preview(&state, &schedule(), 11 * DAY + DAY / 2).unwrap();

        // rest of day 10 on 1_000_100 (the 100 earns under a unit), plus the carried 15_000
        assert_eq!(p.results[0].first_day_partial_yield, Money::from_units(30_000));
        assert_eq!(p.settled_after, Money::from_units(30_100));
        // half of day 11 on 1_030_100: 15_000 + 30_100 * 1% / 2
        assert_eq!(p.live_after, Money::from_units(15_150));
        assert_eq!(p.newly_settled(), Money::from_units(30_000));
    }

    #[test]
    fn test_trailing_partial_before_rate_change_settles() {
        // starts mid-day 11 and crosses into the day-12 rate
        let state = YieldState::new(Money::from_units(1_000_000), 11 * DAY + DAY / 2);
        let p = preview(&state, &schedule(), 12 * DAY + DAY / 2).unwrap();

        assert_eq!(p.results.len(), 2);
        // the half day under the old rate never reached a boundary on its own
        assert_eq!(p.results[0].last_day_partial_yield, Money::from_units(15_000));
        assert_eq!(p.results[0].first_day_partial_yield, Money::ZERO);
        // but it is settled because a later sub-interval follows it
        assert_eq!(p.settled_after, Money::from_units(15_000));
        // 1_015_000 at 2% on the first million, 1% beyond, for half a day
        assert_eq!(p.live_after, Money::from_units(10_075));
    }

    #[test]
    fn test_preview_is_pure() {
        let mut state = YieldState::new(Money::from_units(3_333_333), 7 * DAY + 999);
        state.stream_yield = Money::from_units(77);
        let rates = schedule();
        let a = preview(&state, &rates, 19 * DAY + 4_444).unwrap();
        let b = preview(&state, &rates, 19 * DAY + 4_444).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.state_before, state);
        assert_eq!(a.rates.len(), 3);
    }

    proptest! {
        #[test]
        fn additive_across_day_aligned_cut(
            balance in 0u128..100_000_000_000,
            t0 in 0u64..20 * DAY,
            cut_days in 0u64..10,
            tail in 0u64..10 * DAY,
        ) {
            let rates = schedule();
            let t1 = (t0 / DAY + 1 + cut_days) * DAY;
            let t2 = t1 + tail;
            let start = YieldState::new(Money::from_units(balance), t0);

            let direct = preview(&start, &rates, t2).unwrap();

            let halfway = preview(&start, &rates, t1).unwrap().state_after();
            let stepped = preview(&halfway, &rates, t2).unwrap();

            prop_assert_eq!(direct.settled_after, stepped.settled_after);
            prop_assert_eq!(direct.live_after, stepped.live_after);
        }

        #[test]
        fn preview_never_mutates(
            balance in 0u128..100_000_000_000,
            t0 in 0u64..20 * DAY,
            span in 0u64..20 * DAY,
        ) {
            let rates = schedule();
            let state = YieldState::new(Money::from_units(balance), t0);
            let snapshot = state.clone();
            let a = preview(&state, &rates, t0 + span).unwrap();
            let b = preview(&state, &rates, t0 + span).unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(state, snapshot);
        }
    }
}
