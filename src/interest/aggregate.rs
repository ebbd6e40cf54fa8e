use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::YieldResult;

/// yield split into what has settled and what is still accruing today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregatedYield {
    pub settled: Money,
    pub live: Money,
}

/// Reduce per-sub-interval results to a `(settled, live)` pair.
///
/// Only the final sub-interval's trailing partial day is live. Any earlier
/// trailing partial was cut by a later sub-interval and is settled.
pub fn aggregate_yield(results: &[YieldResult]) -> AggregatedYield {
    let Some((last, earlier)) = results.split_last() else {
        return AggregatedYield::default();
    };

    let settled = earlier.iter().map(YieldResult::total).sum::<Money>()
        + last.first_day_partial_yield
        + last.full_days_yield;

    AggregatedYield {
        settled,
        live: last.last_day_partial_yield,
    }
}
