use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate, SECONDS_PER_DAY};

/// unique identifier for a yield-bearing account
pub type AccountId = Uuid;

/// identifier of the rate group an account belongs to
pub type GroupId = u32;

/// unix time in seconds
pub type Timestamp = u64;

/// a capped band of principal earning its own rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub rate: Rate,
    /// zero means unbounded: the tier absorbs everything left
    pub cap: Money,
}

impl RateTier {
    pub fn new(rate: Rate, cap: Money) -> Self {
        Self { rate, cap }
    }

    /// catch-all tier with no cap
    pub fn unbounded(rate: Rate) -> Self {
        Self { rate, cap: Money::ZERO }
    }

    pub fn is_unbounded(&self) -> bool {
        self.cap.is_zero()
    }
}

/// one entry of a group's rate schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldRate {
    /// day index since epoch at which these tiers take effect
    pub effective_day: u64,
    pub tiers: Vec<RateTier>,
}

impl YieldRate {
    pub fn new(effective_day: u64, tiers: Vec<RateTier>) -> Self {
        Self { effective_day, tiers }
    }

    /// start of this entry's window, in seconds; saturates for days beyond
    /// the timestamp range
    pub fn effective_from(&self) -> Timestamp {
        self.effective_day.saturating_mul(SECONDS_PER_DAY)
    }
}

/// output of compounding one rate-homogeneous sub-interval
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YieldResult {
    pub first_day_partial_yield: Money,
    pub full_days_yield: Money,
    pub last_day_partial_yield: Money,
    /// live yield carried in from the previous update, already included in
    /// one of the totals above but not attributed to any tier
    pub carried_stream: Money,
    pub first_day_partial_by_tier: Vec<Money>,
    pub full_days_by_tier: Vec<Money>,
    pub last_day_partial_by_tier: Vec<Money>,
}

impl YieldResult {
    pub fn zero(tier_count: usize) -> Self {
        Self {
            first_day_partial_by_tier: vec![Money::ZERO; tier_count],
            full_days_by_tier: vec![Money::ZERO; tier_count],
            last_day_partial_by_tier: vec![Money::ZERO; tier_count],
            ..Default::default()
        }
    }

    pub fn total(&self) -> Money {
        self.first_day_partial_yield + self.full_days_yield + self.last_day_partial_yield
    }

    /// interest credited to tiers, excluding the carried live yield
    pub fn tier_total(&self) -> Money {
        self.first_day_partial_by_tier.iter().sum::<Money>()
            + self.full_days_by_tier.iter().sum::<Money>()
            + self.last_day_partial_by_tier.iter().sum::<Money>()
    }
}

/// day index containing `ts`
pub fn day_index(ts: Timestamp) -> u64 {
    ts / SECONDS_PER_DAY
}

/// midnight at or before `ts`
pub fn day_start(ts: Timestamp) -> Timestamp {
    day_index(ts) * SECONDS_PER_DAY
}

pub fn next_day_start(ts: Timestamp) -> Timestamp {
    day_start(ts) + SECONDS_PER_DAY
}

pub fn is_day_aligned(ts: Timestamp) -> bool {
    ts % SECONDS_PER_DAY == 0
}
