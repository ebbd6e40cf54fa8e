use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::decimal::{RATE_FACTOR, SECONDS_PER_DAY};
use crate::errors::{Result, YieldError};
use crate::types::{AccountId, GroupId, RateTier, YieldRate};

/// group every account belongs to until assigned elsewhere
pub const DEFAULT_GROUP: GroupId = 0;

/// source of rate schedules and group membership
pub trait ScheduleStore {
    /// Snapshot of the group's schedule, oldest entry first.
    ///
    /// Returned by value so a resolution in flight never sees a schedule
    /// that is being edited.
    fn rates_for_group(&self, group: GroupId) -> Result<Vec<YieldRate>>;

    fn group_of(&self, account: AccountId) -> GroupId;
}

/// hashmap-backed schedule store that enforces the schedule invariants on
/// every write
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryScheduleStore {
    schedules: HashMap<GroupId, Vec<YieldRate>>,
    memberships: HashMap<AccountId, GroupId>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// store with a single day-zero entry for the default group
    pub fn with_default_rate(tiers: Vec<RateTier>) -> Result<Self> {
        let mut store = Self::new();
        store.add_rate(DEFAULT_GROUP, YieldRate::new(0, tiers))?;
        Ok(store)
    }

    /// append a new entry; the first must start at day 0 and each later one
    /// strictly after its predecessor
    pub fn add_rate(&mut self, group: GroupId, rate: YieldRate) -> Result<()> {
        validate_day(rate.effective_day)?;
        validate_tiers(&rate.tiers)?;

        let schedule = self.schedules.entry(group).or_default();
        match schedule.last() {
            None if rate.effective_day != 0 => {
                return Err(YieldError::InvalidScheduleOrdering {
                    message: format!(
                        "first rate of group {} must start at day 0, got {}",
                        group, rate.effective_day
                    ),
                });
            }
            Some(last) if rate.effective_day <= last.effective_day => {
                return Err(YieldError::InvalidScheduleOrdering {
                    message: format!(
                        "rate for day {} does not follow day {}",
                        rate.effective_day, last.effective_day
                    ),
                });
            }
            _ => {}
        }

        info!(group, effective_day = rate.effective_day, tiers = rate.tiers.len(), "schedule: rate added");
        schedule.push(rate);
        Ok(())
    }

    /// Correct an entry in place.
    ///
    /// Only the newest entry or one that has not taken effect by `today` can
    /// change, and a not-yet-effective entry cannot be moved into the past.
    pub fn update_rate(
        &mut self,
        group: GroupId,
        index: usize,
        rate: YieldRate,
        today: u64,
    ) -> Result<()> {
        let schedule = self
            .schedules
            .get_mut(&group)
            .filter(|s| index < s.len())
            .ok_or_else(|| YieldError::InvalidScheduleOrdering {
                message: format!("group {} has no rate at index {}", group, index),
            })?;

        let current = &schedule[index];
        let is_last = index + 1 == schedule.len();
        let is_future = current.effective_day > today;
        if !is_last && !is_future {
            return Err(YieldError::RateNotUpdatable { group, index });
        }
        if is_future && rate.effective_day <= today {
            return Err(YieldError::InvalidScheduleOrdering {
                message: format!("pending rate cannot move to past day {}", rate.effective_day),
            });
        }

        validate_day(rate.effective_day)?;
        validate_tiers(&rate.tiers)?;

        if index == 0 && rate.effective_day != 0 {
            return Err(YieldError::InvalidScheduleOrdering {
                message: "first rate must stay at day 0".to_string(),
            });
        }
        if index > 0 && rate.effective_day <= schedule[index - 1].effective_day {
            return Err(YieldError::InvalidScheduleOrdering {
                message: format!(
                    "rate for day {} does not follow day {}",
                    rate.effective_day,
                    schedule[index - 1].effective_day
                ),
            });
        }
        if let Some(next) = schedule.get(index + 1) {
            if rate.effective_day >= next.effective_day {
                return Err(YieldError::InvalidScheduleOrdering {
                    message: format!(
                        "rate for day {} does not precede day {}",
                        rate.effective_day, next.effective_day
                    ),
                });
            }
        }

        info!(group, index, effective_day = rate.effective_day, "schedule: rate updated");
        schedule[index] = rate;
        Ok(())
    }

    pub fn set_group(&mut self, account: AccountId, group: GroupId) {
        self.memberships.insert(account, group);
    }

    pub fn schedule(&self, group: GroupId) -> &[YieldRate] {
        self.schedules.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl ScheduleStore for InMemoryScheduleStore {
    fn rates_for_group(&self, group: GroupId) -> Result<Vec<YieldRate>> {
        Ok(self.schedule(group).to_vec())
    }

    fn group_of(&self, account: AccountId) -> GroupId {
        self.memberships.get(&account).copied().unwrap_or(DEFAULT_GROUP)
    }
}

/// the day's start in seconds must fit a timestamp
fn validate_day(day: u64) -> Result<()> {
    if day.checked_mul(SECONDS_PER_DAY).is_none() {
        return Err(YieldError::InvalidScheduleOrdering {
            message: format!("effective day {} is out of range", day),
        });
    }
    Ok(())
}

fn validate_tiers(tiers: &[RateTier]) -> Result<()> {
    if tiers.is_empty() {
        return Err(YieldError::InvalidRateTiers {
            message: "at least one tier is required".to_string(),
        });
    }
    if let Some(tier) = tiers.iter().find(|t| t.rate.raw() > RATE_FACTOR) {
        return Err(YieldError::InvalidRateTiers {
            message: format!("tier rate {} exceeds 100% per day", tier.rate),
        });
    }
    Ok(())
}
