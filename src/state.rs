use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::Timestamp;

/// position of an account in its lifecycle; there is no terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// no yield state recorded yet
    Uninitialized,
    /// accruing, committed on every balance change or claim
    Active,
}

/// per-account accrual state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YieldState {
    /// never decreases across commits
    pub last_update_timestamp: Timestamp,
    pub last_update_balance: Money,
    /// settled yield from closed days, not yet claimed
    pub accrued_yield: Money,
    /// yield accruing within the day of `last_update_timestamp`
    pub stream_yield: Money,
    pub initialized: bool,
}

impl YieldState {
    /// fresh state with no yield
    pub fn new(balance: Money, timestamp: Timestamp) -> Self {
        Self {
            last_update_timestamp: timestamp,
            last_update_balance: balance,
            accrued_yield: Money::ZERO,
            stream_yield: Money::ZERO,
            initialized: true,
        }
    }

    /// state carried over from a prior accounting system
    pub fn migrated(accrued_yield: Money, balance: Money, timestamp: Timestamp) -> Self {
        Self {
            accrued_yield,
            ..Self::new(balance, timestamp)
        }
    }

    pub fn status(&self) -> AccountStatus {
        if self.initialized {
            AccountStatus::Active
        } else {
            AccountStatus::Uninitialized
        }
    }

    /// everything claimable right now
    pub fn total_yield(&self) -> Money {
        self.accrued_yield + self.stream_yield
    }
}
