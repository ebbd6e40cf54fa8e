use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::migration::LegacyError;
use crate::types::{AccountId, Timestamp};

/// all events that can be emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // lifecycle events
    AccountInitialized {
        account: AccountId,
        balance: Money,
        timestamp: Timestamp,
    },
    AccountMigrated {
        account: AccountId,
        accrued_yield: Money,
        balance: Money,
        timestamp: Timestamp,
    },
    MigrationFailed {
        account: AccountId,
        error: LegacyError,
    },

    // accrual events
    YieldAccrued {
        account: AccountId,
        settled: Money,
        accrued_yield: Money,
        stream_yield: Money,
        timestamp: Timestamp,
    },
    BalanceSynced {
        account: AccountId,
        old_balance: Money,
        new_balance: Money,
        timestamp: Timestamp,
    },

    // claim events
    YieldClaimed {
        account: AccountId,
        amount: Money,
        fee: Money,
        net_amount: Money,
        timestamp: Timestamp,
    },
}

impl Event {
    /// account the event concerns
    pub fn account(&self) -> AccountId {
        match self {
            Event::AccountInitialized { account, .. }
            | Event::AccountMigrated { account, .. }
            | Event::MigrationFailed { account, .. }
            | Event::YieldAccrued { account, .. }
            | Event::BalanceSynced { account, .. }
            | Event::YieldClaimed { account, .. } => *account,
        }
    }
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn for_account(&self, account: AccountId) -> impl Iterator<Item = &Event> + '_ {
        self.events.iter().filter(move |e| e.account() == account)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
