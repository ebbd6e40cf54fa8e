use thiserror::Error;

use crate::decimal::Money;
use crate::types::{AccountId, GroupId, Timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YieldError {
    #[error("invalid time range: from {from}, to {to}")]
    InvalidTimeRange {
        from: Timestamp,
        to: Timestamp,
    },

    #[error("rate schedule is empty")]
    EmptyRateSchedule,

    #[error("claim below minimum: minimum {minimum}, requested {requested}")]
    ClaimBelowMinimum {
        minimum: Money,
        requested: Money,
    },

    #[error("claim amount {amount} is not a multiple of {round_factor}")]
    ClaimNotRounded {
        amount: Money,
        round_factor: Money,
    },

    #[error("insufficient yield: available {available}, requested {requested}")]
    InsufficientYieldBalance {
        available: Money,
        requested: Money,
    },

    #[error("account not initialized: {account}")]
    AccountNotInitialized {
        account: AccountId,
    },

    #[error("account already initialized: {account}")]
    AccountAlreadyInitialized {
        account: AccountId,
    },

    #[error("fee configured without a fee destination")]
    FeeDestinationMissing,

    #[error("invalid schedule ordering: {message}")]
    InvalidScheduleOrdering {
        message: String,
    },

    #[error("invalid rate tiers: {message}")]
    InvalidRateTiers {
        message: String,
    },

    #[error("rate {index} of group {group} is no longer pending")]
    RateNotUpdatable {
        group: GroupId,
        index: usize,
    },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("ledger failure: {message}")]
    LedgerFailure {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, YieldError>;
