//! One-shot import of positions from the legacy accounting system.
//!
//! A legacy read can fail in several distinct ways. Each failure is recorded
//! against its account and the batch carries on with the next one.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decimal::Money;
use crate::types::{AccountId, Timestamp};

/// why a legacy position could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegacyError {
    #[error("legacy call reverted: {reason}")]
    Reverted {
        reason: String,
    },

    #[error("legacy call panicked with code {code:#x}")]
    Panicked {
        code: u32,
    },

    #[error("legacy call failed: {message}")]
    Failed {
        message: String,
    },
}

/// an account's standing in the legacy system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPosition {
    pub accrued_yield: Money,
    pub balance: Money,
    pub timestamp: Timestamp,
}

pub trait LegacySource {
    fn position_of(&self, account: AccountId) -> Result<LegacyPosition, LegacyError>;
}

/// outcome of a migration batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub migrated: Vec<AccountId>,
    /// already initialized, left untouched
    pub skipped: Vec<AccountId>,
    pub failed: Vec<(AccountId, LegacyError)>,
}

impl MigrationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// accounts worth retrying in a later batch
    pub fn failed_accounts(&self) -> Vec<AccountId> {
        self.failed.iter().map(|(account, _)| *account).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_report_failures() {
        let ok = Uuid::new_v4();
        let bad = Uuid::new_v4();
        let report = MigrationReport {
            migrated: vec![ok],
            skipped: vec![],
            failed: vec![(bad, LegacyError::Panicked { code: 0x11 })],
        };

        assert!(!report.is_complete());
        assert_eq!(report.failed_accounts(), vec![bad]);
        assert_eq!(
            report.failed[0].1.to_string(),
            "legacy call panicked with code 0x11"
        );
    }
}
