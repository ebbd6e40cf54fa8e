use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{Result, YieldError};
use crate::types::AccountId;

/// token ledger holding balances and paying out claims
///
/// Whoever owns the ledger calls [`crate::YieldEngine::on_balance_change`]
/// after every balance movement so accrual is committed against the old
/// balance first.
pub trait TokenLedger {
    fn balance_of(&self, account: AccountId) -> Money;

    /// pay `amount` from the yield reserve to `to`
    fn transfer(&mut self, to: AccountId, amount: Money) -> Result<()>;
}

/// completed payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub to: AccountId,
    pub amount: Money,
}

/// hashmap-backed ledger with a reserve that funds payouts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    balances: HashMap<AccountId, Money>,
    reserve: Money,
    transfers: Vec<Transfer>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reserve(reserve: Money) -> Self {
        Self {
            reserve,
            ..Self::default()
        }
    }

    /// overwrite a holder's balance (deposit or withdrawal)
    pub fn set_balance(&mut self, account: AccountId, balance: Money) {
        self.balances.insert(account, balance);
    }

    pub fn fund_reserve(&mut self, amount: Money) {
        self.reserve += amount;
    }

    pub fn reserve(&self) -> Money {
        self.reserve
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, account: AccountId) -> Money {
        self.balances.get(&account).copied().unwrap_or(Money::ZERO)
    }

    fn transfer(&mut self, to: AccountId, amount: Money) -> Result<()> {
        let remaining = self
            .reserve
            .checked_sub(amount)
            .ok_or_else(|| YieldError::LedgerFailure {
                message: format!("reserve {} cannot cover {}", self.reserve, amount),
            })?;
        let credited = self.balance_of(to).checked_add(amount)?;

        self.reserve = remaining;
        self.balances.insert(to, credited);
        self.transfers.push(Transfer { to, amount });
        Ok(())
    }
}
