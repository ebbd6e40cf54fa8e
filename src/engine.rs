use std::collections::HashMap;

use hourglass_rs::SafeTimeProvider;
use tracing::{debug, info, warn};

use crate::accrual::{preview, AccruePreview};
use crate::claims::{settle_claim, validate_claim_amount, ClaimPreview, ClaimReceipt};
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{Result, YieldError};
use crate::events::{Event, EventStore};
use crate::ledger::TokenLedger;
use crate::migration::{LegacyError, LegacySource, MigrationReport};
use crate::schedule::ScheduleStore;
use crate::state::YieldState;
use crate::types::{AccountId, Timestamp, YieldRate};

/// source of the current unix time
pub trait Clock {
    fn unix_now(&self) -> Timestamp;
}

impl Clock for SafeTimeProvider {
    fn unix_now(&self) -> Timestamp {
        // pre-epoch clocks clamp to zero
        u64::try_from(self.now().timestamp()).unwrap_or(0)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn unix_now(&self) -> Timestamp {
        (**self).unix_now()
    }
}

/// Per-account accrual bookkeeping on top of a ledger, a schedule store and a
/// clock.
///
/// Every mutating call works on copies and writes state back only once all
/// of its steps succeeded.
pub struct YieldEngine<L, S, C> {
    config: EngineConfig,
    ledger: L,
    schedules: S,
    clock: C,
    states: HashMap<AccountId, YieldState>,
    events: EventStore,
}

impl<L: TokenLedger, S: ScheduleStore, C: Clock> YieldEngine<L, S, C> {
    pub fn new(config: EngineConfig, ledger: L, schedules: S, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ledger,
            schedules,
            clock,
            states: HashMap::new(),
            events: EventStore::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct ledger access. Call [`YieldEngine::on_balance_change`] after
    /// moving a tracked account's balance.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn schedules(&self) -> &S {
        &self.schedules
    }

    pub fn schedules_mut(&mut self) -> &mut S {
        &mut self.schedules
    }

    pub fn now(&self) -> Timestamp {
        self.clock.unix_now()
    }

    /// stored state; unknown accounts read as uninitialized
    pub fn get_yield_state(&self, account: AccountId) -> YieldState {
        self.states.get(&account).cloned().unwrap_or_default()
    }

    fn active_state(&self, account: AccountId) -> Result<&YieldState> {
        self.states
            .get(&account)
            .filter(|s| s.initialized)
            .ok_or(YieldError::AccountNotInitialized { account })
    }

    fn rates_for(&self, account: AccountId) -> Result<Vec<YieldRate>> {
        self.schedules.rates_for_group(self.schedules.group_of(account))
    }

    /// projection of `account` to `now`; changes nothing
    pub fn get_accrue_preview(&self, account: AccountId, now: Timestamp) -> Result<AccruePreview> {
        let state = self.active_state(account)?;
        let rates = self.rates_for(account)?;
        preview(state, &rates, now)
    }

    /// what claiming everything claimable at `now` would pay out
    pub fn get_claim_preview(&self, account: AccountId, now: Timestamp) -> Result<ClaimPreview> {
        ClaimPreview::from_accrual(self.get_accrue_preview(account, now)?, &self.config)
    }

    /// start tracking `account` from its current ledger balance
    pub fn initialize_account(&mut self, account: AccountId) -> Result<YieldState> {
        if self.get_yield_state(account).initialized {
            return Err(YieldError::AccountAlreadyInitialized { account });
        }

        let now = self.now();
        let balance = self.ledger.balance_of(account);
        let state = YieldState::new(balance, now);
        self.states.insert(account, state.clone());

        info!(%account, %balance, timestamp = now, "account initialized");
        self.events.emit(Event::AccountInitialized {
            account,
            balance,
            timestamp: now,
        });
        Ok(state)
    }

    /// bring `account` up to the clock and persist the result
    pub fn commit(&mut self, account: AccountId) -> Result<AccruePreview> {
        let accrual = self.get_accrue_preview(account, self.now())?;
        self.record_accrual(account, &accrual);
        self.states.insert(account, accrual.state_after());
        Ok(accrual)
    }

    /// Ledger hook, called after every balance movement of `account`.
    ///
    /// Accrual up to now is committed against the old balance before the new
    /// one is recorded. An account seen for the first time is initialized.
    pub fn on_balance_change(&mut self, account: AccountId) -> Result<YieldState> {
        if !self.get_yield_state(account).initialized {
            return self.initialize_account(account);
        }

        let accrual = self.get_accrue_preview(account, self.now())?;
        let state = accrual.state_after();
        Ok(self.write_synced(account, &accrual, state))
    }

    /// Claim `amount` of accrued yield for `account`.
    ///
    /// The fee goes out first, then the net amount. State is written only
    /// after both transfers went through. A tracked fee destination has its
    /// accrual committed against its old balance before the fee lands.
    pub fn claim(&mut self, account: AccountId, amount: Money) -> Result<ClaimReceipt> {
        validate_claim_amount(amount, &self.config)?;

        let now = self.now();
        let accrual = self.get_accrue_preview(account, now)?;
        let settlement = settle_claim(&accrual.state_after(), amount, &self.config)?;

        let fee_destination = settlement
            .fee_destination
            .filter(|_| !settlement.fee.is_zero());
        let destination_accrual = match fee_destination {
            Some(destination)
                if destination != account && self.get_yield_state(destination).initialized =>
            {
                Some((destination, self.get_accrue_preview(destination, now)?))
            }
            _ => None,
        };

        if let Some(destination) = fee_destination {
            self.ledger.transfer(destination, settlement.fee)?;
        }
        if !settlement.net_amount.is_zero() {
            self.ledger.transfer(account, settlement.net_amount)?;
        }

        self.write_synced(account, &accrual, settlement.state_after);
        info!(
            %account,
            %amount,
            fee = %settlement.fee,
            net = %settlement.net_amount,
            "yield claimed"
        );
        self.events.emit(Event::YieldClaimed {
            account,
            amount,
            fee: settlement.fee,
            net_amount: settlement.net_amount,
            timestamp: accrual.timestamp,
        });

        if let Some((destination, destination_accrual)) = destination_accrual {
            let state = destination_accrual.state_after();
            self.write_synced(destination, &destination_accrual, state);
        }

        Ok(ClaimReceipt {
            account,
            amount,
            fee: settlement.fee,
            net_amount: settlement.net_amount,
            from_accrued: settlement.from_accrued,
            from_stream: settlement.from_stream,
            timestamp: accrual.timestamp,
        })
    }

    /// Import positions from a legacy source.
    ///
    /// Already-initialized accounts are skipped. A failed read is recorded
    /// and the batch moves on.
    pub fn migrate_accounts<M: LegacySource + ?Sized>(
        &mut self,
        source: &M,
        accounts: &[AccountId],
    ) -> MigrationReport {
        let now = self.now();
        let mut report = MigrationReport::default();

        for &account in accounts {
            if self.get_yield_state(account).initialized {
                report.skipped.push(account);
                continue;
            }

            let position = source.position_of(account).and_then(|p| {
                if p.timestamp > now {
                    Err(LegacyError::Failed {
                        message: format!("position timestamp {} is after now {}", p.timestamp, now),
                    })
                } else {
                    Ok(p)
                }
            });

            match position {
                Ok(p) => {
                    self.states
                        .insert(account, YieldState::migrated(p.accrued_yield, p.balance, p.timestamp));
                    self.events.emit(Event::AccountMigrated {
                        account,
                        accrued_yield: p.accrued_yield,
                        balance: p.balance,
                        timestamp: p.timestamp,
                    });
                    report.migrated.push(account);
                }
                Err(error) => {
                    warn!(%account, %error, "legacy migration failed");
                    self.events.emit(Event::MigrationFailed {
                        account,
                        error: error.clone(),
                    });
                    report.failed.push((account, error));
                }
            }
        }

        info!(
            migrated = report.migrated.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "migration batch done"
        );
        report
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    /// persist `state` with its balance re-read from the ledger
    fn write_synced(&mut self, account: AccountId, accrual: &AccruePreview, mut state: YieldState) -> YieldState {
        let old_balance = state.last_update_balance;
        state.last_update_balance = self.ledger.balance_of(account);

        self.record_accrual(account, accrual);
        self.events.emit(Event::BalanceSynced {
            account,
            old_balance,
            new_balance: state.last_update_balance,
            timestamp: state.last_update_timestamp,
        });
        self.states.insert(account, state.clone());
        state
    }

    fn record_accrual(&mut self, account: AccountId, accrual: &AccruePreview) {
        if accrual.is_unchanged() {
            return;
        }

        debug!(
            %account,
            elapsed = accrual.timestamp - accrual.state_before.last_update_timestamp,
            settled = %accrual.newly_settled(),
            live = %accrual.live_after,
            "accrual committed"
        );
        self.events.emit(Event::YieldAccrued {
            account,
            settled: accrual.newly_settled(),
            accrued_yield: accrual.settled_after,
            stream_yield: accrual.live_after,
            timestamp: accrual.timestamp,
        });
    }
}
