use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{Result, YieldError};
use crate::state::YieldState;
use crate::types::AccountId;

/// reject claims under the minimum, then claims off the rounding grid
pub fn validate_claim_amount(amount: Money, config: &EngineConfig) -> Result<()> {
    if amount < config.min_claim_amount {
        return Err(YieldError::ClaimBelowMinimum {
            minimum: config.min_claim_amount,
            requested: amount,
        });
    }
    if !amount.is_multiple_of(config.round_factor) {
        return Err(YieldError::ClaimNotRounded {
            amount,
            round_factor: config.round_factor,
        });
    }
    Ok(())
}

/// fee withheld from a claim of `amount`, rounded up to the claim grid
///
/// Never more than `amount`, so an off-grid amount cannot owe more fee than
/// it pays out.
pub fn claim_fee(amount: Money, config: &EngineConfig) -> Result<Money> {
    if !config.has_fee() {
        return Ok(Money::ZERO);
    }
    Ok(amount
        .apply_rate(config.fee_rate)?
        .round_up(config.round_factor)
        .min(amount))
}

/// how a claim is paid out and what it leaves behind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSettlement {
    pub amount: Money,
    pub from_accrued: Money,
    pub from_stream: Money,
    pub fee: Money,
    pub net_amount: Money,
    pub fee_destination: Option<AccountId>,
    pub state_after: YieldState,
}

/// Settle `amount` against a state already projected to claim time.
///
/// Settled yield is drawn first and any shortfall spills into the live
/// stream. Nothing is mutated; the caller persists `state_after` once the
/// payouts went through.
pub fn settle_claim(state: &YieldState, amount: Money, config: &EngineConfig) -> Result<ClaimSettlement> {
    let available = state.total_yield();
    if amount > available {
        return Err(YieldError::InsufficientYieldBalance {
            available,
            requested: amount,
        });
    }

    let from_accrued = amount.min(state.accrued_yield);
    let from_stream = amount - from_accrued;

    let fee = claim_fee(amount, config)?;
    if !fee.is_zero() && config.fee_destination.is_none() {
        return Err(YieldError::FeeDestinationMissing);
    }

    Ok(ClaimSettlement {
        amount,
        from_accrued,
        from_stream,
        fee,
        net_amount: amount - fee,
        fee_destination: config.fee_destination,
        state_after: YieldState {
            accrued_yield: state.accrued_yield - from_accrued,
            stream_yield: state.stream_yield - from_stream,
            ..state.clone()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn state(accrued: u128, stream: u128) -> YieldState {
        let mut state = YieldState::new(Money::from_units(5_000_000), 1_000);
        state.accrued_yield = Money::from_units(accrued);
        state.stream_yield = Money::from_units(stream);
        state
    }

    #[test]
    fn test_minimum_checked_before_rounding() {
        let config = EngineConfig::standard();

        assert_eq!(
            validate_claim_amount(Money::from_units(500_000), &config),
            Err(YieldError::ClaimBelowMinimum {
                minimum: Money::from_units(1_000_000),
                requested: Money::from_units(500_000),
            })
        );
        // below minimum and off-grid reports the minimum
        assert!(matches!(
            validate_claim_amount(Money::from_units(500_001), &config),
            Err(YieldError::ClaimBelowMinimum { .. })
        ));
        assert_eq!(
            validate_claim_amount(Money::from_units(1_000_001), &config),
            Err(YieldError::ClaimNotRounded {
                amount: Money::from_units(1_000_001),
                round_factor: Money::from_units(10_000),
            })
        );
        assert!(validate_claim_amount(Money::from_units(1_010_000), &config).is_ok());
    }

    #[test]
    fn test_insufficient_yield() {
        let before = state(60_000, 30_000);
        let err = settle_claim(&before, Money::from_units(100_000), &EngineConfig::standard())
            .unwrap_err();
        assert_eq!(err, YieldError::InsufficientYieldBalance {
            available: Money::from_units(90_000),
            requested: Money::from_units(100_000),
        });
    }

    #[test]
    fn test_draws_settled_before_stream() {
        let before = state(1_500_000, 800_000);
        let settlement = settle_claim(&before, Money::from_units(2_000_000), &EngineConfig::standard())
            .unwrap();

        assert_eq!(settlement.from_accrued, Money::from_units(1_500_000));
        assert_eq!(settlement.from_stream, Money::from_units(500_000));
        assert_eq!(settlement.state_after.accrued_yield, Money::ZERO);
        assert_eq!(settlement.state_after.stream_yield, Money::from_units(300_000));
        assert_eq!(settlement.net_amount, Money::from_units(2_000_000));
        assert_eq!(settlement.state_after.last_update_timestamp, before.last_update_timestamp);
    }

    #[test]
    fn test_claim_within_settled_leaves_stream() {
        let before = state(3_000_000, 800_000);
        let settlement = settle_claim(&before, Money::from_units(1_000_000), &EngineConfig::standard())
            .unwrap();
        assert_eq!(settlement.from_stream, Money::ZERO);
        assert_eq!(settlement.state_after.accrued_yield, Money::from_units(2_000_000));
        assert_eq!(settlement.state_after.stream_yield, Money::from_units(800_000));
    }

    #[test]
    fn test_fee_rounds_up_to_round_factor() {
        let treasury = Uuid::new_v4();
        // 0.3% of 1_020_000 is 3_060, one grid step
        let config = EngineConfig::with_fee(Rate::from_bps(30), treasury);
        let settlement = settle_claim(&state(2_000_000, 0), Money::from_units(1_020_000), &config)
            .unwrap();
        assert_eq!(settlement.fee, Money::from_units(10_000));
        assert_eq!(settlement.net_amount, Money::from_units(1_010_000));
        assert_eq!(settlement.fee_destination, Some(treasury));

        // 1% of 1_000_000 sits exactly on the grid, 1% of 1_010_000 does not
        let config = EngineConfig::with_fee(Rate::from_percentage(1), treasury);
        assert_eq!(claim_fee(Money::from_units(1_000_000), &config).unwrap(), Money::from_units(10_000));
        assert_eq!(claim_fee(Money::from_units(1_010_000), &config).unwrap(), Money::from_units(20_000));
    }

    #[test]
    fn test_fee_capped_at_amount() {
        let config = EngineConfig::with_fee(Rate::from_bps(50), Uuid::new_v4());
        assert_eq!(claim_fee(Money::from_units(5_000), &config).unwrap(), Money::from_units(5_000));
        let settlement = settle_claim(&state(5_000, 0), Money::from_units(5_000), &config).unwrap();
        assert_eq!(settlement.net_amount, Money::ZERO);
    }

    proptest! {
        #[test]
        fn fee_and_net_stay_on_grid(steps in 100u128..100_000, bps in 1u32..=10_000) {
            let config = EngineConfig::with_fee(Rate::from_bps(bps), Uuid::new_v4());
            let amount = Money::from_units(steps * config.round_factor.units());
            prop_assert!(validate_claim_amount(amount, &config).is_ok());

            let settlement = settle_claim(&state(amount.units(), 0), amount, &config).unwrap();
            prop_assert!(settlement.fee.units() % config.round_factor.units() == 0);
            prop_assert!(settlement.net_amount.units() % config.round_factor.units() == 0);
            prop_assert_eq!(settlement.fee + settlement.net_amount, amount);
        }
    }

    #[test]
    fn test_fee_without_destination_rejected() {
        let mut config = EngineConfig::standard();
        config.fee_rate = Rate::from_bps(10);
        assert_eq!(
            settle_claim(&state(2_000_000, 0), Money::from_units(1_000_000), &config),
            Err(YieldError::FeeDestinationMissing)
        );
    }
}
