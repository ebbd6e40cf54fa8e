pub mod settlement;

use serde::{Deserialize, Serialize};

use crate::accrual::AccruePreview;
use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::types::{AccountId, Timestamp};

pub use settlement::{claim_fee, settle_claim, validate_claim_amount, ClaimSettlement};

/// what claiming everything claimable at a point in time would look like
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPreview {
    pub accrual: AccruePreview,
    /// total yield rounded down to the claim grid
    pub claimable: Money,
    pub meets_minimum: bool,
    pub fee: Money,
    pub net_amount: Money,
    pub settled_after_claim: Money,
    pub live_after_claim: Money,
}

impl ClaimPreview {
    /// build from an accrual projection
    pub fn from_accrual(accrual: AccruePreview, config: &EngineConfig) -> Result<Self> {
        let projected = accrual.state_after();
        let claimable = projected.total_yield().round_down(config.round_factor);
        let settlement = settle_claim(&projected, claimable, config)?;

        Ok(Self {
            accrual,
            claimable,
            meets_minimum: claimable >= config.min_claim_amount,
            fee: settlement.fee,
            net_amount: settlement.net_amount,
            settled_after_claim: settlement.state_after.accrued_yield,
            live_after_claim: settlement.state_after.stream_yield,
        })
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// record of a completed claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub account: AccountId,
    pub amount: Money,
    pub fee: Money,
    pub net_amount: Money,
    pub from_accrued: Money,
    pub from_stream: Money,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accrual::preview;
    use crate::decimal::{Rate, SECONDS_PER_DAY};
    use crate::state::YieldState;
    use crate::types::{RateTier, YieldRate};
    use uuid::Uuid;

    const DAY: u64 = SECONDS_PER_DAY;

    fn rates() -> Vec<YieldRate> {
        vec![YieldRate::new(0, vec![RateTier::unbounded(Rate::from_percentage(1))])]
    }

    #[test]
    fn test_preview_rounds_claimable_down() {
        // 2 days at 1% on 100_000_000 settle 2_010_000; half a day more is live
        let state = YieldState::new(Money::from_units(100_000_000), 10 * DAY);
        let accrual = preview(&state, &rates(), 12 * DAY + DAY / 2).unwrap();
        assert_eq!(accrual.settled_after, Money::from_units(2_010_000));
        // 102_010_000 * 1% / 2
        assert_eq!(accrual.live_after, Money::from_units(510_050));

        let claim = ClaimPreview::from_accrual(accrual, &EngineConfig::standard()).unwrap();
        assert_eq!(claim.claimable, Money::from_units(2_520_000));
        assert!(claim.meets_minimum);
        assert_eq!(claim.net_amount, claim.claimable);
        assert_eq!(claim.settled_after_claim, Money::ZERO);
        assert_eq!(claim.live_after_claim, Money::from_units(50));
    }

    #[test]
    fn test_preview_below_minimum() {
        let state = YieldState::new(Money::from_units(500_000), 0);
        let accrual = preview(&state, &rates(), DAY).unwrap();
        let claim = ClaimPreview::from_accrual(accrual, &EngineConfig::standard()).unwrap();

        // 5_000 earned, under one rounding step
        assert_eq!(claim.claimable, Money::ZERO);
        assert!(!claim.meets_minimum);
        assert_eq!(claim.settled_after_claim, Money::from_units(5_000));
    }

    #[test]
    fn test_preview_reports_fee() {
        let state = YieldState::new(Money::from_units(100_000_000), 0);
        let accrual = preview(&state, &rates(), 2 * DAY).unwrap();
        let config = EngineConfig::with_fee(Rate::from_percentage(1), Uuid::new_v4());
        let claim = ClaimPreview::from_accrual(accrual, &config).unwrap();

        assert_eq!(claim.claimable, Money::from_units(2_010_000));
        // 20_100 rounded up to the claim grid
        assert_eq!(claim.fee, Money::from_units(30_000));
        assert_eq!(claim.net_amount, Money::from_units(1_980_000));
        assert!(claim.to_json_pretty().unwrap().contains("\"claimable\""));
    }
}
