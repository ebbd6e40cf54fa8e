use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate, RATE_FACTOR};
use crate::errors::{Result, YieldError};
use crate::types::AccountId;

/// claim and settlement configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// smallest claim accepted
    pub min_claim_amount: Money,
    /// claims must be exact multiples of this
    pub round_factor: Money,
    /// share of each claim withheld as a fee, zero for none
    #[serde(default)]
    pub fee_rate: Rate,
    /// receives the fee; required whenever `fee_rate` is non-zero
    #[serde(default)]
    pub fee_destination: Option<AccountId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl EngineConfig {
    /// 1.0 minimum claim and 0.01 rounding for a 6-decimal token, no fee
    pub fn standard() -> Self {
        Self {
            min_claim_amount: Money::from_units(1_000_000),
            round_factor: Money::from_units(10_000),
            fee_rate: Rate::ZERO,
            fee_destination: None,
        }
    }

    /// standard limits with a claim fee paid to `destination`
    pub fn with_fee(fee_rate: Rate, destination: AccountId) -> Self {
        Self {
            fee_rate,
            fee_destination: Some(destination),
            ..Self::standard()
        }
    }

    /// load and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| YieldError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn has_fee(&self) -> bool {
        !self.fee_rate.is_zero()
    }

    pub fn validate(&self) -> Result<()> {
        if self.round_factor.is_zero() {
            return Err(YieldError::InvalidConfiguration {
                message: "round factor must be non-zero".to_string(),
            });
        }
        if !self.min_claim_amount.is_multiple_of(self.round_factor) {
            return Err(YieldError::InvalidConfiguration {
                message: format!(
                    "minimum claim {} is not a multiple of round factor {}",
                    self.min_claim_amount, self.round_factor
                ),
            });
        }
        if self.fee_rate.raw() > RATE_FACTOR {
            return Err(YieldError::InvalidConfiguration {
                message: format!("fee rate {} exceeds 100%", self.fee_rate),
            });
        }
        Ok(())
    }
}
