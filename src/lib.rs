pub mod accrual;
pub mod claims;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod events;
pub mod interest;
pub mod ledger;
pub mod migration;
pub mod schedule;
pub mod state;
pub mod types;

// re-export key types
pub use accrual::{preview, AccruePreview};
pub use claims::{
    claim_fee, settle_claim, validate_claim_amount, ClaimPreview, ClaimReceipt, ClaimSettlement,
};
pub use config::EngineConfig;
pub use decimal::{Money, Rate, RATE_FACTOR, SECONDS_PER_DAY};
pub use engine::{Clock, YieldEngine};
pub use errors::{Result, YieldError};
pub use events::{Event, EventStore};
pub use interest::{
    aggregate_yield, calculate_tiered_interest, compound_daily, split_and_compound,
    AggregatedYield, TieredInterest,
};
pub use ledger::{InMemoryLedger, TokenLedger, Transfer};
pub use migration::{LegacyError, LegacyPosition, LegacySource, MigrationReport};
pub use schedule::{resolve_rate_range, InMemoryScheduleStore, ScheduleStore, DEFAULT_GROUP};
pub use state::{AccountStatus, YieldState};
pub use types::{AccountId, GroupId, RateTier, Timestamp, YieldRate, YieldResult};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
