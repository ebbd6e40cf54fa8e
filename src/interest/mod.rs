//! Yield computation core.
//!
//! Everything here is a pure function of its inputs: a tier list or schedule
//! slice, a time window, and a starting balance. Nothing reads a clock or
//! touches account state.

pub mod aggregate;
pub mod compound;
pub mod splitter;
pub mod tiered;

pub use aggregate::{aggregate_yield, AggregatedYield};
pub use compound::compound_daily;
pub use splitter::split_and_compound;
pub use tiered::{calculate_tiered_interest, TieredInterest};
