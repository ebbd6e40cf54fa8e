pub mod resolver;
pub mod store;

pub use resolver::resolve_rate_range;
pub use store::{InMemoryScheduleStore, ScheduleStore, DEFAULT_GROUP};
