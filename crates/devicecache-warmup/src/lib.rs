//! devicecache-warmup: batch pre-population of the device cache
//!
//! Mines a line-oriented traffic log for the most frequently seen user
//! agents and writes classifications for the ones that deserve a slot,
//! then trims the store back to its configured capacity. Typically run as
//! a scheduled job before live traffic needs the cache.

mod frequency;
mod pipeline;
mod types;

pub use frequency::FrequencyTable;
pub use pipeline::WarmupPipeline;
pub use types::WarmupReport;
