//! Analysis modules.
//!
//! The aggregator holds the core engagement rollups; dashboard builds chart
//! and KPI records on top of it; validation reports broken records.

pub mod aggregator;
pub mod dashboard;
pub mod validation;

pub use aggregator::*;
pub use dashboard::*;
pub use validation::*;
