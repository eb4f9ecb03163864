//! Day-bucketed activity and weight statistics for pets.

pub mod config;
pub mod db;
pub mod energy;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod series;
pub mod session;
pub mod store;
pub mod window;

pub use error::{StatsError, StatsResult};
pub use models::{ActivitySeries, WeightSeries, Window};
pub use series::{build_activity_series, build_weight_series, WeightPolicy};
pub use store::MetricStore;
pub use window::resolve_window;
