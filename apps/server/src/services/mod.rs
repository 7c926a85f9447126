//! Business logic layer

pub mod directory;
pub mod metrics;
pub mod stats;

pub use directory::{DirectoryService, ProfileDetail, ProfileSummary, SearchPage};
pub use metrics::MetricsService;
pub use stats::{PositionStat, StatsService};
