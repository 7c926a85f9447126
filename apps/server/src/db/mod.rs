//! Database layer - storage backends for the directory

pub mod memory;
pub mod metrics;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryProfileStore;
pub use metrics::MetricsRepository;
pub use postgres::PostgresProfileStore;
pub use traits::{CountryCount, NewUser, PositionCount, ProfileStore};
