use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod stamp;
pub mod types;
pub use stamp::FileStampStore;
pub use types::*;

/// Where the time of the last successful run is kept between invocations.
#[async_trait]
pub trait StampStore: Send + Sync {
    async fn load(&self) -> PersistResult<Option<DateTime<Utc>>>;
    async fn save(&self, at: DateTime<Utc>) -> PersistResult<()>;
}
