pub mod cache;

pub use cache::{MarketCache, MarketMetadata, Outcome};
