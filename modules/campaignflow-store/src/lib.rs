pub mod kv;
pub mod repository;
pub mod resolver;

pub use kv::{KvStore, MemoryKv, PgKv};
pub use repository::CampaignRepository;
