pub mod migrate;
pub mod repo;
pub mod schema;

pub use migrate::migrate_legacy;
pub use repo::{JamStore, SearchFilter};
pub use schema::initialize;
