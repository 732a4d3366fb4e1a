pub mod classify;
pub mod cli;
pub mod crawl;
pub mod error;
pub mod model;
pub mod render;
pub mod store;

pub use cli::{Cli, Commands};
pub use error::StoreError;
pub use model::{GameType, Jam, JamDraft, Owner};
pub use store::{JamStore, SearchFilter};
