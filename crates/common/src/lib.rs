pub mod config;
pub mod error;
pub mod exchange;
pub mod feed;
pub mod types;

pub use config::{Config, RunMode};
pub use error::{Error, Result};
pub use exchange::ExecutionClient;
pub use feed::MarketDataFeed;
pub use types::*;
