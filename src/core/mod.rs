pub mod config;
pub mod constants;
pub mod error;

pub use config::{read_configs, CacheSettings, Configs};
pub use error::{BotError, BotResult};
