pub mod arguments;
pub mod cache;
pub mod core;
pub mod database;
pub mod global;
pub mod logger;
