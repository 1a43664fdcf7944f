use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Snapshot of command-line arguments taken at process start
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Startup timestamp, used for uptime reporting on shutdown
pub static STARTUP_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Check whether a flag was passed on the command line
pub fn has_flag(flag: &str) -> bool {
    if let Ok(args) = CMD_ARGS.lock() {
        args.iter().any(|a| a == flag)
    } else {
        false
    }
}
