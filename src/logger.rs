//! Tagged console logging.
//!
//! Levels: Error / Warning / Info / Debug. Debug messages are only shown
//! when the matching --debug-<module> flag was passed on the command line.

use crate::arguments::{is_debug_cache_enabled, is_debug_database_enabled};
use chrono::Utc;
use colored::*;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Cache,
    SmartCache,
    Submissions,
    Database,
}

impl LogTag {
    fn label(&self) -> &'static str {
        match self {
            LogTag::System => "SYSTEM",
            LogTag::Cache => "CACHE",
            LogTag::SmartCache => "SMART-CACHE",
            LogTag::Submissions => "SUBMISSIONS",
            LogTag::Database => "DATABASE",
        }
    }

    fn debug_enabled(&self) -> bool {
        match self {
            LogTag::Database => is_debug_database_enabled(),
            _ => is_debug_cache_enabled(),
        }
    }
}

pub fn error(tag: LogTag, message: &str) {
    emit("❌", tag, message, |s| s.red().to_string());
}

pub fn warning(tag: LogTag, message: &str) {
    emit("⚠️", tag, message, |s| s.yellow().to_string());
}

pub fn info(tag: LogTag, message: &str) {
    emit("ℹ️", tag, message, |s| s.to_string());
}

/// Gated by --debug-cache / --debug-database
pub fn debug(tag: LogTag, message: &str) {
    if !tag.debug_enabled() {
        return;
    }
    emit("🐛", tag, message, |s| s.dimmed().to_string());
}

fn emit(icon: &str, tag: LogTag, message: &str, paint: fn(&str) -> String) {
    let timestamp = Utc::now().format("%H:%M:%S");
    println!(
        "{} {} {} {}",
        icon,
        tag.label().bold(),
        format!("[{}]", timestamp).dimmed(),
        paint(message)
    );
    let _ = io::stdout().flush();
}
