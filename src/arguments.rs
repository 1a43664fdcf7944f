use crate::global::has_flag;

/// Check if debug logging for the cache stores is enabled
pub fn is_debug_cache_enabled() -> bool {
    has_flag("--debug-cache")
}

/// Check if debug logging for database access is enabled
pub fn is_debug_database_enabled() -> bool {
    has_flag("--debug-database")
}

/// Check if cache warming should be skipped at startup
pub fn is_no_warm_enabled() -> bool {
    has_flag("--no-warm")
}

pub fn is_help_requested() -> bool {
    has_flag("--help") || has_flag("-h")
}

pub fn print_help() {
    println!("attachmentbot - CODM attachment bot cache core");
    println!();
    println!("USAGE:");
    println!("    attachmentbot [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --no-warm           Skip cache warming at startup");
    println!("    --debug-cache       Show debug logs for cache stores");
    println!("    --debug-database    Show debug logs for database access");
    println!("    -h, --help          Print this help message");
}
