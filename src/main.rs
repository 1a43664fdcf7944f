use attachmentbot::{
    arguments::{is_help_requested, is_no_warm_enabled, print_help},
    cache::{CacheService, SubmissionCache},
    core::config::read_configs,
    database::Database,
    global::STARTUP_TIME,
    logger::{self, LogTag},
};
use chrono::Utc;

/// Main entry point for the attachment bot cache core
///
/// Startup order matters:
/// 1. Load configs.json (missing file means defaults)
/// 2. Open the database and ensure the schema exists
/// 3. Build the cache stores and start their sweep loops
/// 4. Warm the smart store and prime the submission stats
///
/// Runs until Ctrl+C, then logs final cache statistics.
#[tokio::main]
async fn main() {
    // Check for help request first (before any other processing)
    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    // Touch the startup timestamp so uptime counts from here
    let _ = *STARTUP_TIME;
    logger::info(LogTag::System, "🚀 Attachment bot starting up...");

    let configs = match read_configs("configs.json") {
        Ok(configs) => configs,
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ Failed to load configs: {}", e));
            std::process::exit(1);
        }
    };

    let db = match Database::open(&configs.database_path) {
        Ok(db) => db,
        Err(e) => {
            logger::error(LogTag::System, &format!("❌ Failed to open database: {}", e));
            std::process::exit(1);
        }
    };
    if let Err(e) = db.init_schema() {
        logger::error(LogTag::System, &format!("❌ Failed to initialize schema: {}", e));
        std::process::exit(1);
    }
    logger::info(
        LogTag::System,
        &format!("Database ready at {}", configs.database_path),
    );

    let cache = CacheService::new(&configs.cache);
    let background_tasks = cache.spawn_background_tasks();

    let submissions = SubmissionCache::from_settings(db.clone(), &configs.cache);

    if configs.cache.warm_on_startup && !is_no_warm_enabled() {
        cache.smart().warm_cache(&db);
    } else {
        logger::info(LogTag::SmartCache, "Cache warming skipped");
    }

    // Prime the stats aggregate so the first user request is warm
    if submissions.get_stats(false).is_some() {
        logger::info(LogTag::Submissions, "Submission stats primed");
    }

    logger::info(LogTag::System, "✅ Startup complete, press Ctrl+C to stop");

    let (shutdown_tx, shutdown_rx) = std::sync::mpsc::channel::<()>();
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    }) {
        logger::error(LogTag::System, &format!("❌ Failed to set Ctrl+C handler: {}", e));
        std::process::exit(1);
    }
    let _ = tokio::task::spawn_blocking(move || shutdown_rx.recv()).await;

    logger::info(LogTag::System, "🛑 Shutting down...");
    for task in background_tasks {
        task.abort();
    }

    let basic_stats = cache.basic().stats();
    let smart_stats = cache.smart().stats();
    logger::info(
        LogTag::Cache,
        &format!(
            "Final stats: {} entries, {:.1}% hit rate",
            basic_stats.entries, basic_stats.hit_rate
        ),
    );
    logger::info(
        LogTag::SmartCache,
        &format!(
            "Final stats: {} entries, {:.1}% hit rate, {} evictions",
            smart_stats.entries, smart_stats.hit_rate, smart_stats.evictions
        ),
    );

    let uptime = Utc::now().signed_duration_since(*STARTUP_TIME);
    logger::info(
        LogTag::System,
        &format!("✅ Stopped after {}s uptime", uptime.num_seconds()),
    );
}
