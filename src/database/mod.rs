//! SQLite backing store for the attachment bot.
//!
//! Holds the primary tables (users, user_attachments, reports, curated
//! weapons/attachments) and the persisted cache side tables the
//! submission cache writes through to.

use crate::core::error::BotResult;
use crate::logger::{self, LogTag};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub mod models;

pub use models::{AttachmentLoadout, SubmissionStats, TopUser, TopWeapon, UserRecord};

/// Shared database handle guarding one SQLite connection
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// Configure a file-backed connection for concurrent access
fn configure_connection(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "memory")?;
    conn.busy_timeout(std::time::Duration::from_millis(30_000))?;
    Ok(())
}

impl Database {
    /// Open (or create) the database file
    pub fn open<P: AsRef<Path>>(path: P) -> BotResult<Self> {
        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> BotResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.busy_timeout(std::time::Duration::from_millis(30_000))?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// Create all tables and indexes if they don't exist
    pub fn init_schema(&self) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                category TEXT,
                custom_weapon_name TEXT,
                mode TEXT NOT NULL DEFAULT 'mp',
                status TEXT NOT NULL DEFAULT 'pending',
                like_count INTEGER NOT NULL DEFAULT 0,
                report_count INTEGER NOT NULL DEFAULT 0,
                submitted_at TEXT NOT NULL DEFAULT (datetime('now')),
                approved_at TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_submission_stats (
                user_id INTEGER PRIMARY KEY,
                submission_count INTEGER NOT NULL DEFAULT 0,
                is_banned INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS attachment_reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                attachment_id INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        // Curated content browsed through the bot menus
        conn.execute(
            "CREATE TABLE IF NOT EXISTS weapons (
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (category, name)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                weapon_name TEXT NOT NULL,
                mode TEXT NOT NULL,
                name TEXT NOT NULL,
                like_count INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        // Persisted cache tier
        conn.execute(
            "CREATE TABLE IF NOT EXISTS att_stats_cache (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                total_attachments INTEGER NOT NULL,
                pending_count INTEGER NOT NULL,
                approved_count INTEGER NOT NULL,
                rejected_count INTEGER NOT NULL,
                br_count INTEGER NOT NULL,
                mp_count INTEGER NOT NULL,
                total_users INTEGER NOT NULL,
                active_users INTEGER NOT NULL,
                banned_users INTEGER NOT NULL,
                total_likes INTEGER NOT NULL,
                total_reports INTEGER NOT NULL,
                pending_reports INTEGER NOT NULL,
                last_week_submissions INTEGER NOT NULL,
                last_week_approvals INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS att_top_weapons_cache (
                weapon_name TEXT NOT NULL,
                attachment_count INTEGER NOT NULL,
                mode TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS att_top_users_cache (
                user_id INTEGER NOT NULL,
                username TEXT,
                approved_count INTEGER NOT NULL,
                total_likes INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_user_attachments_status
             ON user_attachments(status)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_user_attachments_user
             ON user_attachments(user_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_attachments_weapon
             ON attachments(category, weapon_name, mode)",
            [],
        )?;

        logger::debug(LogTag::Database, "Schema initialized");
        Ok(())
    }

    // =========================================================================
    // CURATED CONTENT (read paths memoized by the smart cache)
    // =========================================================================

    pub fn get_weapons_in_category(&self, category: &str) -> BotResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT name FROM weapons WHERE category = ?1 ORDER BY display_order, name",
        )?;
        let rows = stmt.query_map(params![category], |row| row.get::<_, String>(0))?;

        let mut weapons = Vec::new();
        for row in rows {
            weapons.push(row?);
        }
        Ok(weapons)
    }

    pub fn get_top_attachments(
        &self,
        category: &str,
        weapon: &str,
        mode: &str,
    ) -> BotResult<Vec<AttachmentLoadout>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, name, like_count FROM attachments
             WHERE category = ?1 AND weapon_name = ?2 AND mode = ?3
             ORDER BY like_count DESC
             LIMIT 10",
        )?;
        let rows = stmt.query_map(params![category, weapon, mode], |row| {
            Ok(AttachmentLoadout {
                id: row.get(0)?,
                name: row.get(1)?,
                like_count: row.get(2)?,
            })
        })?;

        let mut attachments = Vec::new();
        for row in rows {
            attachments.push(row?);
        }
        Ok(attachments)
    }

    pub fn add_weapon(&self, category: &str, name: &str, display_order: i64) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO weapons (category, name, display_order) VALUES (?1, ?2, ?3)",
            params![category, name, display_order],
        )?;
        Ok(())
    }

    pub fn add_curated_attachment(
        &self,
        category: &str,
        weapon: &str,
        mode: &str,
        name: &str,
        like_count: i64,
    ) -> BotResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO attachments (category, weapon_name, mode, name, like_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![category, weapon, mode, name, like_count],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // =========================================================================
    // USER SUBMISSIONS (write paths that trigger cache invalidation)
    // =========================================================================

    pub fn add_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: Option<&str>,
    ) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO users (user_id, username, first_name) VALUES (?1, ?2, ?3)",
            params![user_id, username, first_name],
        )?;
        Ok(())
    }

    pub fn submit_attachment(
        &self,
        user_id: i64,
        category: &str,
        weapon: &str,
        mode: &str,
    ) -> BotResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_attachments (user_id, category, custom_weapon_name, mode)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, category, weapon, mode],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Returns true when a pending submission was actually approved
    pub fn approve_attachment(&self, attachment_id: i64) -> BotResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE user_attachments
             SET status = 'approved', approved_at = datetime('now')
             WHERE id = ?1 AND status = 'pending'",
            params![attachment_id],
        )?;
        Ok(changed > 0)
    }

    pub fn reject_attachment(&self, attachment_id: i64) -> BotResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE user_attachments
             SET status = 'rejected'
             WHERE id = ?1 AND status = 'pending'",
            params![attachment_id],
        )?;
        Ok(changed > 0)
    }

    pub fn ban_user(&self, user_id: i64) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user_submission_stats (user_id, is_banned) VALUES (?1, 1)
             ON CONFLICT (user_id) DO UPDATE SET
                is_banned = 1,
                updated_at = datetime('now')",
            params![user_id],
        )?;
        Ok(())
    }

    pub fn report_attachment(&self, attachment_id: i64) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO attachment_reports (attachment_id) VALUES (?1)",
            params![attachment_id],
        )?;
        conn.execute(
            "UPDATE user_attachments SET report_count = report_count + 1 WHERE id = ?1",
            params![attachment_id],
        )?;
        Ok(())
    }

    // =========================================================================
    // LIVE AGGREGATIONS (the expensive queries the submission cache avoids)
    // =========================================================================

    pub fn compute_submission_stats(&self) -> BotResult<Option<SubmissionStats>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "WITH stats AS (
                    SELECT
                        COUNT(*) AS total_attachments,
                        COUNT(CASE WHEN status = 'pending' THEN 1 END) AS pending_count,
                        COUNT(CASE WHEN status = 'approved' THEN 1 END) AS approved_count,
                        COUNT(CASE WHEN status = 'rejected' THEN 1 END) AS rejected_count,
                        COUNT(CASE WHEN mode = 'br' AND status = 'approved' THEN 1 END) AS br_count,
                        COUNT(CASE WHEN mode = 'mp' AND status = 'approved' THEN 1 END) AS mp_count,
                        COUNT(DISTINCT user_id) AS total_users,
                        COALESCE(SUM(like_count), 0) AS total_likes,
                        COALESCE(SUM(report_count), 0) AS total_reports,
                        COUNT(CASE WHEN submitted_at >= datetime('now', '-7 days') THEN 1 END)
                            AS last_week_submissions,
                        COUNT(CASE WHEN approved_at >= datetime('now', '-7 days')
                                    AND status = 'approved' THEN 1 END)
                            AS last_week_approvals
                    FROM user_attachments
                ),
                banned AS (
                    SELECT COUNT(*) AS banned_users
                    FROM user_submission_stats
                    WHERE is_banned = 1
                ),
                reports AS (
                    SELECT COUNT(*) AS pending_reports
                    FROM attachment_reports
                    WHERE status = 'pending'
                )
                SELECT
                    s.total_attachments, s.pending_count, s.approved_count, s.rejected_count,
                    s.br_count, s.mp_count, s.total_users, s.total_likes, s.total_reports,
                    s.last_week_submissions, s.last_week_approvals,
                    b.banned_users, r.pending_reports,
                    s.total_users - b.banned_users AS active_users
                FROM stats s, banned b, reports r",
                [],
                |row| {
                    Ok(SubmissionStats {
                        total_attachments: row.get("total_attachments")?,
                        pending_count: row.get("pending_count")?,
                        approved_count: row.get("approved_count")?,
                        rejected_count: row.get("rejected_count")?,
                        br_count: row.get("br_count")?,
                        mp_count: row.get("mp_count")?,
                        total_users: row.get("total_users")?,
                        total_likes: row.get("total_likes")?,
                        total_reports: row.get("total_reports")?,
                        last_week_submissions: row.get("last_week_submissions")?,
                        last_week_approvals: row.get("last_week_approvals")?,
                        banned_users: row.get("banned_users")?,
                        pending_reports: row.get("pending_reports")?,
                        active_users: row.get("active_users")?,
                        updated_at: String::new(),
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn compute_top_weapons(&self, limit: i64) -> BotResult<Vec<TopWeapon>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT
                COALESCE(custom_weapon_name, 'Unknown') AS weapon_name,
                COUNT(*) AS attachment_count,
                mode
             FROM user_attachments
             WHERE status = 'approved'
               AND custom_weapon_name IS NOT NULL
             GROUP BY custom_weapon_name, mode
             ORDER BY attachment_count DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(TopWeapon {
                weapon_name: row.get(0)?,
                attachment_count: row.get(1)?,
                mode: row.get(2)?,
            })
        })?;

        let mut weapons = Vec::new();
        for row in rows {
            weapons.push(row?);
        }
        Ok(weapons)
    }

    pub fn compute_top_users(&self, limit: i64) -> BotResult<Vec<TopUser>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT
                ua.user_id,
                u.username,
                COUNT(*) AS approved_count,
                COALESCE(SUM(ua.like_count), 0) AS total_likes
             FROM user_attachments ua
             LEFT JOIN users u ON ua.user_id = u.user_id
             WHERE ua.status = 'approved'
             GROUP BY ua.user_id, u.username
             ORDER BY approved_count DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], |row| {
            Ok(TopUser {
                user_id: row.get(0)?,
                username: row.get(1)?,
                approved_count: row.get(2)?,
                total_likes: row.get(3)?,
            })
        })?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    pub fn count_by_status(&self, status: &str) -> BotResult<i64> {
        let conn = self.conn.lock().unwrap();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM user_attachments WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Single-query lookup for a set of users, avoiding one query per id
    pub fn fetch_users_by_ids(&self, user_ids: &[i64]) -> BotResult<HashMap<i64, UserRecord>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; user_ids.len()].join(",");
        let query = format!(
            "SELECT user_id, username, first_name FROM users WHERE user_id IN ({})",
            placeholders
        );
        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(user_ids.iter()), |row| {
            Ok(UserRecord {
                user_id: row.get(0)?,
                username: row.get(1)?,
                first_name: row.get(2)?,
            })
        })?;

        let mut users = HashMap::new();
        for row in rows {
            let record = row?;
            users.insert(record.user_id, record);
        }
        Ok(users)
    }

    // =========================================================================
    // PERSISTED CACHE TIER
    // =========================================================================

    /// Read the persisted stats row, constrained to rows fresher than
    /// `window_secs`. Falls back to an unconstrained read when the
    /// freshness column is unusable (older schema variants).
    pub fn read_stats_row(&self, window_secs: i64) -> BotResult<Option<SubmissionStats>> {
        let conn = self.conn.lock().unwrap();
        let modifier = format!("-{} seconds", window_secs);

        let constrained = conn
            .query_row(
                "SELECT * FROM att_stats_cache
                 WHERE id = 1 AND updated_at > datetime('now', ?1)",
                params![modifier],
                stats_row_mapper,
            )
            .optional();

        match constrained {
            Ok(row) => Ok(row),
            Err(e) => {
                logger::debug(
                    LogTag::Database,
                    &format!("Stats cache freshness column unusable, reading unconstrained: {}", e),
                );
                let row = conn
                    .query_row(
                        "SELECT * FROM att_stats_cache WHERE id = 1",
                        [],
                        stats_row_mapper,
                    )
                    .optional()?;
                Ok(row)
            }
        }
    }

    pub fn upsert_stats_row(&self, stats: &SubmissionStats) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO att_stats_cache (
                id, total_attachments, pending_count, approved_count, rejected_count,
                br_count, mp_count, total_users, active_users, banned_users,
                total_likes, total_reports, pending_reports,
                last_week_submissions, last_week_approvals, updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, datetime('now'))
            ON CONFLICT (id) DO UPDATE SET
                total_attachments = excluded.total_attachments,
                pending_count = excluded.pending_count,
                approved_count = excluded.approved_count,
                rejected_count = excluded.rejected_count,
                br_count = excluded.br_count,
                mp_count = excluded.mp_count,
                total_users = excluded.total_users,
                active_users = excluded.active_users,
                banned_users = excluded.banned_users,
                total_likes = excluded.total_likes,
                total_reports = excluded.total_reports,
                pending_reports = excluded.pending_reports,
                last_week_submissions = excluded.last_week_submissions,
                last_week_approvals = excluded.last_week_approvals,
                updated_at = datetime('now')",
            params![
                stats.total_attachments,
                stats.pending_count,
                stats.approved_count,
                stats.rejected_count,
                stats.br_count,
                stats.mp_count,
                stats.total_users,
                stats.active_users,
                stats.banned_users,
                stats.total_likes,
                stats.total_reports,
                stats.pending_reports,
                stats.last_week_submissions,
                stats.last_week_approvals,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Push the persisted stats row's freshness back so the next read
    /// recomputes, without deleting the row
    pub fn age_stats_row(&self, secs: i64) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        let modifier = format!("-{} seconds", secs);
        conn.execute(
            "UPDATE att_stats_cache SET updated_at = datetime('now', ?1) WHERE id = 1",
            params![modifier],
        )?;
        Ok(())
    }

    pub fn read_top_weapons(&self, limit: i64, window_secs: i64) -> BotResult<Vec<TopWeapon>> {
        let conn = self.conn.lock().unwrap();
        let modifier = format!("-{} seconds", window_secs);

        let mapper = |row: &rusqlite::Row<'_>| {
            Ok(TopWeapon {
                weapon_name: row.get(0)?,
                attachment_count: row.get(1)?,
                mode: row.get(2)?,
            })
        };

        let mut stmt = conn.prepare(
            "SELECT weapon_name, attachment_count, mode
             FROM att_top_weapons_cache
             WHERE updated_at > datetime('now', ?1)
             ORDER BY attachment_count DESC
             LIMIT ?2",
        )?;
        let constrained: Result<Vec<TopWeapon>, rusqlite::Error> = stmt
            .query_map(params![modifier, limit], mapper)
            .and_then(|rows| rows.collect());

        match constrained {
            Ok(weapons) => Ok(weapons),
            Err(e) => {
                logger::debug(
                    LogTag::Database,
                    &format!("Top weapons cache freshness column unusable: {}", e),
                );
                let mut stmt = conn.prepare(
                    "SELECT weapon_name, attachment_count, mode
                     FROM att_top_weapons_cache
                     ORDER BY attachment_count DESC
                     LIMIT ?1",
                )?;
                let weapons = stmt
                    .query_map(params![limit], mapper)
                    .and_then(|rows| rows.collect())?;
                Ok(weapons)
            }
        }
    }

    pub fn replace_top_weapons(&self, weapons: &[TopWeapon]) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM att_top_weapons_cache", [])?;
        for weapon in weapons {
            tx.execute(
                "INSERT INTO att_top_weapons_cache (weapon_name, attachment_count, mode, updated_at)
                 VALUES (?1, ?2, ?3, datetime('now'))",
                params![weapon.weapon_name, weapon.attachment_count, weapon.mode],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn read_top_users(&self, limit: i64, window_secs: i64) -> BotResult<Vec<TopUser>> {
        let conn = self.conn.lock().unwrap();
        let modifier = format!("-{} seconds", window_secs);

        let mapper = |row: &rusqlite::Row<'_>| {
            Ok(TopUser {
                user_id: row.get(0)?,
                username: row.get(1)?,
                approved_count: row.get(2)?,
                total_likes: row.get(3)?,
            })
        };

        let mut stmt = conn.prepare(
            "SELECT user_id, username, approved_count, total_likes
             FROM att_top_users_cache
             WHERE updated_at > datetime('now', ?1)
             ORDER BY approved_count DESC
             LIMIT ?2",
        )?;
        let constrained: Result<Vec<TopUser>, rusqlite::Error> = stmt
            .query_map(params![modifier, limit], mapper)
            .and_then(|rows| rows.collect());

        match constrained {
            Ok(users) => Ok(users),
            Err(e) => {
                logger::debug(
                    LogTag::Database,
                    &format!("Top users cache freshness column unusable: {}", e),
                );
                let mut stmt = conn.prepare(
                    "SELECT user_id, username, approved_count, total_likes
                     FROM att_top_users_cache
                     ORDER BY approved_count DESC
                     LIMIT ?1",
                )?;
                let users = stmt
                    .query_map(params![limit], mapper)
                    .and_then(|rows| rows.collect())?;
                Ok(users)
            }
        }
    }

    pub fn replace_top_users(&self, users: &[TopUser]) -> BotResult<()> {
        let conn = self.conn.lock().unwrap();
        let tx = conn.unchecked_transaction()?;
        tx.execute("DELETE FROM att_top_users_cache", [])?;
        for user in users {
            tx.execute(
                "INSERT INTO att_top_users_cache (user_id, username, approved_count, total_likes, updated_at)
                 VALUES (?1, ?2, ?3, ?4, datetime('now'))",
                params![user.user_id, user.username, user.approved_count, user.total_likes],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn stats_row_mapper(row: &rusqlite::Row<'_>) -> Result<SubmissionStats, rusqlite::Error> {
    Ok(SubmissionStats {
        total_attachments: row.get("total_attachments")?,
        pending_count: row.get("pending_count")?,
        approved_count: row.get("approved_count")?,
        rejected_count: row.get("rejected_count")?,
        br_count: row.get("br_count")?,
        mp_count: row.get("mp_count")?,
        total_users: row.get("total_users")?,
        active_users: row.get("active_users")?,
        banned_users: row.get("banned_users")?,
        total_likes: row.get("total_likes")?,
        total_reports: row.get("total_reports")?,
        pending_reports: row.get("pending_reports")?,
        last_week_submissions: row.get("last_week_submissions")?,
        last_week_approvals: row.get("last_week_approvals")?,
        updated_at: row.get("updated_at")?,
    })
}
