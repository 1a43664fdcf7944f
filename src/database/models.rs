use serde::{Deserialize, Serialize};

/// Aggregate statistics over all user-submitted attachments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionStats {
    pub total_attachments: i64,
    pub pending_count: i64,
    pub approved_count: i64,
    pub rejected_count: i64,
    pub br_count: i64,
    pub mp_count: i64,
    pub total_users: i64,
    pub active_users: i64,
    pub banned_users: i64,
    pub total_likes: i64,
    pub total_reports: i64,
    pub pending_reports: i64,
    pub last_week_submissions: i64,
    pub last_week_approvals: i64,
    /// ISO timestamp of when this aggregate was computed
    pub updated_at: String,
}

impl SubmissionStats {
    /// Count for one of the three known submission statuses
    pub fn count_for_status(&self, status: &str) -> Option<i64> {
        match status {
            "pending" => Some(self.pending_count),
            "approved" => Some(self.approved_count),
            "rejected" => Some(self.rejected_count),
            _ => None,
        }
    }
}

/// One row of the weapon leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopWeapon {
    pub weapon_name: String,
    pub attachment_count: i64,
    pub mode: String,
}

/// One row of the submitter leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUser {
    pub user_id: i64,
    pub username: Option<String>,
    pub approved_count: i64,
    pub total_likes: i64,
}

/// Minimal user record for batch lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

/// A curated attachment loadout for a weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentLoadout {
    pub id: i64,
    pub name: String,
    pub like_count: i64,
}
