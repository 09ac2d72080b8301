use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Report lifecycle statuses. Dashboard aggregates treat `in_progress` and
/// `prepared` as active.
pub mod status {
    pub const IN_PROGRESS: &str = "in_progress";
    pub const PREPARED: &str = "prepared";
    pub const OVERDUE: &str = "overdue";
    pub const DONE: &str = "done";
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub id: i64,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub template_id: Option<i64>,
    pub period_id: Option<i64>,
    pub client_id: Option<i64>,
    pub created_by: Option<i64>,
    pub status: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReport {
    pub template_id: Option<i64>,
    pub period_id: Option<i64>,
    pub client_id: Option<i64>,
    pub created_by: Option<i64>,
    pub file_path: Option<String>,
}

/// Append-only audit trail of report status changes.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ReportHistoryEntry {
    pub id: i64,
    pub report_id: i64,
    pub changed_by: Option<i64>,
    pub change_type: String,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
