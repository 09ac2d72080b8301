use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-tenant company settings. Exactly one row per tenant database; the
/// provisioner seeds it with defaults.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CompanySettings {
    pub id: i64,
    pub company_name: Option<String>,
    pub logo_path: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
    pub fiscal_year_start: Option<String>,
    pub report_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
