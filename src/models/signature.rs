use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Digital signing certificate issued to a client. `end_date` drives the
/// expiry warnings on the dashboard.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct DigitalSignature {
    pub id: i64,
    pub client_id: i64,
    pub owner_name: String,
    pub certificate_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSignature {
    pub client_id: i64,
    pub owner_name: String,
    pub certificate_number: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
