use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational user inside a tenant database. `directory_user_id` points
/// back at the directory mirror row.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub directory_user_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub login: String,
    pub role: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub directory_user_id: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub login: String,
    pub role: Option<String>,
    pub password_hash: Option<String>,
}

/// Grant giving a tenant user visibility into one client's data.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ClientAccess {
    pub id: i64,
    pub user_id: i64,
    pub client_id: i64,
    pub can_view_calendar: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
