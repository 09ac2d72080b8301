use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directory record of one client organization. `database_name` stays NULL
/// until provisioning completes; once set it is never cleared.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    pub company_name: String,
    pub notes: Option<String>,
    pub database_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_provisioned(&self) -> bool {
        self.database_name.is_some()
    }
}

/// Directory mirror of a tenant's operational user, used for
/// login-to-tenant resolution. The authoritative record lives in the
/// tenant database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TenantUserRecord {
    pub id: i64,
    pub tenant_id: i64,
    pub email: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for tenant-user onboarding. The password arrives pre-hashed;
/// hashing is the caller's concern.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTenantUser {
    pub email: String,
    pub login: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
}

pub mod roles {
    pub const OWNER: &str = "owner";
    pub const MEMBER: &str = "member";
}
