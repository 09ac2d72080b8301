use sqlx::PgPool;

use crate::error::{TenancyError, is_unique_violation};
use crate::models::{NewTenantUser, Tenant, TenantUserRecord};

/// Single source of truth for which tenants exist, whether they are
/// active, and which database each one owns. Operates on the directory
/// database only.
#[derive(Debug, Clone)]
pub struct TenantRegistry {
    pool: PgPool,
}

impl TenantRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn lookup(&self, tenant_id: i64) -> Result<Tenant, TenancyError> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TenancyError::TenantNotFound(tenant_id))
    }

    pub async fn find_by_database_name(
        &self,
        database: &str,
    ) -> Result<Option<Tenant>, TenancyError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE database_name = $1")
            .bind(database)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tenant)
    }

    /// Insert a new tenant in the unprovisioned state (no database name).
    pub async fn create(
        &self,
        company_name: &str,
        notes: Option<&str>,
    ) -> Result<Tenant, TenancyError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (company_name, notes) VALUES ($1, $2) RETURNING *",
        )
        .bind(company_name)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(tenant)
    }

    /// Record the database name after successful provisioning.
    ///
    /// Re-assigning the current name is a no-op. Assigning a different name
    /// fails unless `overwrite` is set, and a name owned by another tenant
    /// fails regardless (unique constraint in the directory).
    pub async fn assign_database_name(
        &self,
        tenant_id: i64,
        database: &str,
        overwrite: bool,
    ) -> Result<Tenant, TenancyError> {
        let current = self.lookup(tenant_id).await?;
        if let Some(existing) = &current.database_name {
            if existing == database {
                return Ok(current);
            }
            if !overwrite {
                return Err(TenancyError::DatabaseNameConflict {
                    tenant_id,
                    requested: database.to_string(),
                    existing: Some(existing.clone()),
                });
            }
        }

        let updated = sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET database_name = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(tenant_id)
        .bind(database)
        .fetch_one(&self.pool)
        .await;

        match updated {
            Ok(tenant) => Ok(tenant),
            Err(e) if is_unique_violation(&e) => Err(TenancyError::DatabaseNameConflict {
                tenant_id,
                requested: database.to_string(),
                existing: None,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a tenant row, cascading to its mirror users. Used to discard
    /// the duplicate created by the loser of a provisioning race.
    pub async fn delete(&self, tenant_id: i64) -> Result<(), TenancyError> {
        sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn set_active(&self, tenant_id: i64, active: bool) -> Result<Tenant, TenancyError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET is_active = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(tenant_id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(TenancyError::TenantNotFound(tenant_id))
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, TenancyError> {
        let tenants = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(tenants)
    }

    // ── Directory mirrors of tenant users ───────────────────────

    pub async fn create_mirror_user(
        &self,
        tenant_id: i64,
        new: &NewTenantUser,
        role: &str,
    ) -> Result<TenantUserRecord, TenancyError> {
        let user = sqlx::query_as::<_, TenantUserRecord>(
            "INSERT INTO tenant_users (tenant_id, email, login, password_hash, full_name, phone, role)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(tenant_id)
        .bind(&new.email)
        .bind(&new.login)
        .bind(&new.password_hash)
        .bind(&new.full_name)
        .bind(&new.phone)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    /// Resolve a login (or email) to its mirror record, for
    /// login-to-tenant routing. Both columns are unique directory-wide,
    /// so at most one row can match.
    pub async fn find_mirror_by_login(
        &self,
        login: &str,
    ) -> Result<Option<TenantUserRecord>, TenancyError> {
        let user = sqlx::query_as::<_, TenantUserRecord>(
            "SELECT * FROM tenant_users WHERE login = $1 OR email = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn list_mirror_users(
        &self,
        tenant_id: i64,
    ) -> Result<Vec<TenantUserRecord>, TenancyError> {
        let users = sqlx::query_as::<_, TenantUserRecord>(
            "SELECT * FROM tenant_users WHERE tenant_id = $1 ORDER BY created_at DESC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn count_mirror_users(&self, tenant_id: i64) -> Result<i64, TenancyError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenant_users WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Compensation hook for failed two-phase user creation.
    pub async fn delete_mirror_user(&self, id: i64) -> Result<(), TenancyError> {
        sqlx::query("DELETE FROM tenant_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
