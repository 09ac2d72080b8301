//! Tenant and tenant-user onboarding flows, spanning the directory and
//! tenant databases.

use crate::Tenancy;
use crate::db;
use crate::error::TenancyError;
use crate::models::tenant::roles;
use crate::models::{NewTenantUser, NewUser, Tenant, TenantUserRecord, User};

impl Tenancy {
    /// Register a tenant and provision its database end to end.
    ///
    /// The tenant row is created unprovisioned, the database is brought up,
    /// and the name is recorded last — so a provisioning failure leaves the
    /// tenant visibly unprovisioned rather than half-marked. When two calls
    /// race on the same name, the directory's unique constraint picks one
    /// winner and the loser resolves to the already-provisioned record.
    pub async fn create_tenant(
        &self,
        company_name: &str,
        notes: Option<&str>,
        desired_name: Option<&str>,
    ) -> Result<Tenant, TenancyError> {
        let tenant = self.registry.create(company_name, notes).await?;
        let database = self.provisioner.provision(&tenant, desired_name).await?;

        match self
            .registry
            .assign_database_name(tenant.id, &database, false)
            .await
        {
            Ok(tenant) => {
                tracing::info!(
                    "tenant {} ({company_name}) provisioned into {database}",
                    tenant.id
                );
                Ok(tenant)
            }
            Err(conflict @ TenancyError::DatabaseNameConflict { .. }) => {
                // Lost the provisioning race; the winner's assignment
                // stands. Resolve to the winner's record and discard the
                // duplicate row this call created.
                match self.registry.find_by_database_name(&database).await? {
                    Some(winner) => {
                        tracing::warn!(
                            "tenant {} lost provisioning race for {database} to tenant {}, \
                             removing duplicate directory row",
                            tenant.id,
                            winner.id
                        );
                        self.registry.delete(tenant.id).await?;
                        Ok(winner)
                    }
                    None => Err(conflict),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Create a tenant user in both databases: the directory mirror first,
    /// then the authoritative tenant-side record.
    ///
    /// Cross-database writes cannot share a transaction, so this is an
    /// explicit two-phase operation: if the tenant-side insert fails the
    /// mirror is deleted again. Only when that compensation also fails do
    /// the records actually diverge, reported as `InconsistentMirror`.
    pub async fn create_tenant_user(
        &self,
        tenant_id: i64,
        new: &NewTenantUser,
    ) -> Result<(TenantUserRecord, User), TenancyError> {
        let tenant = self.registry.lookup(tenant_id).await?;
        let Some(database) = tenant.database_name else {
            return Err(TenancyError::TenantNotProvisioned(tenant_id));
        };

        // Resolve the session before writing anything, so an unreachable
        // tenant database fails the whole operation cleanly.
        let mut session = self.router.session_for(&database).await?;

        let role = if self.registry.count_mirror_users(tenant_id).await? == 0 {
            roles::OWNER
        } else {
            roles::MEMBER
        };

        let mirror = self.registry.create_mirror_user(tenant_id, new, role).await?;

        let created = db::users::create(
            session.conn(),
            &NewUser {
                directory_user_id: Some(mirror.id),
                full_name: new.full_name.clone(),
                email: new.email.clone(),
                login: new.login.clone(),
                role: Some(role.to_string()),
                password_hash: Some(new.password_hash.clone()),
            },
        )
        .await;

        match created {
            Ok(user) => Ok((mirror, user)),
            Err(e) => {
                tracing::warn!(
                    "tenant-side insert for {} in {database} failed, removing mirror: {e}",
                    new.login
                );
                if let Err(cleanup) = self.registry.delete_mirror_user(mirror.id).await {
                    return Err(TenancyError::InconsistentMirror {
                        tenant_id,
                        directory_user_id: mirror.id,
                        detail: format!(
                            "tenant insert failed ({e}); mirror cleanup failed ({cleanup})"
                        ),
                    });
                }
                Err(e.into())
            }
        }
    }
}
