pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod models;
pub mod onboarding;
pub mod provision;
pub mod registry;
pub mod router;
pub mod schema;

use sqlx::PgPool;

use crate::config::Config;
use crate::provision::Provisioner;
use crate::registry::TenantRegistry;
use crate::router::SessionRouter;

/// Embedded migrations for the directory database.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// The tenancy core: registry, provisioner and session router built once
/// at process start and injected together. The directory pool is owned by
/// the caller; [`Tenancy::close`] tears down only the per-tenant pools.
pub struct Tenancy {
    pub registry: TenantRegistry,
    pub provisioner: Provisioner,
    pub router: SessionRouter,
}

impl Tenancy {
    pub fn new(directory_pool: PgPool, config: Config) -> Self {
        Self {
            registry: TenantRegistry::new(directory_pool),
            provisioner: Provisioner::new(config.clone()),
            router: SessionRouter::new(config),
        }
    }

    /// Resolve a tenant id straight to a session on its database.
    pub async fn session_for_tenant(
        &self,
        tenant_id: i64,
    ) -> Result<router::ScopedSession, error::TenancyError> {
        let tenant = self.registry.lookup(tenant_id).await?;
        let Some(database) = tenant.database_name else {
            return Err(error::TenancyError::TenantNotProvisioned(tenant_id));
        };
        self.router.session_for(&database).await
    }

    /// Drain every per-tenant pool. Part of process shutdown.
    pub async fn close(&self) {
        self.router.close().await;
    }
}
