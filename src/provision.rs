use sqlx::{Connection, PgConnection};

use crate::config::Config;
use crate::error::{ProvisioningStage, TenancyError};
use crate::models::Tenant;
use crate::schema::TENANT_SCHEMA;

/// Deterministic database name for a tenant when none is requested.
pub fn canonical_database_name(tenant_id: i64) -> String {
    format!("tenant_{tenant_id}")
}

/// CREATE DATABASE cannot take bind parameters, so names are restricted to
/// lowercase identifier characters before being spliced into DDL.
pub fn validate_database_name(name: &str) -> Result<(), TenancyError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    };
    // 63 bytes is the Postgres identifier limit.
    if valid && name.len() <= 63 {
        Ok(())
    } else {
        Err(TenancyError::InvalidDatabaseName(name.to_string()))
    }
}

/// Idempotently creates and schema-initializes tenant databases.
///
/// Database creation and schema application are deliberately decoupled:
/// an existing database is never taken as proof of completed provisioning,
/// so the schema and seed steps always run. A crash between creation and
/// schema apply is healed by the next `provision` call.
#[derive(Debug, Clone)]
pub struct Provisioner {
    config: Config,
}

impl Provisioner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Ensure a database exists for `tenant` and contains the tenant
    /// schema plus the default settings row. Returns the database name;
    /// the caller persists it through the registry.
    pub async fn provision(
        &self,
        tenant: &Tenant,
        desired_name: Option<&str>,
    ) -> Result<String, TenancyError> {
        let database = match desired_name {
            Some(name) => name.to_string(),
            None => tenant
                .database_name
                .clone()
                .unwrap_or_else(|| canonical_database_name(tenant.id)),
        };
        validate_database_name(&database)?;

        self.create_database_if_absent(&database).await?;
        self.apply_schema(tenant, &database).await?;

        Ok(database)
    }

    /// Admin connection is opened and closed per call; provisioning is
    /// rare enough that a persistent admin pool is not worth keeping.
    async fn create_database_if_absent(&self, database: &str) -> Result<(), TenancyError> {
        let mut admin = PgConnection::connect(&self.config.admin_url())
            .await
            .map_err(|source| TenancyError::ProvisioningFailed {
                database: database.to_string(),
                stage: ProvisioningStage::CreateDatabase,
                source,
            })?;

        let exists: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(database)
                .fetch_optional(&mut admin)
                .await
                .map_err(|source| TenancyError::ProvisioningFailed {
                    database: database.to_string(),
                    stage: ProvisioningStage::CreateDatabase,
                    source,
                })?;

        if exists.is_some() {
            tracing::debug!("database {database} already exists, skipping creation");
        } else {
            tracing::info!("creating tenant database {database}");
            sqlx::query(&format!("CREATE DATABASE \"{database}\""))
                .execute(&mut admin)
                .await
                .map_err(|source| TenancyError::ProvisioningFailed {
                    database: database.to_string(),
                    stage: ProvisioningStage::CreateDatabase,
                    source,
                })?;
        }

        let _ = admin.close().await;
        Ok(())
    }

    async fn apply_schema(&self, tenant: &Tenant, database: &str) -> Result<(), TenancyError> {
        let mut conn = PgConnection::connect(&self.config.tenant_url(database))
            .await
            .map_err(|source| TenancyError::ProvisioningFailed {
                database: database.to_string(),
                stage: ProvisioningStage::ApplySchema,
                source,
            })?;

        for statement in TENANT_SCHEMA {
            sqlx::query(statement).execute(&mut conn).await.map_err(
                |source| TenancyError::ProvisioningFailed {
                    database: database.to_string(),
                    stage: ProvisioningStage::ApplySchema,
                    source,
                },
            )?;
        }

        self.seed_defaults(tenant, database, &mut conn).await?;

        let _ = conn.close().await;
        tracing::info!("tenant database {database} schema verified");
        Ok(())
    }

    /// Seed the settings row only when the table is empty, so repeated
    /// provisioning never duplicates it.
    async fn seed_defaults(
        &self,
        tenant: &Tenant,
        database: &str,
        conn: &mut PgConnection,
    ) -> Result<(), TenancyError> {
        let seeded = async {
            let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM company_settings")
                .fetch_one(&mut *conn)
                .await?;
            if row.0 == 0 {
                sqlx::query("INSERT INTO company_settings (company_name) VALUES ($1)")
                    .bind(&tenant.company_name)
                    .execute(&mut *conn)
                    .await?;
            }
            Ok::<_, sqlx::Error>(())
        }
        .await;

        seeded.map_err(|source| TenancyError::ProvisioningFailed {
            database: database.to_string(),
            stage: ProvisioningStage::SeedDefaults,
            source,
        })
    }
}
