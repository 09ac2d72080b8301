/// How far a failed provisioning run got before the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStage {
    /// CREATE DATABASE failed; nothing was created.
    CreateDatabase,
    /// The database exists but the tenant schema is incomplete.
    ApplySchema,
    /// Schema is in place but the default settings row was not seeded.
    SeedDefaults,
}

impl std::fmt::Display for ProvisioningStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisioningStage::CreateDatabase => write!(f, "create-database"),
            ProvisioningStage::ApplySchema => write!(f, "apply-schema"),
            ProvisioningStage::SeedDefaults => write!(f, "seed-defaults"),
        }
    }
}

#[derive(Debug)]
pub enum TenancyError {
    TenantNotFound(i64),
    /// The tenant exists but has no database assigned yet.
    TenantNotProvisioned(i64),
    InvalidDatabaseName(String),
    /// The requested database name clashes with an existing assignment.
    /// `existing` is the tenant's current name when it differs, or None when
    /// another tenant already owns the requested name.
    DatabaseNameConflict {
        tenant_id: i64,
        requested: String,
        existing: Option<String>,
    },
    ProvisioningFailed {
        database: String,
        stage: ProvisioningStage,
        source: sqlx::Error,
    },
    ConnectionUnavailable {
        database: String,
        source: sqlx::Error,
    },
    /// Directory mirror and tenant-side user records diverged and the
    /// compensating cleanup also failed; needs manual reconciliation.
    InconsistentMirror {
        tenant_id: i64,
        directory_user_id: i64,
        detail: String,
    },
    Database(sqlx::Error),
}

impl std::fmt::Display for TenancyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenancyError::TenantNotFound(id) => write!(f, "tenant {id} not found"),
            TenancyError::TenantNotProvisioned(id) => {
                write!(f, "tenant {id} has no provisioned database")
            }
            TenancyError::InvalidDatabaseName(name) => {
                write!(f, "invalid database name: {name:?}")
            }
            TenancyError::DatabaseNameConflict {
                tenant_id,
                requested,
                existing,
            } => match existing {
                Some(existing) => write!(
                    f,
                    "tenant {tenant_id} already has database {existing:?}, refusing to assign {requested:?}"
                ),
                None => write!(
                    f,
                    "database name {requested:?} is already taken (tenant {tenant_id})"
                ),
            },
            TenancyError::ProvisioningFailed {
                database,
                stage,
                source,
            } => write!(f, "provisioning {database:?} failed at {stage}: {source}"),
            TenancyError::ConnectionUnavailable { database, source } => {
                write!(f, "database {database:?} unavailable: {source}")
            }
            TenancyError::InconsistentMirror {
                tenant_id,
                directory_user_id,
                detail,
            } => write!(
                f,
                "tenant {tenant_id} user mirror {directory_user_id} is inconsistent: {detail}"
            ),
            TenancyError::Database(err) => write!(f, "database error: {err}"),
        }
    }
}

impl std::error::Error for TenancyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TenancyError::ProvisioningFailed { source, .. }
            | TenancyError::ConnectionUnavailable { source, .. }
            | TenancyError::Database(source) => Some(source),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for TenancyError {
    fn from(err: sqlx::Error) -> Self {
        TenancyError::Database(err)
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
