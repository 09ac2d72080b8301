use std::ops::{Deref, DerefMut};

use dashmap::DashMap;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool, Postgres};

use crate::config::Config;
use crate::error::TenancyError;

/// Resolves tenant database names to live sessions, caching one bounded
/// connection pool per database.
///
/// The router is an explicit object owned by [`crate::Tenancy`]: built at
/// startup, injected where needed, drained by [`SessionRouter::close`] at
/// shutdown. Pools are created lazily so registering a name costs nothing
/// until the first acquire.
pub struct SessionRouter {
    config: Config,
    pools: DashMap<String, PgPool>,
}

impl SessionRouter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pools: DashMap::new(),
        }
    }

    /// The shared pool for a tenant database, created on first request.
    ///
    /// Lazy pools never dial the server here, so concurrent first calls can
    /// each build a candidate; the entry API keeps exactly one and the
    /// losers are dropped unopened.
    pub fn engine_for(&self, database: &str) -> Result<PgPool, TenancyError> {
        if let Some(pool) = self.pools.get(database) {
            return Ok(pool.clone());
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.config.tenant_max_connections)
            .connect_lazy(&self.config.tenant_url(database))
            .map_err(|source| TenancyError::ConnectionUnavailable {
                database: database.to_string(),
                source,
            })?;

        let entry = self.pools.entry(database.to_string()).or_insert(pool);
        Ok(entry.clone())
    }

    /// A fresh session bound to the tenant's pool. Sessions are never
    /// shared; the pool underneath is.
    ///
    /// An unreachable database fails with `ConnectionUnavailable` without
    /// evicting the cached pool — transient failures must not throw away a
    /// good configuration.
    pub async fn session_for(&self, database: &str) -> Result<ScopedSession, TenancyError> {
        let pool = self.engine_for(database)?;
        let conn = pool
            .acquire()
            .await
            .map_err(|source| TenancyError::ConnectionUnavailable {
                database: database.to_string(),
                source,
            })?;
        Ok(ScopedSession {
            database: database.to_string(),
            conn,
        })
    }

    /// Number of cached pools (one per database name seen so far).
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Close every cached pool. Part of process shutdown.
    pub async fn close(&self) {
        let names: Vec<String> = self.pools.iter().map(|e| e.key().clone()).collect();
        for name in names {
            if let Some((_, pool)) = self.pools.remove(&name) {
                pool.close().await;
            }
        }
    }
}

/// A pooled connection scoped to one tenant database.
///
/// Dropping the session on any exit path returns the connection to its
/// pool; it is never physically closed by release. Derefs to
/// [`PgConnection`] so data-access functions take it as an executor.
pub struct ScopedSession {
    database: String,
    conn: PoolConnection<Postgres>,
}

impl ScopedSession {
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn conn(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}

impl Deref for ScopedSession {
    type Target = PgConnection;

    fn deref(&self) -> &PgConnection {
        &self.conn
    }
}

impl DerefMut for ScopedSession {
    fn deref_mut(&mut self) -> &mut PgConnection {
        &mut self.conn
    }
}
