use std::sync::OnceLock;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use clientdb::Tenancy;
use clientdb::config::Config;

static TRACING: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .try_init();
    });
}

/// A tenancy core wired to a fresh throwaway directory database.
pub struct TestDirectory {
    pub tenancy: Tenancy,
    pub pool: PgPool,
    pub config: Config,
    pub db_name: String,
}

/// Unique tenant database name so concurrent test runs on one server
/// never collide on the canonical `tenant_<id>` names.
pub fn unique_database() -> String {
    format!("tenant_{}", Uuid::now_v7().simple())
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}

/// Spawn a tenancy core against a fresh temporary directory database.
pub async fn spawn() -> TestDirectory {
    let _ = dotenvy::dotenv();
    init_tracing();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("clientdb_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test directory database");

    admin_pool.close().await;

    let directory_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&directory_url)
        .await
        .expect("Failed to connect to test directory database");

    clientdb::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run directory migrations");

    let config = Config {
        database_url: directory_url,
        admin_database: "postgres".to_string(),
        // One connection per tenant pool keeps release bugs loud.
        tenant_max_connections: 1,
    };

    let tenancy = Tenancy::new(pool.clone(), config.clone());

    TestDirectory {
        tenancy,
        pool,
        config,
        db_name,
    }
}

/// Drop every database the test created: all provisioned tenant databases
/// plus the directory itself.
pub async fn cleanup(dir: TestDirectory) {
    let tenant_dbs: Vec<String> = sqlx::query_scalar(
        "SELECT database_name FROM tenants WHERE database_name IS NOT NULL",
    )
    .fetch_all(&dir.pool)
    .await
    .unwrap_or_default();

    dir.tenancy.close().await;
    dir.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    for db in tenant_dbs.iter().chain(std::iter::once(&dir.db_name)) {
        let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db}\" WITH (FORCE)"))
            .execute(&admin_pool)
            .await;
    }

    admin_pool.close().await;
}
