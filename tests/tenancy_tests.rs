mod common;

use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;

use clientdb::dashboard::{DashboardStats, month_window};
use clientdb::db;
use clientdb::error::TenancyError;
use clientdb::models::report::status;
use clientdb::models::{NewCalendarEvent, NewClient, NewReport, NewSignature, NewTenantUser};

fn new_user(login: &str) -> NewTenantUser {
    NewTenantUser {
        email: format!("{login}@test.com"),
        login: login.to_string(),
        password_hash: "$argon2id$test-hash".to_string(),
        full_name: "Test User".to_string(),
        phone: None,
    }
}

// ── Provisioning ────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn provision_twice_returns_same_database_and_single_seed() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Acme", None, Some(&database))
        .await
        .unwrap();
    assert_eq!(tenant.database_name.as_deref(), Some(database.as_str()));

    // Second run: same name back, still exactly one seeded settings row.
    let again = dir
        .tenancy
        .provisioner
        .provision(&tenant, Some(&database))
        .await
        .unwrap();
    assert_eq!(again, database);

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    assert_eq!(db::settings::count(session.conn()).await.unwrap(), 1);

    let settings = db::settings::get(session.conn()).await.unwrap().unwrap();
    assert_eq!(settings.company_name.as_deref(), Some("Acme"));

    drop(session);
    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn provision_heals_database_that_exists_without_schema() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    // Simulate a crash right after CREATE DATABASE: the database exists
    // but holds no tables.
    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&dir.config.admin_url())
        .await
        .unwrap();
    sqlx::query(&format!("CREATE DATABASE \"{database}\""))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;

    let tenant = dir.tenancy.registry.create("Hollow Corp", None).await.unwrap();
    let name = dir
        .tenancy
        .provisioner
        .provision(&tenant, Some(&database))
        .await
        .unwrap();
    assert_eq!(name, database);

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    assert_eq!(db::settings::count(session.conn()).await.unwrap(), 1);

    drop(session);
    common::cleanup(dir).await;
}

// ── Registry ────────────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn registry_tracks_provisioning_state() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir.tenancy.registry.create("Fresh LLC", Some("new signup")).await.unwrap();
    assert!(!tenant.is_provisioned());

    let looked_up = dir.tenancy.registry.lookup(tenant.id).await.unwrap();
    assert_eq!(looked_up.database_name, None);

    dir.tenancy.provisioner.provision(&tenant, Some(&database)).await.unwrap();
    let assigned = dir
        .tenancy
        .registry
        .assign_database_name(tenant.id, &database, false)
        .await
        .unwrap();
    assert_eq!(assigned.database_name.as_deref(), Some(database.as_str()));

    // Re-assigning the same name is a no-op success.
    dir.tenancy
        .registry
        .assign_database_name(tenant.id, &database, false)
        .await
        .unwrap();

    // A different name without overwrite is refused and nothing changes.
    let err = dir
        .tenancy
        .registry
        .assign_database_name(tenant.id, "tenant_other", false)
        .await
        .unwrap_err();
    assert!(matches!(err, TenancyError::DatabaseNameConflict { .. }));
    let unchanged = dir.tenancy.registry.lookup(tenant.id).await.unwrap();
    assert_eq!(unchanged.database_name.as_deref(), Some(database.as_str()));

    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn database_name_is_unique_across_tenants() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let first = dir
        .tenancy
        .create_tenant("First", None, Some(&database))
        .await
        .unwrap();
    assert!(first.is_provisioned());

    let second = dir.tenancy.registry.create("Second", None).await.unwrap();
    let err = dir
        .tenancy
        .registry
        .assign_database_name(second.id, &database, false)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TenancyError::DatabaseNameConflict { existing: None, .. }
    ));

    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn create_tenant_race_loser_resolves_to_winner() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let winner = dir
        .tenancy
        .create_tenant("Winner", None, Some(&database))
        .await
        .unwrap();

    // A second creation aimed at the same name loses the assignment and
    // must come back with the winner's provisioned record, not its own
    // unprovisioned row.
    let resolved = dir
        .tenancy
        .create_tenant("Latecomer", None, Some(&database))
        .await
        .unwrap();
    assert_eq!(resolved.id, winner.id);
    assert_eq!(resolved.database_name.as_deref(), Some(database.as_str()));

    // The loser's duplicate directory row was discarded.
    let tenants = dir.tenancy.registry.list().await.unwrap();
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0].id, winner.id);

    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn inactive_flag_does_not_touch_database_name() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Sleepy Inc", None, Some(&database))
        .await
        .unwrap();

    let deactivated = dir.tenancy.registry.set_active(tenant.id, false).await.unwrap();
    assert!(!deactivated.is_active);
    assert_eq!(deactivated.database_name.as_deref(), Some(database.as_str()));

    common::cleanup(dir).await;
}

// ── Session routing ─────────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn session_is_released_even_after_a_failed_query() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    dir.tenancy
        .create_tenant("Flaky", None, Some(&database))
        .await
        .unwrap();

    // The harness caps each tenant pool at one connection, so a leaked
    // session would make the second acquire hang or fail.
    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    let result = sqlx::query("SELECT * FROM no_such_table")
        .execute(session.conn())
        .await;
    assert!(result.is_err());
    drop(session);

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    assert_eq!(db::settings::count(session.conn()).await.unwrap(), 1);

    drop(session);
    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn session_for_tenant_resolves_through_the_registry() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Routed", None, Some(&database))
        .await
        .unwrap();

    let mut session = dir.tenancy.session_for_tenant(tenant.id).await.unwrap();
    assert_eq!(session.database(), database);
    let settings = db::settings::get(session.conn()).await.unwrap().unwrap();
    assert_eq!(settings.company_name.as_deref(), Some("Routed"));

    let renamed = db::settings::update_company_name(session.conn(), settings.id, "Routed GmbH")
        .await
        .unwrap();
    assert_eq!(renamed.company_name.as_deref(), Some("Routed GmbH"));

    drop(session);
    common::cleanup(dir).await;
}

// ── Tenant users (two-phase mirror) ─────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn tenant_user_is_created_in_both_databases() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Twin Peaks", None, Some(&database))
        .await
        .unwrap();

    let (mirror, user) = dir
        .tenancy
        .create_tenant_user(tenant.id, &new_user("owner1"))
        .await
        .unwrap();
    assert_eq!(mirror.role, "owner");
    assert_eq!(user.directory_user_id, Some(mirror.id));

    let (second_mirror, _) = dir
        .tenancy
        .create_tenant_user(tenant.id, &new_user("member1"))
        .await
        .unwrap();
    assert_eq!(second_mirror.role, "member");

    let resolved = dir
        .tenancy
        .registry
        .find_mirror_by_login("owner1@test.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.tenant_id, tenant.id);

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    assert_eq!(db::users::count(session.conn()).await.unwrap(), 2);

    drop(session);
    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn mirror_is_compensated_when_tenant_insert_fails() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Broken Mirror", None, Some(&database))
        .await
        .unwrap();

    // Sabotage the tenant database so the second phase must fail.
    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();
    sqlx::query("DROP TABLE users CASCADE")
        .execute(session.conn())
        .await
        .unwrap();
    drop(session);

    let err = dir
        .tenancy
        .create_tenant_user(tenant.id, &new_user("ghost"))
        .await
        .unwrap_err();
    assert!(matches!(err, TenancyError::Database(_)));

    // The directory mirror was rolled back.
    assert_eq!(
        dir.tenancy.registry.count_mirror_users(tenant.id).await.unwrap(),
        0
    );

    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn mirror_rejects_duplicate_email() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Unique Mail", None, Some(&database))
        .await
        .unwrap();
    dir.tenancy
        .create_tenant_user(tenant.id, &new_user("first"))
        .await
        .unwrap();

    // Same email under a different login: the directory refuses it, so
    // email lookups can never resolve to an arbitrary row.
    let mut duplicate = new_user("second");
    duplicate.email = "first@test.com".to_string();
    let err = dir
        .tenancy
        .create_tenant_user(tenant.id, &duplicate)
        .await
        .unwrap_err();
    assert!(matches!(err, TenancyError::Database(_)));

    assert_eq!(
        dir.tenancy.registry.count_mirror_users(tenant.id).await.unwrap(),
        1
    );
    let resolved = dir
        .tenancy
        .registry
        .find_mirror_by_login("first@test.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.login, "first");

    common::cleanup(dir).await;
}

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn tenant_user_requires_a_provisioned_tenant() {
    let dir = common::spawn().await;

    let tenant = dir.tenancy.registry.create("Unprovisioned", None).await.unwrap();
    let err = dir
        .tenancy
        .create_tenant_user(tenant.id, &new_user("early"))
        .await
        .unwrap_err();
    assert!(matches!(err, TenancyError::TenantNotProvisioned(_)));

    common::cleanup(dir).await;
}

// ── Tenant-scoped data access ───────────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn report_workflow_and_reference_data() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    let tenant = dir
        .tenancy
        .create_tenant("Workflow", None, Some(&database))
        .await
        .unwrap();
    let (_, user) = dir
        .tenancy
        .create_tenant_user(tenant.id, &new_user("accountant"))
        .await
        .unwrap();

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();

    let client = db::clients::create(
        session.conn(),
        &NewClient {
            full_name: Some("Acme Trading LLC".to_string()),
            inn: Some("7701234567".to_string()),
            ..NewClient::default()
        },
    )
    .await
    .unwrap();

    let renamed = db::clients::update(
        session.conn(),
        client.id,
        &NewClient {
            short_name: Some("Acme".to_string()),
            full_name: Some("Acme Trading Ltd".to_string()),
            inn: client.inn.clone(),
            ..NewClient::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(renamed.full_name.as_deref(), Some("Acme Trading Ltd"));
    assert_eq!(renamed.inn.as_deref(), Some("7701234567"));

    let access = db::users::grant_client_access(session.conn(), user.id, client.id, true)
        .await
        .unwrap();
    assert!(access.can_view_calendar);
    // Granting again updates the existing row instead of duplicating it.
    db::users::grant_client_access(session.conn(), user.id, client.id, false)
        .await
        .unwrap();
    let grants = db::users::list_client_access(session.conn(), user.id).await.unwrap();
    assert_eq!(grants.len(), 1);
    assert!(!grants[0].can_view_calendar);

    let template = db::reports::create_template(session.conn(), "VAT return", None)
        .await
        .unwrap();
    let period = db::reports::create_period(session.conn(), "Q3 2026", None, None)
        .await
        .unwrap();
    let report = db::reports::create(
        session.conn(),
        &NewReport {
            template_id: Some(template.id),
            period_id: Some(period.id),
            client_id: Some(client.id),
            created_by: Some(user.id),
            file_path: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(report.status, status::IN_PROGRESS);

    db::reports::set_status(session.conn(), report.id, status::PREPARED)
        .await
        .unwrap();
    db::reports::append_history(
        session.conn(),
        report.id,
        Some(user.id),
        "status_change",
        Some("ready for review"),
    )
    .await
    .unwrap();
    let history = db::reports::list_history(session.conn(), report.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, "status_change");

    db::reports::close_period(session.conn(), period.id).await.unwrap();
    let periods = db::reports::list_periods(session.conn()).await.unwrap();
    assert!(periods[0].is_closed);

    let entry = db::calendar::create_handbook_entry(
        session.conn(),
        &clientdb::models::NewHandbookEntry {
            name: "VAT filing".to_string(),
            description: None,
            default_day: Some(25),
            default_month: None,
        },
    )
    .await
    .unwrap();
    let handbook = db::calendar::list_handbook(session.conn()).await.unwrap();
    assert_eq!(handbook[0].id, entry.id);

    drop(session);
    common::cleanup(dir).await;
}

// ── Dashboard aggregates ────────────────────────────────────────

#[tokio::test]
#[ignore = "requires a running Postgres via DATABASE_URL"]
async fn dashboard_counts_respect_time_windows() {
    let dir = common::spawn().await;
    let database = common::unique_database();

    dir.tenancy
        .create_tenant("Dashboards Ltd", None, Some(&database))
        .await
        .unwrap();
    let today = Utc::now().date_naive();

    let mut session = dir.tenancy.router.session_for(&database).await.unwrap();

    // Two clients; one backdated past the 7-day new-client window.
    let fresh = db::clients::create(
        session.conn(),
        &NewClient {
            short_name: Some("Fresh".to_string()),
            ..NewClient::default()
        },
    )
    .await
    .unwrap();
    let old = db::clients::create(
        session.conn(),
        &NewClient {
            short_name: Some("Old".to_string()),
            ..NewClient::default()
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE clients SET created_at = now() - interval '30 days' WHERE id = $1")
        .bind(old.id)
        .execute(session.conn())
        .await
        .unwrap();

    // Signatures: exactly 30 days out counts, 31 days does not, nor does
    // one that expired yesterday.
    for (owner, end) in [
        ("boundary", today + Duration::days(30)),
        ("too-far", today + Duration::days(31)),
        ("expired", today - Duration::days(1)),
    ] {
        db::signatures::create(
            session.conn(),
            &NewSignature {
                client_id: fresh.id,
                owner_name: owner.to_string(),
                certificate_number: None,
                start_date: None,
                end_date: Some(end),
            },
        )
        .await
        .unwrap();
    }

    // One event inside the current month, one exactly on the end boundary.
    let (_, month_end) = month_window(today);
    for (title, date) in [("inside", today), ("outside", month_end)] {
        db::calendar::create_event(
            session.conn(),
            &NewCalendarEvent {
                title: title.to_string(),
                event_date: date,
                client_id: None,
                handbook_id: None,
                description: None,
            },
        )
        .await
        .unwrap();
    }

    // Reports across the status taxonomy; two count as active.
    for s in [status::OVERDUE, status::IN_PROGRESS, status::PREPARED, status::DONE] {
        let report = db::reports::create(session.conn(), &NewReport::default())
            .await
            .unwrap();
        db::reports::set_status(session.conn(), report.id, s).await.unwrap();
    }

    let stats = DashboardStats::collect(&mut session, today).await.unwrap();
    assert_eq!(
        stats,
        DashboardStats {
            clients_count: 2,
            reports_count: 4,
            overdue_reports: 1,
            active_reports: 2,
            new_clients_count: 1,
            expiring_signatures_count: 1,
            calendar_events_count: 1,
        }
    );

    drop(session);
    common::cleanup(dir).await;
}
