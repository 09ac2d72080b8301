//! Tenant database schema, applied by the provisioner.
//!
//! Every statement is idempotent (`CREATE TABLE IF NOT EXISTS`) and the
//! list is ordered so foreign-key targets are created before their
//! referrers. Re-running the whole list against a half-provisioned
//! database completes it.

pub const TENANT_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        directory_user_id BIGINT,
        full_name TEXT NOT NULL,
        email TEXT NOT NULL,
        login TEXT NOT NULL,
        role TEXT,
        password_hash TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clients (
        id BIGSERIAL PRIMARY KEY,
        short_name TEXT,
        full_name TEXT,
        inn TEXT,
        kpp TEXT,
        ogrn TEXT,
        address TEXT,
        email TEXT,
        phone TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS client_access (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        client_id BIGINT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        can_view_calendar BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        UNIQUE (user_id, client_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS digital_signatures (
        id BIGSERIAL PRIMARY KEY,
        client_id BIGINT NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
        owner_name TEXT NOT NULL,
        certificate_number TEXT,
        start_date DATE,
        end_date DATE,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_settings (
        id BIGSERIAL PRIMARY KEY,
        company_name TEXT,
        logo_path TEXT,
        currency TEXT DEFAULT 'USD',
        timezone TEXT DEFAULT 'UTC',
        fiscal_year_start TEXT DEFAULT '01-01',
        report_email TEXT,
        phone TEXT,
        address TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_periods (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        start_date DATE,
        end_date DATE,
        is_closed BOOLEAN NOT NULL DEFAULT false,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_templates (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reports (
        id BIGSERIAL PRIMARY KEY,
        template_id BIGINT REFERENCES report_templates(id),
        period_id BIGINT REFERENCES report_periods(id),
        client_id BIGINT REFERENCES clients(id),
        created_by BIGINT REFERENCES users(id),
        status TEXT NOT NULL DEFAULT 'in_progress',
        file_path TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS report_history (
        id BIGSERIAL PRIMARY KEY,
        report_id BIGINT NOT NULL REFERENCES reports(id) ON DELETE CASCADE,
        changed_by BIGINT REFERENCES users(id),
        change_type TEXT NOT NULL,
        comment TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calendar_handbook (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        default_day INT,
        default_month INT,
        is_active BOOLEAN NOT NULL DEFAULT true,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS calendar_events (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        event_date DATE NOT NULL,
        client_id BIGINT REFERENCES clients(id),
        handbook_id BIGINT REFERENCES calendar_handbook(id),
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];
