use chrono::NaiveDate;

use crate::models::{NewReport, Report, ReportHistoryEntry, ReportPeriod, ReportTemplate};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewReport,
) -> Result<Report, sqlx::Error> {
    sqlx::query_as::<_, Report>(
        "INSERT INTO reports (template_id, period_id, client_id, created_by, file_path)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(new.template_id)
    .bind(new.period_id)
    .bind(new.client_id)
    .bind(new.created_by)
    .bind(&new.file_path)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>("SELECT * FROM reports WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn list_recent<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    limit: i64,
) -> Result<Vec<Report>, sqlx::Error> {
    sqlx::query_as::<_, Report>("SELECT * FROM reports ORDER BY id DESC LIMIT $1")
        .bind(limit)
        .fetch_all(executor)
        .await
}

pub async fn set_status<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE reports SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn count_by_status<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    status: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports WHERE status = $1")
        .bind(status)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn count_with_status_in<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    statuses: &[&str],
) -> Result<i64, sqlx::Error> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reports WHERE status = ANY($1)")
        .bind(statuses)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

// ── Templates ───────────────────────────────────────────────────

pub async fn create_template<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    description: Option<&str>,
) -> Result<ReportTemplate, sqlx::Error> {
    sqlx::query_as::<_, ReportTemplate>(
        "INSERT INTO report_templates (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await
}

pub async fn list_templates<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<ReportTemplate>, sqlx::Error> {
    sqlx::query_as::<_, ReportTemplate>(
        "SELECT * FROM report_templates WHERE is_active ORDER BY name",
    )
    .fetch_all(executor)
    .await
}

// ── Periods ─────────────────────────────────────────────────────

pub async fn create_period<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    name: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<ReportPeriod, sqlx::Error> {
    sqlx::query_as::<_, ReportPeriod>(
        "INSERT INTO report_periods (name, start_date, end_date) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(name)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(executor)
    .await
}

pub async fn list_periods<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<ReportPeriod>, sqlx::Error> {
    sqlx::query_as::<_, ReportPeriod>("SELECT * FROM report_periods ORDER BY start_date DESC")
        .fetch_all(executor)
        .await
}

pub async fn close_period<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE report_periods SET is_closed = true WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

// ── History ─────────────────────────────────────────────────────

pub async fn append_history<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    report_id: i64,
    changed_by: Option<i64>,
    change_type: &str,
    comment: Option<&str>,
) -> Result<ReportHistoryEntry, sqlx::Error> {
    sqlx::query_as::<_, ReportHistoryEntry>(
        "INSERT INTO report_history (report_id, changed_by, change_type, comment)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(report_id)
    .bind(changed_by)
    .bind(change_type)
    .bind(comment)
    .fetch_one(executor)
    .await
}

pub async fn list_history<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    report_id: i64,
) -> Result<Vec<ReportHistoryEntry>, sqlx::Error> {
    sqlx::query_as::<_, ReportHistoryEntry>(
        "SELECT * FROM report_history WHERE report_id = $1 ORDER BY created_at",
    )
    .bind(report_id)
    .fetch_all(executor)
    .await
}
