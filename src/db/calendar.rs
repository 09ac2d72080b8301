use chrono::NaiveDate;

use crate::models::{CalendarEvent, HandbookEntry, NewCalendarEvent, NewHandbookEntry};

pub async fn create_handbook_entry<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewHandbookEntry,
) -> Result<HandbookEntry, sqlx::Error> {
    sqlx::query_as::<_, HandbookEntry>(
        "INSERT INTO calendar_handbook (name, description, default_day, default_month)
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.default_day)
    .bind(new.default_month)
    .fetch_one(executor)
    .await
}

pub async fn list_handbook<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<HandbookEntry>, sqlx::Error> {
    sqlx::query_as::<_, HandbookEntry>(
        "SELECT * FROM calendar_handbook WHERE is_active ORDER BY name",
    )
    .fetch_all(executor)
    .await
}

pub async fn create_event<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewCalendarEvent,
) -> Result<CalendarEvent, sqlx::Error> {
    sqlx::query_as::<_, CalendarEvent>(
        "INSERT INTO calendar_events (title, event_date, client_id, handbook_id, description)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(&new.title)
    .bind(new.event_date)
    .bind(new.client_id)
    .bind(new.handbook_id)
    .bind(&new.description)
    .fetch_one(executor)
    .await
}

/// Events in the half-open range `[start, end)`.
pub async fn list_between<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<CalendarEvent>, sqlx::Error> {
    sqlx::query_as::<_, CalendarEvent>(
        "SELECT * FROM calendar_events WHERE event_date >= $1 AND event_date < $2
         ORDER BY event_date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await
}

pub async fn count_between<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM calendar_events WHERE event_date >= $1 AND event_date < $2",
    )
    .bind(start)
    .bind(end)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}
