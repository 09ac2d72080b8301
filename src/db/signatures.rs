use chrono::{Duration, NaiveDate};

use crate::models::{DigitalSignature, NewSignature};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewSignature,
) -> Result<DigitalSignature, sqlx::Error> {
    sqlx::query_as::<_, DigitalSignature>(
        "INSERT INTO digital_signatures (client_id, owner_name, certificate_number, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(new.client_id)
    .bind(&new.owner_name)
    .bind(&new.certificate_number)
    .bind(new.start_date)
    .bind(new.end_date)
    .fetch_one(executor)
    .await
}

pub async fn list<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<DigitalSignature>, sqlx::Error> {
    sqlx::query_as::<_, DigitalSignature>(
        "SELECT * FROM digital_signatures ORDER BY end_date NULLS LAST",
    )
    .fetch_all(executor)
    .await
}

/// Signatures expiring within `days` of `today`, inclusive on both ends:
/// one ending exactly `days` out is included, one already expired is not.
pub async fn list_expiring_within<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    today: NaiveDate,
    days: i64,
) -> Result<Vec<DigitalSignature>, sqlx::Error> {
    let horizon = today + Duration::days(days);
    sqlx::query_as::<_, DigitalSignature>(
        "SELECT * FROM digital_signatures WHERE end_date >= $1 AND end_date <= $2
         ORDER BY end_date",
    )
    .bind(today)
    .bind(horizon)
    .fetch_all(executor)
    .await
}

pub async fn count_expiring_within<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    today: NaiveDate,
    days: i64,
) -> Result<i64, sqlx::Error> {
    let horizon = today + Duration::days(days);
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM digital_signatures WHERE end_date >= $1 AND end_date <= $2",
    )
    .bind(today)
    .bind(horizon)
    .fetch_one(executor)
    .await?;
    Ok(row.0)
}
