use chrono::NaiveDate;

use crate::models::{Client, NewClient};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewClient,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "INSERT INTO clients (short_name, full_name, inn, kpp, ogrn, address, email, phone)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
    )
    .bind(&new.short_name)
    .bind(&new.full_name)
    .bind(&new.inn)
    .bind(&new.kpp)
    .bind(&new.ogrn)
    .bind(&new.address)
    .bind(&new.email)
    .bind(&new.phone)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn update<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
    fields: &NewClient,
) -> Result<Client, sqlx::Error> {
    sqlx::query_as::<_, Client>(
        "UPDATE clients
         SET short_name = $2, full_name = $3, inn = $4, kpp = $5, ogrn = $6,
             address = $7, email = $8, phone = $9, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&fields.short_name)
    .bind(&fields.full_name)
    .bind(&fields.inn)
    .bind(&fields.kpp)
    .bind(&fields.ogrn)
    .bind(&fields.address)
    .bind(&fields.email)
    .bind(&fields.phone)
    .fetch_one(executor)
    .await
}

pub async fn list<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY created_at DESC")
        .fetch_all(executor)
        .await
}

pub async fn set_active<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
    active: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE clients SET is_active = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(active)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn count<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

/// Clients created on or after `since` (trailing-window dashboard count).
pub async fn count_created_since<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    since: NaiveDate,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clients WHERE created_at >= $1")
        .bind(since)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}
