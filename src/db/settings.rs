use crate::models::CompanySettings;

/// The settings row for this tenant. Provisioning guarantees one exists.
pub async fn get<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
) -> Result<Option<CompanySettings>, sqlx::Error> {
    sqlx::query_as::<_, CompanySettings>("SELECT * FROM company_settings ORDER BY id LIMIT 1")
        .fetch_optional(executor)
        .await
}

pub async fn count<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM company_settings")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn update_company_name<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
    company_name: &str,
) -> Result<CompanySettings, sqlx::Error> {
    sqlx::query_as::<_, CompanySettings>(
        "UPDATE company_settings SET company_name = $2, updated_at = now()
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(company_name)
    .fetch_one(executor)
    .await
}
