use crate::models::{ClientAccess, NewUser, User};

pub async fn create<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    new: &NewUser,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (directory_user_id, full_name, email, login, role, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(new.directory_user_id)
    .bind(&new.full_name)
    .bind(&new.email)
    .bind(&new.login)
    .bind(&new.role)
    .bind(&new.password_hash)
    .fetch_one(executor)
    .await
}

pub async fn find_by_login<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    login: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1 OR email = $1")
        .bind(login)
        .fetch_optional(executor)
        .await
}

pub async fn list<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(executor)
        .await
}

pub async fn count<'e, E: sqlx::PgExecutor<'e>>(executor: E) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

pub async fn set_active<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    id: i64,
    active: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET is_active = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(active)
        .execute(executor)
        .await?;
    Ok(())
}

/// Grant (or refresh) a user's access to one client. Upsert keyed on the
/// (user, client) pair.
pub async fn grant_client_access<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    client_id: i64,
    can_view_calendar: bool,
) -> Result<ClientAccess, sqlx::Error> {
    sqlx::query_as::<_, ClientAccess>(
        "INSERT INTO client_access (user_id, client_id, can_view_calendar)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, client_id)
         DO UPDATE SET can_view_calendar = $3, updated_at = now()
         RETURNING *",
    )
    .bind(user_id)
    .bind(client_id)
    .bind(can_view_calendar)
    .fetch_one(executor)
    .await
}

pub async fn list_client_access<'e, E: sqlx::PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Vec<ClientAccess>, sqlx::Error> {
    sqlx::query_as::<_, ClientAccess>(
        "SELECT * FROM client_access WHERE user_id = $1 ORDER BY client_id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}
