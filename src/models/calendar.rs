use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Reference entry for recurring deadlines (e.g. a filing due on the same
/// day every month or year).
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct HandbookEntry {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub default_day: Option<i32>,
    pub default_month: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHandbookEntry {
    pub name: String,
    pub description: Option<String>,
    pub default_day: Option<i32>,
    pub default_month: Option<i32>,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i64,
    pub title: String,
    pub event_date: NaiveDate,
    pub client_id: Option<i64>,
    pub handbook_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub event_date: NaiveDate,
    pub client_id: Option<i64>,
    pub handbook_id: Option<i64>,
    pub description: Option<String>,
}
