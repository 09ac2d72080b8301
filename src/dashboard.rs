use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::db;
use crate::error::TenancyError;
use crate::models::report::status;
use crate::router::ScopedSession;

/// Half-open window covering the calendar month of `today`:
/// `[first day of month, first day of next month)`. December rolls the
/// year over instead of producing a thirteenth month.
pub fn month_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (year, month) = (today.year(), today.month());
    let start = NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month");
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .expect("first day of month is always valid");
    (start, end)
}

/// Start of the trailing `days`-day window ending at `today`.
pub fn trailing_window(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

const NEW_CLIENT_WINDOW_DAYS: i64 = 7;
const SIGNATURE_EXPIRY_WINDOW_DAYS: i64 = 30;

/// Headline counters for one tenant's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub clients_count: i64,
    pub reports_count: i64,
    pub overdue_reports: i64,
    pub active_reports: i64,
    pub new_clients_count: i64,
    pub expiring_signatures_count: i64,
    pub calendar_events_count: i64,
}

impl DashboardStats {
    /// Filtered counts over one resolved tenant session. `today` is passed
    /// in so the window arithmetic stays deterministic under test.
    pub async fn collect(
        session: &mut ScopedSession,
        today: NaiveDate,
    ) -> Result<DashboardStats, TenancyError> {
        let clients_count = db::clients::count(session.conn()).await?;
        let reports_count = db::reports::count(session.conn()).await?;
        let overdue_reports =
            db::reports::count_by_status(session.conn(), status::OVERDUE).await?;
        let active_reports = db::reports::count_with_status_in(
            session.conn(),
            &[status::IN_PROGRESS, status::PREPARED],
        )
        .await?;

        let week_ago = trailing_window(today, NEW_CLIENT_WINDOW_DAYS);
        let new_clients_count = db::clients::count_created_since(session.conn(), week_ago).await?;

        let expiring_signatures_count = db::signatures::count_expiring_within(
            session.conn(),
            today,
            SIGNATURE_EXPIRY_WINDOW_DAYS,
        )
        .await?;

        let (month_start, month_end) = month_window(today);
        let calendar_events_count =
            db::calendar::count_between(session.conn(), month_start, month_end).await?;

        Ok(DashboardStats {
            clients_count,
            reports_count,
            overdue_reports,
            active_reports,
            new_clients_count,
            expiring_signatures_count,
            calendar_events_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_window_mid_year() {
        let (start, end) = month_window(date(2026, 8, 28));
        assert_eq!(start, date(2026, 8, 1));
        assert_eq!(end, date(2026, 9, 1));
    }

    #[test]
    fn month_window_rolls_december_into_next_year() {
        let (start, end) = month_window(date(2026, 12, 31));
        assert_eq!(start, date(2026, 12, 1));
        assert_eq!(end, date(2027, 1, 1));
    }

    #[test]
    fn month_window_on_first_of_january() {
        let (start, end) = month_window(date(2027, 1, 1));
        assert_eq!(start, date(2027, 1, 1));
        assert_eq!(end, date(2027, 2, 1));
    }

    #[test]
    fn trailing_window_crosses_month_boundary() {
        assert_eq!(trailing_window(date(2026, 3, 3), 7), date(2026, 2, 24));
    }
}
