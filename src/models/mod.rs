pub mod calendar;
pub mod client;
pub mod report;
pub mod settings;
pub mod signature;
pub mod tenant;
pub mod user;

pub use calendar::{CalendarEvent, HandbookEntry, NewCalendarEvent, NewHandbookEntry};
pub use client::{Client, NewClient};
pub use report::{NewReport, Report, ReportHistoryEntry, ReportPeriod, ReportTemplate};
pub use settings::CompanySettings;
pub use signature::{DigitalSignature, NewSignature};
pub use tenant::{NewTenantUser, Tenant, TenantUserRecord};
pub use user::{ClientAccess, NewUser, User};
