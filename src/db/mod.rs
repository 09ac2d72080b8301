//! Tenant-scoped data access. Every function runs against an executor
//! already bound to one tenant's database — isolation is structural, there
//! is no tenant-id column to filter on.

pub mod calendar;
pub mod clients;
pub mod reports;
pub mod settings;
pub mod signatures;
pub mod users;
