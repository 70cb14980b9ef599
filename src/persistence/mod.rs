/// Persistence Layer
///
/// SQLite database bootstrap and the activity log backed by it. Saved
/// workflows live in `workflow::storage` and share the same pool.

// Database file and schema bootstrap
pub mod database;

// API activity log (fire-and-forget)
pub mod activity;

pub use activity::SqliteEventLog;
pub use database::Database;
