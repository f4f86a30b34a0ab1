pub mod activity_log;
pub mod session;
pub mod user;

pub use activity_log::Entity as ActivityLog;
pub use session::Entity as Session;
pub use user::Entity as User;

use sea_orm::FromQueryResult;
use serde::Serialize;

/// Upper bound on the look-back window accepted by per-day statistics
/// queries (two years).
pub const MAX_STAT_DAYS: i64 = 730;

/// One bucket of a per-day count series, as returned by the growth and
/// activity statistics queries.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}
