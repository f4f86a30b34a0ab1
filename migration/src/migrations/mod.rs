pub mod m202607290001_create_users;
pub mod m202607290002_create_sessions;
pub mod m202607290003_create_activity_logs;
