pub mod prelude;

pub mod achievements;
pub mod error_logs;
pub mod test_records;
pub mod users;
