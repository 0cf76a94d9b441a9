pub use super::achievements::Entity as Achievements;
pub use super::error_logs::Entity as ErrorLogs;
pub use super::test_records::Entity as TestRecords;
pub use super::users::Entity as Users;
