use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entities::{error_logs, prelude::*};
use crate::errors::StoreError;
use typing_types::ErrorReport;

/// Stores error reports sent by the browser client.
pub struct ErrorLogRepository {
    db: DatabaseConnection,
}

impl ErrorLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn record(&self, report: ErrorReport) -> Result<i32, StoreError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let log_model = error_logs::ActiveModel {
            id: ActiveValue::NotSet,
            message: ActiveValue::Set(report.message),
            error: ActiveValue::Set(report.error),
            stack: ActiveValue::Set(report.stack),
            reported_at: ActiveValue::Set(report.timestamp),
            user_id: ActiveValue::Set(report.user_id),
            user_agent: ActiveValue::Set(report.user_agent),
            path: ActiveValue::Set(report.path),
            created_at: ActiveValue::Set(now),
        };

        let saved = ErrorLogs::insert(log_model).exec(&self.db).await?;
        Ok(saved.last_insert_id)
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        Ok(ErrorLogs::find().count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::memory_database_with_schema;

    #[tokio::test]
    async fn test_record_error_report() {
        let db = memory_database_with_schema().await.unwrap();
        let repo = ErrorLogRepository::new(db);

        let report = ErrorReport {
            message: Some("Canvas failed".to_string()),
            error: Some("TypeError".to_string()),
            path: Some("/game".to_string()),
            ..Default::default()
        };

        repo.record(report).await.unwrap();
        repo.record(ErrorReport::default()).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
