use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ErrorLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ErrorLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ErrorLogs::Message).text().null())
                    .col(ColumnDef::new(ErrorLogs::Error).text().null())
                    .col(ColumnDef::new(ErrorLogs::Stack).text().null())
                    .col(ColumnDef::new(ErrorLogs::ReportedAt).string().null())
                    .col(ColumnDef::new(ErrorLogs::UserId).string().null())
                    .col(ColumnDef::new(ErrorLogs::UserAgent).text().null())
                    .col(ColumnDef::new(ErrorLogs::Path).text().null())
                    .col(
                        ColumnDef::new(ErrorLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ErrorLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ErrorLogs {
    Table,
    Id,
    Message,
    Error,
    Stack,
    ReportedAt,
    UserId,
    UserAgent,
    Path,
    CreatedAt,
}
