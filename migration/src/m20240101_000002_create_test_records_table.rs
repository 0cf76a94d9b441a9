use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TestRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TestRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TestRecords::UserId).uuid().not_null())
                    .col(ColumnDef::new(TestRecords::Wpm).double().not_null())
                    .col(ColumnDef::new(TestRecords::Accuracy).double().not_null())
                    .col(ColumnDef::new(TestRecords::TimeLimit).integer().not_null())
                    .col(
                        ColumnDef::new(TestRecords::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_test_records_user")
                            .from(TestRecords::Table, TestRecords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_test_records_user_id")
                    .table(TestRecords::Table)
                    .col(TestRecords::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TestRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TestRecords {
    Table,
    Id,
    UserId,
    Wpm,
    Accuracy,
    TimeLimit,
    Date,
}
