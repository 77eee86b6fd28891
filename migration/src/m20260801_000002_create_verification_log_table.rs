use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationLog::Table)
                    .if_not_exists()
                    .col(pk_auto(VerificationLog::Id))
                    .col(string(VerificationLog::DiscordId))
                    .col(string(VerificationLog::DiscordName))
                    .col(string(VerificationLog::ExternalUsername))
                    .col(string(VerificationLog::ExternalId))
                    .col(string(VerificationLog::Method))
                    .col(timestamp(VerificationLog::CreatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum VerificationLog {
    Table,
    Id,
    DiscordId,
    DiscordName,
    ExternalUsername,
    ExternalId,
    Method,
    CreatedAt,
}
