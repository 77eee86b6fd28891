use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ticket::Table)
                    .if_not_exists()
                    .col(pk_auto(Ticket::Id))
                    .col(string(Ticket::OwnerDiscordId))
                    .col(string(Ticket::OwnerName))
                    .col(string(Ticket::Kind))
                    .col(string(Ticket::Status))
                    .col(string_null(Ticket::ChannelId))
                    .col(string_null(Ticket::ClaimedById))
                    .col(string_null(Ticket::ClaimedByName))
                    .col(integer_null(Ticket::Satisfaction))
                    .col(string_null(Ticket::CloseReason))
                    .col(string_null(Ticket::Comment))
                    .col(text_null(Ticket::Transcript))
                    .col(timestamp(Ticket::CreatedAt))
                    .col(timestamp_null(Ticket::ClosedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ticket::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum Ticket {
    Table,
    Id,
    OwnerDiscordId,
    OwnerName,
    Kind,
    Status,
    ChannelId,
    ClaimedById,
    ClaimedByName,
    Satisfaction,
    CloseReason,
    Comment,
    Transcript,
    CreatedAt,
    ClosedAt,
}
