use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ticket")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_discord_id: String,
    pub owner_name: String,
    pub kind: String,
    pub status: String,
    pub channel_id: Option<String>,
    pub claimed_by_id: Option<String>,
    pub claimed_by_name: Option<String>,
    pub satisfaction: Option<i32>,
    pub close_reason: Option<String>,
    pub comment: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub transcript: Option<String>,
    pub created_at: DateTimeUtc,
    pub closed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
