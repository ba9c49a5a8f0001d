//! `SeaORM` Entity for the land_records table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "land_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kvk_id: Uuid,
    pub survey_number: String,
    pub land_type: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub area_hectares: Option<Decimal>,
    pub ownership: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::kvks::Entity",
        from = "Column::KvkId",
        to = "super::kvks::Column::Id"
    )]
    Kvks,
}

impl Related<super::kvks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kvks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
