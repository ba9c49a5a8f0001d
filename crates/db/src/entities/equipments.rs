//! `SeaORM` Entity for the equipments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "equipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kvk_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub purchase_year: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub cost: Option<Decimal>,
    pub is_functional: bool,
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
