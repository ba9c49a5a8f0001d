//! `SeaORM` Entity for the employees table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kvk_id: Uuid,
    pub name: String,
    pub designation: String,
    pub discipline: Option<String>,
    pub pay_level: Option<String>,
    pub date_of_joining: Option<Date>,
    pub date_of_birth: Option<Date>,
    pub is_permanent: bool,
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
