//! `SeaORM` entity definitions.

pub mod achievements;
pub mod bank_accounts;
pub mod buildings;
pub mod districts;
pub mod employees;
pub mod equipments;
pub mod kvks;
pub mod land_records;
pub mod organizations;
pub mod states;
pub mod trainings;
pub mod vehicles;
pub mod zones;
