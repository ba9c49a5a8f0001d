//! Section data repository backing the section fetcher.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use kendra_core::fetch::SectionStore;
use kendra_core::records::{
    Achievement, BankAccount, Building, DataSource, Employee, Equipment, KvkProfile, LandRecord,
    SectionRecord, Training, Vehicle,
};
use kendra_core::store::StoreError;
use kendra_shared::types::KvkId;

use super::backend;
use crate::entities::{
    achievements, bank_accounts, buildings, districts, employees, equipments, kvks, land_records,
    organizations, states, trainings, vehicles, zones,
};

/// Fetches raw section records, one KVK and one data source at a time.
///
/// Queries are plain per-KVK lookups ordered by a stable key; temporal
/// filter semantics are applied by the core fetcher.
#[derive(Debug, Clone)]
pub struct SectionRepository {
    db: DatabaseConnection,
}

impl SectionRepository {
    /// Creates a new section repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the KVK profile with its resolved hierarchy names.
    async fn fetch_profile(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let kvk_row = kvks::Entity::find_by_id(Uuid::from(kvk))
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or(StoreError::KvkNotFound(kvk))?;

        let org = organizations::Entity::find_by_id(kvk_row.org_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("KVK {kvk} has no host organization")))?;
        let district = districts::Entity::find_by_id(org.district_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("organization {} has no district", org.id)))?;
        let state = states::Entity::find_by_id(district.state_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("district {} has no state", district.id)))?;
        let zone = zones::Entity::find_by_id(state.zone_id)
            .one(&self.db)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend(format!("state {} has no zone", state.id)))?;

        Ok(vec![SectionRecord::KvkProfile(KvkProfile {
            kvk_id: kvk,
            name: kvk_row.name,
            org_name: org.name,
            district_name: district.name,
            state_name: state.name,
            zone_name: zone.name,
            establishment_year: kvk_row.establishment_year,
            address: kvk_row.address,
            email: kvk_row.email,
            phone: kvk_row.phone,
        })])
    }

    async fn fetch_employees(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = employees::Entity::find()
            .filter(employees::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(employees::Column::Name)
            .order_by_asc(employees::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|e| {
                SectionRecord::Employee(Employee {
                    name: e.name,
                    designation: e.designation,
                    discipline: e.discipline,
                    pay_level: e.pay_level,
                    date_of_joining: e.date_of_joining,
                    date_of_birth: e.date_of_birth,
                    is_permanent: e.is_permanent,
                })
            })
            .collect())
    }

    async fn fetch_bank_accounts(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(bank_accounts::Column::BankName)
            .order_by_asc(bank_accounts::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|b| {
                SectionRecord::BankAccount(BankAccount {
                    bank_name: b.bank_name,
                    branch: b.branch,
                    account_number: b.account_number,
                    ifsc: b.ifsc,
                    account_type: b.account_type,
                    balance: b.balance,
                })
            })
            .collect())
    }

    async fn fetch_land_records(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = land_records::Entity::find()
            .filter(land_records::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(land_records::Column::SurveyNumber)
            .order_by_asc(land_records::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|l| {
                SectionRecord::LandRecord(LandRecord {
                    survey_number: l.survey_number,
                    land_type: l.land_type,
                    area_hectares: l.area_hectares,
                    ownership: l.ownership,
                })
            })
            .collect())
    }

    async fn fetch_buildings(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = buildings::Entity::find()
            .filter(buildings::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(buildings::Column::Name)
            .order_by_asc(buildings::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|b| {
                SectionRecord::Building(Building {
                    name: b.name,
                    building_type: b.building_type,
                    completion_year: b.completion_year,
                    plinth_area_sqm: b.plinth_area_sqm,
                    status: b.status,
                })
            })
            .collect())
    }

    async fn fetch_vehicles(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = vehicles::Entity::find()
            .filter(vehicles::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(vehicles::Column::PurchaseYear)
            .order_by_asc(vehicles::Column::RegistrationNumber)
            .order_by_asc(vehicles::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|v| {
                SectionRecord::Vehicle(Vehicle {
                    vehicle_type: v.vehicle_type,
                    registration_number: v.registration_number,
                    purchase_year: v.purchase_year,
                    cost: v.cost,
                    is_operational: v.is_operational,
                })
            })
            .collect())
    }

    async fn fetch_equipments(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = equipments::Entity::find()
            .filter(equipments::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(equipments::Column::Name)
            .order_by_asc(equipments::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|e| {
                SectionRecord::Equipment(Equipment {
                    name: e.name,
                    category: e.category,
                    purchase_year: e.purchase_year,
                    cost: e.cost,
                    is_functional: e.is_functional,
                })
            })
            .collect())
    }

    async fn fetch_trainings(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = trainings::Entity::find()
            .filter(trainings::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(trainings::Column::StartDate)
            .order_by_asc(trainings::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|t| {
                SectionRecord::Training(Training {
                    title: t.title,
                    thematic_area: t.thematic_area,
                    start_date: t.start_date,
                    end_date: t.end_date,
                    participants: t.participants,
                })
            })
            .collect())
    }

    async fn fetch_achievements(&self, kvk: KvkId) -> Result<Vec<SectionRecord>, StoreError> {
        let rows = achievements::Entity::find()
            .filter(achievements::Column::KvkId.eq(Uuid::from(kvk)))
            .order_by_asc(achievements::Column::RecordedAt)
            .order_by_asc(achievements::Column::Id)
            .all(&self.db)
            .await
            .map_err(backend)?;
        Ok(rows
            .into_iter()
            .map(|a| {
                SectionRecord::Achievement(Achievement {
                    title: a.title,
                    description: a.description,
                    recorded_at: a.recorded_at.map(|t| t.to_utc()),
                })
            })
            .collect())
    }
}

#[async_trait]
impl SectionStore for SectionRepository {
    async fn fetch(
        &self,
        kvk: KvkId,
        source: DataSource,
    ) -> Result<Vec<SectionRecord>, StoreError> {
        match source {
            DataSource::KvkProfile => self.fetch_profile(kvk).await,
            DataSource::Employees => self.fetch_employees(kvk).await,
            DataSource::BankAccounts => self.fetch_bank_accounts(kvk).await,
            DataSource::LandRecords => self.fetch_land_records(kvk).await,
            DataSource::Buildings => self.fetch_buildings(kvk).await,
            DataSource::Vehicles => self.fetch_vehicles(kvk).await,
            DataSource::Equipments => self.fetch_equipments(kvk).await,
            DataSource::Trainings => self.fetch_trainings(kvk).await,
            DataSource::Achievements => self.fetch_achievements(kvk).await,
        }
    }
}
