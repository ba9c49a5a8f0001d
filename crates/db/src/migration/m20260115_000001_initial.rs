//! Initial database migration.
//!
//! Creates the organizational hierarchy (zones through KVKs) and the
//! section data tables consumed by the report engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ORGANIZATIONAL HIERARCHY
        // ============================================================
        db.execute_unprepared(ZONES_SQL).await?;
        db.execute_unprepared(STATES_SQL).await?;
        db.execute_unprepared(DISTRICTS_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(KVKS_SQL).await?;

        // ============================================================
        // PART 2: SECTION DATA
        // ============================================================
        db.execute_unprepared(EMPLOYEES_SQL).await?;
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(LAND_RECORDS_SQL).await?;
        db.execute_unprepared(BUILDINGS_SQL).await?;
        db.execute_unprepared(VEHICLES_SQL).await?;
        db.execute_unprepared(EQUIPMENTS_SQL).await?;
        db.execute_unprepared(TRAININGS_SQL).await?;
        db.execute_unprepared(ACHIEVEMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ZONES_SQL: &str = r"
CREATE TABLE zones (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    code VARCHAR(32) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const STATES_SQL: &str = r"
CREATE TABLE states (
    id UUID PRIMARY KEY,
    zone_id UUID NOT NULL REFERENCES zones(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_states_zone ON states(zone_id);
";

const DISTRICTS_SQL: &str = r"
CREATE TABLE districts (
    id UUID PRIMARY KEY,
    state_id UUID NOT NULL REFERENCES states(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_districts_state ON districts(state_id);
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY,
    district_id UUID NOT NULL REFERENCES districts(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    org_type VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_organizations_district ON organizations(district_id);
";

const KVKS_SQL: &str = r"
CREATE TABLE kvks (
    id UUID PRIMARY KEY,
    org_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    establishment_year INTEGER,
    address TEXT,
    email VARCHAR(255),
    phone VARCHAR(32),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_kvks_org ON kvks(org_id);
CREATE INDEX idx_kvks_name ON kvks(name);
";

const EMPLOYEES_SQL: &str = r"
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    designation VARCHAR(255) NOT NULL,
    discipline VARCHAR(255),
    pay_level VARCHAR(64),
    date_of_joining DATE,
    date_of_birth DATE,
    is_permanent BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_employees_kvk ON employees(kvk_id);
CREATE INDEX idx_employees_joining ON employees(date_of_joining);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    bank_name VARCHAR(255) NOT NULL,
    branch VARCHAR(255),
    account_number VARCHAR(64) NOT NULL,
    ifsc VARCHAR(16),
    account_type VARCHAR(64),
    balance NUMERIC(14, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_bank_accounts_kvk ON bank_accounts(kvk_id);
";

const LAND_RECORDS_SQL: &str = r"
CREATE TABLE land_records (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    survey_number VARCHAR(64) NOT NULL,
    land_type VARCHAR(100) NOT NULL,
    area_hectares NUMERIC(10, 2),
    ownership VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_land_records_kvk ON land_records(kvk_id);
";

const BUILDINGS_SQL: &str = r"
CREATE TABLE buildings (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    building_type VARCHAR(100) NOT NULL,
    completion_year INTEGER,
    plinth_area_sqm NUMERIC(10, 2),
    status VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_buildings_kvk ON buildings(kvk_id);
";

const VEHICLES_SQL: &str = r"
CREATE TABLE vehicles (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    vehicle_type VARCHAR(100) NOT NULL,
    registration_number VARCHAR(32) NOT NULL,
    purchase_year INTEGER,
    cost NUMERIC(14, 2),
    is_operational BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_vehicles_kvk ON vehicles(kvk_id);
CREATE INDEX idx_vehicles_year ON vehicles(purchase_year);
";

const EQUIPMENTS_SQL: &str = r"
CREATE TABLE equipments (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(100),
    purchase_year INTEGER,
    cost NUMERIC(14, 2),
    is_functional BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_equipments_kvk ON equipments(kvk_id);
";

const TRAININGS_SQL: &str = r"
CREATE TABLE trainings (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    title VARCHAR(500) NOT NULL,
    thematic_area VARCHAR(255),
    start_date DATE,
    end_date DATE,
    participants BIGINT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_trainings_kvk ON trainings(kvk_id);
CREATE INDEX idx_trainings_start ON trainings(start_date);
";

const ACHIEVEMENTS_SQL: &str = r"
CREATE TABLE achievements (
    id UUID PRIMARY KEY,
    kvk_id UUID NOT NULL REFERENCES kvks(id) ON DELETE CASCADE,
    title VARCHAR(500) NOT NULL,
    description TEXT,
    recorded_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_achievements_kvk ON achievements(kvk_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS achievements;
DROP TABLE IF EXISTS trainings;
DROP TABLE IF EXISTS equipments;
DROP TABLE IF EXISTS vehicles;
DROP TABLE IF EXISTS buildings;
DROP TABLE IF EXISTS land_records;
DROP TABLE IF EXISTS bank_accounts;
DROP TABLE IF EXISTS employees;
DROP TABLE IF EXISTS kvks;
DROP TABLE IF EXISTS organizations;
DROP TABLE IF EXISTS districts;
DROP TABLE IF EXISTS states;
DROP TABLE IF EXISTS zones;
";
