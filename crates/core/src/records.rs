//! Section record types.
//!
//! One struct per data source, mirrored from the db crate's entities. The
//! entity store returns these; the registry's extraction functions read
//! them field by field. Relation-derived display values (host organization,
//! district, state, zone names on the profile) arrive already resolved so
//! no dynamic path walking is needed downstream.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use kendra_shared::types::KvkId;

/// Logical data source names resolved by the section store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// The KVK's own profile row plus resolved hierarchy names.
    KvkProfile,
    /// Bank accounts held by the KVK.
    BankAccounts,
    /// Staff employed at the KVK.
    Employees,
    /// Land parcels under the KVK.
    LandRecords,
    /// Buildings and civil infrastructure.
    Buildings,
    /// Vehicles owned by the KVK.
    Vehicles,
    /// Farm and lab equipment.
    Equipments,
    /// Training programmes conducted.
    Trainings,
    /// Salient achievements recorded against the KVK.
    Achievements,
}

impl DataSource {
    /// Returns the logical source name as used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KvkProfile => "kvk_profile",
            Self::BankAccounts => "bank_accounts",
            Self::Employees => "employees",
            Self::LandRecords => "land_records",
            Self::Buildings => "buildings",
            Self::Vehicles => "vehicles",
            Self::Equipments => "equipments",
            Self::Trainings => "trainings",
            Self::Achievements => "achievements",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KVK profile with resolved hierarchy names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvkProfile {
    /// The KVK this profile belongs to.
    pub kvk_id: KvkId,
    /// KVK name.
    pub name: String,
    /// Host organization name.
    pub org_name: String,
    /// District name.
    pub district_name: String,
    /// State name.
    pub state_name: String,
    /// Zone name.
    pub zone_name: String,
    /// Year of establishment.
    pub establishment_year: Option<i32>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Bank account held by a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    /// Bank name.
    pub bank_name: String,
    /// Branch name.
    pub branch: Option<String>,
    /// Account number.
    pub account_number: String,
    /// IFSC code.
    pub ifsc: Option<String>,
    /// Account type (savings, current, ...).
    pub account_type: Option<String>,
    /// Current balance.
    pub balance: Option<Decimal>,
}

/// Staff member employed at a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Full name.
    pub name: String,
    /// Designation (e.g. "Subject Matter Specialist").
    pub designation: String,
    /// Discipline (e.g. "Agronomy").
    pub discipline: Option<String>,
    /// Pay level.
    pub pay_level: Option<String>,
    /// Date of joining.
    pub date_of_joining: Option<NaiveDate>,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Whether the post is permanent.
    pub is_permanent: bool,
}

/// Land parcel under a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandRecord {
    /// Survey number.
    pub survey_number: String,
    /// Land use type (cultivable, orchard, building, ...).
    pub land_type: String,
    /// Area in hectares.
    pub area_hectares: Option<Decimal>,
    /// Ownership status.
    pub ownership: Option<String>,
}

/// Building or civil structure at a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    /// Building name.
    pub name: String,
    /// Structure type (admin block, farmers hostel, ...).
    pub building_type: String,
    /// Year construction completed.
    pub completion_year: Option<i32>,
    /// Plinth area in square meters.
    pub plinth_area_sqm: Option<Decimal>,
    /// Present status (in use, under repair, ...).
    pub status: Option<String>,
}

/// Vehicle owned by a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Vehicle type (tractor, jeep, ...).
    pub vehicle_type: String,
    /// Registration number.
    pub registration_number: String,
    /// Year of purchase.
    pub purchase_year: Option<i32>,
    /// Purchase cost.
    pub cost: Option<Decimal>,
    /// Whether the vehicle is in running condition.
    pub is_operational: bool,
}

/// Equipment item at a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    /// Equipment name.
    pub name: String,
    /// Category (farm machinery, lab, audio-visual, ...).
    pub category: Option<String>,
    /// Year of purchase.
    pub purchase_year: Option<i32>,
    /// Purchase cost.
    pub cost: Option<Decimal>,
    /// Whether the equipment is functional.
    pub is_functional: bool,
}

/// Training programme conducted by a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Training {
    /// Programme title.
    pub title: String,
    /// Thematic area.
    pub thematic_area: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
    /// Number of participants.
    pub participants: Option<i64>,
}

/// Salient achievement recorded against a KVK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    /// Achievement title.
    pub title: String,
    /// Longer description.
    pub description: Option<String>,
    /// When the achievement was recorded.
    pub recorded_at: Option<DateTime<Utc>>,
}

/// A record from any section data source.
///
/// Closed union so that the registry's extraction functions can be plain
/// function pointers over a single argument type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRecord {
    /// A KVK profile row.
    KvkProfile(KvkProfile),
    /// A bank account row.
    BankAccount(BankAccount),
    /// An employee row.
    Employee(Employee),
    /// A land record row.
    LandRecord(LandRecord),
    /// A building row.
    Building(Building),
    /// A vehicle row.
    Vehicle(Vehicle),
    /// An equipment row.
    Equipment(Equipment),
    /// A training programme row.
    Training(Training),
    /// An achievement row.
    Achievement(Achievement),
}

impl SectionRecord {
    /// Returns the data source this record belongs to.
    #[must_use]
    pub const fn source(&self) -> DataSource {
        match self {
            Self::KvkProfile(_) => DataSource::KvkProfile,
            Self::BankAccount(_) => DataSource::BankAccounts,
            Self::Employee(_) => DataSource::Employees,
            Self::LandRecord(_) => DataSource::LandRecords,
            Self::Building(_) => DataSource::Buildings,
            Self::Vehicle(_) => DataSource::Vehicles,
            Self::Equipment(_) => DataSource::Equipments,
            Self::Training(_) => DataSource::Trainings,
            Self::Achievement(_) => DataSource::Achievements,
        }
    }
}
