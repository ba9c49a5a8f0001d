//! The static section catalog.
//!
//! Every extraction function is bound here, at catalog construction, so a
//! section's field list and its accessors cannot disagree. Records of the
//! wrong source yield `Null` from every accessor; the fetcher never routes
//! them here in practice.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::descriptor::{
    FieldSpec, FieldValue, GroupSpec, RenderFormat, SectionDescriptor, TemporalFields,
    TemporalSpec, TemporalValue, ValueType,
};
use super::error::ConfigError;
use crate::records::{DataSource, SectionRecord};

fn opt_text(v: Option<&String>) -> FieldValue {
    v.map_or(FieldValue::Null, |s| FieldValue::Text(s.clone()))
}

fn opt_int(v: Option<i64>) -> FieldValue {
    v.map_or(FieldValue::Null, FieldValue::Integer)
}

fn opt_year(v: Option<i32>) -> FieldValue {
    v.map_or(FieldValue::Null, |y| FieldValue::Integer(i64::from(y)))
}

fn opt_decimal(v: Option<rust_decimal::Decimal>) -> FieldValue {
    v.map_or(FieldValue::Null, FieldValue::Decimal)
}

fn opt_date(v: Option<chrono::NaiveDate>) -> FieldValue {
    v.map_or(FieldValue::Null, FieldValue::Date)
}

static PROFILE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "name",
        display_name: "KVK Name",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => FieldValue::Text(p.name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "org.name",
        display_name: "Host Organization",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => FieldValue::Text(p.org_name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "district.name",
        display_name: "District",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => FieldValue::Text(p.district_name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "state.name",
        display_name: "State",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => FieldValue::Text(p.state_name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "zone.name",
        display_name: "Zone",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => FieldValue::Text(p.zone_name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "establishment_year",
        display_name: "Year of Establishment",
        value_type: ValueType::Integer,
        optional: true,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => opt_year(p.establishment_year),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "address",
        display_name: "Address",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => opt_text(p.address.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "email",
        display_name: "Email",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => opt_text(p.email.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "phone",
        display_name: "Phone",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::KvkProfile(p) => opt_text(p.phone.as_ref()),
            _ => FieldValue::Null,
        },
    },
];

static BANK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "bank_name",
        display_name: "Bank Name",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => FieldValue::Text(b.bank_name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "branch",
        display_name: "Branch",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => opt_text(b.branch.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "account_number",
        display_name: "Account Number",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => FieldValue::Text(b.account_number.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "ifsc",
        display_name: "IFSC",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => opt_text(b.ifsc.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "account_type",
        display_name: "Account Type",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => opt_text(b.account_type.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "balance",
        display_name: "Balance",
        value_type: ValueType::Currency,
        optional: true,
        extract: |r| match r {
            SectionRecord::BankAccount(b) => opt_decimal(b.balance),
            _ => FieldValue::Null,
        },
    },
];

static EMPLOYEE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "name",
        display_name: "Name",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Employee(e) => FieldValue::Text(e.name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "designation",
        display_name: "Designation",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Employee(e) => FieldValue::Text(e.designation.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "discipline",
        display_name: "Discipline",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Employee(e) => opt_text(e.discipline.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "pay_level",
        display_name: "Pay Level",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Employee(e) => opt_text(e.pay_level.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "date_of_joining",
        display_name: "Date of Joining",
        value_type: ValueType::Date,
        optional: true,
        extract: |r| match r {
            SectionRecord::Employee(e) => opt_date(e.date_of_joining),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "date_of_birth",
        display_name: "Date of Birth",
        value_type: ValueType::Date,
        optional: true,
        extract: |r| match r {
            SectionRecord::Employee(e) => opt_date(e.date_of_birth),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "is_permanent",
        display_name: "Permanent",
        value_type: ValueType::Boolean,
        optional: false,
        extract: |r| match r {
            SectionRecord::Employee(e) => FieldValue::Boolean(e.is_permanent),
            _ => FieldValue::Null,
        },
    },
];

static EMPLOYEE_DATES: &[TemporalSpec] = &[
    TemporalSpec {
        source_field: "date_of_joining",
        get: |r| match r {
            SectionRecord::Employee(e) => e.date_of_joining.map(TemporalValue::Date),
            _ => None,
        },
    },
    TemporalSpec {
        source_field: "date_of_birth",
        get: |r| match r {
            SectionRecord::Employee(e) => e.date_of_birth.map(TemporalValue::Date),
            _ => None,
        },
    },
];

static LAND_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "survey_number",
        display_name: "Survey Number",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::LandRecord(l) => FieldValue::Text(l.survey_number.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "land_type",
        display_name: "Land Use",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::LandRecord(l) => FieldValue::Text(l.land_type.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "area_hectares",
        display_name: "Area (ha)",
        value_type: ValueType::Decimal,
        optional: true,
        extract: |r| match r {
            SectionRecord::LandRecord(l) => opt_decimal(l.area_hectares),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "ownership",
        display_name: "Ownership",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::LandRecord(l) => opt_text(l.ownership.as_ref()),
            _ => FieldValue::Null,
        },
    },
];

static BUILDING_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "name",
        display_name: "Building",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Building(b) => FieldValue::Text(b.name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "building_type",
        display_name: "Type",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Building(b) => FieldValue::Text(b.building_type.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "completion_year",
        display_name: "Year of Completion",
        value_type: ValueType::Integer,
        optional: true,
        extract: |r| match r {
            SectionRecord::Building(b) => opt_year(b.completion_year),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "plinth_area_sqm",
        display_name: "Plinth Area (sq m)",
        value_type: ValueType::Decimal,
        optional: true,
        extract: |r| match r {
            SectionRecord::Building(b) => opt_decimal(b.plinth_area_sqm),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "status",
        display_name: "Status",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Building(b) => opt_text(b.status.as_ref()),
            _ => FieldValue::Null,
        },
    },
];

static BUILDING_YEARS: &[TemporalSpec] = &[TemporalSpec {
    source_field: "completion_year",
    get: |r| match r {
        SectionRecord::Building(b) => b.completion_year.map(TemporalValue::Year),
        _ => None,
    },
}];

static VEHICLE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "vehicle_type",
        display_name: "Vehicle Type",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Vehicle(v) => FieldValue::Text(v.vehicle_type.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "registration_number",
        display_name: "Registration Number",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Vehicle(v) => FieldValue::Text(v.registration_number.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "purchase_year",
        display_name: "Year of Purchase",
        value_type: ValueType::Integer,
        optional: true,
        extract: |r| match r {
            SectionRecord::Vehicle(v) => opt_year(v.purchase_year),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "cost",
        display_name: "Cost",
        value_type: ValueType::Currency,
        optional: true,
        extract: |r| match r {
            SectionRecord::Vehicle(v) => opt_decimal(v.cost),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "is_operational",
        display_name: "Running Condition",
        value_type: ValueType::Boolean,
        optional: false,
        extract: |r| match r {
            SectionRecord::Vehicle(v) => FieldValue::Boolean(v.is_operational),
            _ => FieldValue::Null,
        },
    },
];

static VEHICLE_YEARS: &[TemporalSpec] = &[TemporalSpec {
    source_field: "purchase_year",
    get: |r| match r {
        SectionRecord::Vehicle(v) => v.purchase_year.map(TemporalValue::Year),
        _ => None,
    },
}];

static EQUIPMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "name",
        display_name: "Equipment",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Equipment(e) => FieldValue::Text(e.name.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "category",
        display_name: "Category",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Equipment(e) => opt_text(e.category.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "purchase_year",
        display_name: "Year of Purchase",
        value_type: ValueType::Integer,
        optional: true,
        extract: |r| match r {
            SectionRecord::Equipment(e) => opt_year(e.purchase_year),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "cost",
        display_name: "Cost",
        value_type: ValueType::Currency,
        optional: true,
        extract: |r| match r {
            SectionRecord::Equipment(e) => opt_decimal(e.cost),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "is_functional",
        display_name: "Functional",
        value_type: ValueType::Boolean,
        optional: false,
        extract: |r| match r {
            SectionRecord::Equipment(e) => FieldValue::Boolean(e.is_functional),
            _ => FieldValue::Null,
        },
    },
];

static EQUIPMENT_YEARS: &[TemporalSpec] = &[TemporalSpec {
    source_field: "purchase_year",
    get: |r| match r {
        SectionRecord::Equipment(e) => e.purchase_year.map(TemporalValue::Year),
        _ => None,
    },
}];

static TRAINING_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "title",
        display_name: "Title",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Training(t) => FieldValue::Text(t.title.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "thematic_area",
        display_name: "Thematic Area",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Training(t) => opt_text(t.thematic_area.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "start_date",
        display_name: "Start Date",
        value_type: ValueType::Date,
        optional: true,
        extract: |r| match r {
            SectionRecord::Training(t) => opt_date(t.start_date),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "end_date",
        display_name: "End Date",
        value_type: ValueType::Date,
        optional: true,
        extract: |r| match r {
            SectionRecord::Training(t) => opt_date(t.end_date),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "participants",
        display_name: "Participants",
        value_type: ValueType::Integer,
        optional: true,
        extract: |r| match r {
            SectionRecord::Training(t) => opt_int(t.participants),
            _ => FieldValue::Null,
        },
    },
];

static TRAINING_DATES: &[TemporalSpec] = &[TemporalSpec {
    source_field: "start_date",
    get: |r| match r {
        SectionRecord::Training(t) => t.start_date.map(TemporalValue::Date),
        _ => None,
    },
}];

static ACHIEVEMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        source_field: "title",
        display_name: "Title",
        value_type: ValueType::Text,
        optional: false,
        extract: |r| match r {
            SectionRecord::Achievement(a) => FieldValue::Text(a.title.clone()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "description",
        display_name: "Description",
        value_type: ValueType::Text,
        optional: true,
        extract: |r| match r {
            SectionRecord::Achievement(a) => opt_text(a.description.as_ref()),
            _ => FieldValue::Null,
        },
    },
    FieldSpec {
        source_field: "recorded_at",
        display_name: "Recorded On",
        value_type: ValueType::Timestamp,
        optional: true,
        extract: |r| match r {
            SectionRecord::Achievement(a) => {
                a.recorded_at.map_or(FieldValue::Null, FieldValue::Timestamp)
            }
            _ => FieldValue::Null,
        },
    },
];

static ACHIEVEMENT_DATES: &[TemporalSpec] = &[TemporalSpec {
    source_field: "recorded_at",
    get: |r| match r {
        SectionRecord::Achievement(a) => a.recorded_at.map(TemporalValue::Timestamp),
        _ => None,
    },
}];

/// All report sections, in catalog order.
static SECTIONS: &[SectionDescriptor] = &[
    SectionDescriptor {
        id: "1.1",
        title: "KVK Basic Information",
        source: DataSource::KvkProfile,
        format: RenderFormat::Narrative,
        fields: PROFILE_FIELDS,
        temporal: TemporalFields::NONE,
        group_by: None,
    },
    SectionDescriptor {
        id: "1.2",
        title: "Bank Account Details",
        source: DataSource::BankAccounts,
        format: RenderFormat::Table,
        fields: BANK_FIELDS,
        temporal: TemporalFields::NONE,
        group_by: None,
    },
    SectionDescriptor {
        id: "1.3",
        title: "Employee Details",
        source: DataSource::Employees,
        format: RenderFormat::Table,
        fields: EMPLOYEE_FIELDS,
        temporal: TemporalFields {
            date_fields: EMPLOYEE_DATES,
            year_fields: &[],
        },
        group_by: None,
    },
    SectionDescriptor {
        id: "2.1",
        title: "Land Records",
        source: DataSource::LandRecords,
        format: RenderFormat::Table,
        fields: LAND_FIELDS,
        temporal: TemporalFields::NONE,
        group_by: None,
    },
    SectionDescriptor {
        id: "2.2",
        title: "Infrastructure",
        source: DataSource::Buildings,
        format: RenderFormat::Table,
        fields: BUILDING_FIELDS,
        temporal: TemporalFields {
            date_fields: &[],
            year_fields: BUILDING_YEARS,
        },
        group_by: None,
    },
    SectionDescriptor {
        id: "2.3",
        title: "Vehicles",
        source: DataSource::Vehicles,
        format: RenderFormat::GroupedTable,
        fields: VEHICLE_FIELDS,
        temporal: TemporalFields {
            date_fields: &[],
            year_fields: VEHICLE_YEARS,
        },
        group_by: Some(GroupSpec {
            source_field: "purchase_year",
            label: "Year of Purchase",
            key: |r| match r {
                SectionRecord::Vehicle(v) => v
                    .purchase_year
                    .map_or_else(|| "Not Recorded".to_string(), |y| y.to_string()),
                _ => String::new(),
            },
        }),
    },
    SectionDescriptor {
        id: "2.4",
        title: "Equipment",
        source: DataSource::Equipments,
        format: RenderFormat::Table,
        fields: EQUIPMENT_FIELDS,
        temporal: TemporalFields {
            date_fields: &[],
            year_fields: EQUIPMENT_YEARS,
        },
        group_by: None,
    },
    SectionDescriptor {
        id: "3.1",
        title: "Training Programmes",
        source: DataSource::Trainings,
        format: RenderFormat::Table,
        fields: TRAINING_FIELDS,
        temporal: TemporalFields {
            date_fields: TRAINING_DATES,
            year_fields: &[],
        },
        group_by: None,
    },
    SectionDescriptor {
        id: "3.2",
        title: "Salient Achievements",
        source: DataSource::Achievements,
        format: RenderFormat::Table,
        fields: ACHIEVEMENT_FIELDS,
        temporal: TemporalFields {
            date_fields: ACHIEVEMENT_DATES,
            year_fields: &[],
        },
        group_by: None,
    },
];

static INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect()
});

/// Read-only lookup over the static section catalog.
///
/// Safe for unsynchronized concurrent reads; the catalog is immutable for
/// the lifetime of the process.
pub struct Registry;

impl Registry {
    /// Returns every section in catalog order.
    #[must_use]
    pub fn all() -> &'static [SectionDescriptor] {
        SECTIONS
    }

    /// Looks up a section by its dotted id.
    #[must_use]
    pub fn get(id: &str) -> Option<&'static SectionDescriptor> {
        INDEX.get(id).map(|&i| &SECTIONS[i])
    }

    /// Validates a list of requested section ids.
    ///
    /// Returns the matching descriptors in request order (duplicates
    /// collapsed to their first occurrence). Unknown ids are collected and
    /// returned together rather than silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoSectionsRequested` for an empty request and
    /// `ConfigError::UnknownSections` when any id is not in the catalog.
    pub fn validate(ids: &[String]) -> Result<Vec<&'static SectionDescriptor>, ConfigError> {
        if ids.is_empty() {
            return Err(ConfigError::NoSectionsRequested);
        }

        let mut seen = Vec::with_capacity(ids.len());
        let mut descriptors = Vec::with_capacity(ids.len());
        let mut unknown = Vec::new();

        for id in ids {
            if seen.contains(&id.as_str()) {
                continue;
            }
            seen.push(id.as_str());

            match Self::get(id) {
                Some(descriptor) => descriptors.push(descriptor),
                None => unknown.push(id.clone()),
            }
        }

        if unknown.is_empty() {
            Ok(descriptors)
        } else {
            Err(ConfigError::UnknownSections(unknown))
        }
    }
}
