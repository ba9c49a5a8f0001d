use kendra_shared::types::KvkId;

use super::catalog::Registry;
use super::descriptor::RenderFormat;
use super::error::ConfigError;
use crate::records::{DataSource, SectionRecord};
use crate::testutil;

fn full_record_for(source: DataSource) -> SectionRecord {
    let date = chrono::NaiveDate::from_ymd_opt(2020, 6, 1);
    let instant = chrono::DateTime::from_timestamp(1_600_000_000, 0);
    match source {
        DataSource::KvkProfile => testutil::profile(KvkId::new(), "KVK Ludhiana"),
        DataSource::BankAccounts => testutil::bank_account("State Bank of India"),
        DataSource::Employees => testutil::employee("A. Sharma", date, date),
        DataSource::LandRecords => testutil::land_record("128/2"),
        DataSource::Buildings => testutil::building("Admin Block", Some(2005)),
        DataSource::Vehicles => testutil::vehicle("PB-10-1234", Some(2018)),
        DataSource::Equipments => testutil::equipment("Seed Drill", Some(2019)),
        DataSource::Trainings => testutil::training("IPM for Paddy", date),
        DataSource::Achievements => testutil::achievement("Best KVK Award", instant),
    }
}

#[test]
fn test_section_ids_are_unique_and_dotted() {
    let mut seen = std::collections::HashSet::new();
    for section in Registry::all() {
        assert!(seen.insert(section.id), "duplicate section id {}", section.id);
        assert!(
            section.id.split('.').count() == 2
                && section.id.split('.').all(|part| part.parse::<u32>().is_ok()),
            "section id {} is not dotted",
            section.id
        );
    }
}

#[test]
fn test_group_by_present_iff_grouped_table() {
    for section in Registry::all() {
        assert_eq!(
            section.group_by.is_some(),
            section.format == RenderFormat::GroupedTable,
            "section {} group_by/format mismatch",
            section.id
        );
    }
}

#[test]
fn test_required_fields_extract_values_from_full_records() {
    for section in Registry::all() {
        let record = full_record_for(section.source);
        for field in section.fields {
            let value = (field.extract)(&record);
            if !field.optional {
                assert!(
                    !value.is_null(),
                    "section {} required field {} extracted null",
                    section.id,
                    field.source_field
                );
            }
        }
    }
}

#[test]
fn test_temporal_accessors_read_their_own_source() {
    for section in Registry::all() {
        let record = full_record_for(section.source);
        for spec in section
            .temporal
            .date_fields
            .iter()
            .chain(section.temporal.year_fields)
        {
            assert!(
                (spec.get)(&record).is_some(),
                "section {} temporal field {} returned nothing for a full record",
                section.id,
                spec.source_field
            );
        }
    }
}

#[test]
fn test_get_known_section() {
    let section = Registry::get("1.3").expect("section 1.3 exists");
    assert_eq!(section.title, "Employee Details");
    assert_eq!(section.source, DataSource::Employees);
}

#[test]
fn test_get_unknown_section() {
    assert!(Registry::get("9.9").is_none());
}

#[test]
fn test_validate_collects_all_unknown_ids() {
    let err = Registry::validate(&[
        "1.3".to_string(),
        "9.9".to_string(),
        "8.8".to_string(),
    ])
    .unwrap_err();

    match err {
        ConfigError::UnknownSections(ids) => {
            assert_eq!(ids, vec!["9.9".to_string(), "8.8".to_string()]);
        }
        ConfigError::NoSectionsRequested => panic!("wrong error variant"),
    }
}

#[test]
fn test_validate_empty_request() {
    assert!(matches!(
        Registry::validate(&[]),
        Err(ConfigError::NoSectionsRequested)
    ));
}

#[test]
fn test_validate_dedupes_preserving_order() {
    let sections = Registry::validate(&[
        "2.3".to_string(),
        "1.1".to_string(),
        "2.3".to_string(),
    ])
    .expect("all ids known");

    let ids: Vec<&str> = sections.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["2.3", "1.1"]);
}

#[test]
fn test_config_view_exposes_filterable_fields() {
    let config = Registry::get("1.3").expect("section 1.3 exists").config();
    assert_eq!(
        config.date_fields,
        vec!["date_of_joining".to_string(), "date_of_birth".to_string()]
    );
    assert!(config.year_fields.is_empty());
    assert_eq!(config.fields.len(), 7);
}
