use chrono::TimeZone;
use rust_decimal_macros::dec;

use kendra_shared::types::KvkId;

use super::{build_rows, format_currency, format_value};
use crate::registry::{FieldValue, Registry, ValueType};
use crate::scope::NamedNode;
use crate::testutil;

const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

#[test]
fn test_currency_uses_indian_grouping() {
    assert_eq!(format_currency(dec!(0)), "0.00");
    assert_eq!(format_currency(dec!(123)), "123.00");
    assert_eq!(format_currency(dec!(1000)), "1,000.00");
    assert_eq!(format_currency(dec!(100000)), "1,00,000.00");
    assert_eq!(format_currency(dec!(1234567.5)), "12,34,567.50");
    assert_eq!(format_currency(dec!(987654321.99)), "98,76,54,321.99");
    assert_eq!(format_currency(dec!(-1234567.5)), "-12,34,567.50");
}

#[test]
fn test_format_value_display_rules() {
    let date = chrono::NaiveDate::from_ymd_opt(2020, 6, 1).expect("valid date");
    assert_eq!(
        format_value(&FieldValue::Date(date), ValueType::Date, TZ),
        "01-06-2020"
    );
    assert_eq!(
        format_value(&FieldValue::Boolean(true), ValueType::Boolean, TZ),
        "Yes"
    );
    assert_eq!(
        format_value(&FieldValue::Boolean(false), ValueType::Boolean, TZ),
        "No"
    );
    assert_eq!(format_value(&FieldValue::Null, ValueType::Text, TZ), "-");
    assert_eq!(
        format_value(&FieldValue::Decimal(dec!(12.50)), ValueType::Decimal, TZ),
        "12.5"
    );
    assert_eq!(
        format_value(&FieldValue::Decimal(dec!(12.5)), ValueType::Currency, TZ),
        "12.50"
    );
}

#[test]
fn test_format_timestamp_in_reference_timezone() {
    // 20:00 UTC on Dec 31 renders as 01:30 on Jan 1 in IST.
    let instant = chrono::Utc
        .with_ymd_and_hms(2020, 12, 31, 20, 0, 0)
        .unwrap();
    assert_eq!(
        format_value(&FieldValue::Timestamp(instant), ValueType::Timestamp, TZ),
        "01-01-2021 01:30"
    );
}

#[test]
fn test_build_rows_formats_cells_in_field_order() {
    let kvk = NamedNode::new(KvkId::new(), "KVK Ludhiana".to_string());
    let employees = Registry::get("1.3").expect("section exists");
    let date = chrono::NaiveDate::from_ymd_opt(2020, 6, 1);
    let records = vec![testutil::employee("A. Sharma", date, None)];

    let (rows, warnings) = build_rows(&kvk, &records, employees, TZ);

    assert!(warnings.is_empty());
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.kvk_name, "KVK Ludhiana");
    assert_eq!(row.cells.len(), 7);
    assert_eq!(row.cells[0], "A. Sharma");
    assert_eq!(row.cells[4], "01-06-2020");
    assert_eq!(row.cells[5], "-");
    assert_eq!(row.cells[6], "Yes");
}

#[test]
fn test_build_rows_warns_on_missing_required_fields() {
    // A record from the wrong source extracts null for required fields:
    // the row is kept, each miss is surfaced as a warning.
    let kvk = NamedNode::new(KvkId::new(), "KVK Ludhiana".to_string());
    let employees = Registry::get("1.3").expect("section exists");
    let records = vec![testutil::vehicle("PB-10-1", Some(2018))];

    let (rows, warnings) = build_rows(&kvk, &records, employees, TZ);

    assert_eq!(rows.len(), 1);
    assert!(!warnings.is_empty());
    assert!(warnings[0].contains("missing required field"));
}

#[test]
fn test_build_rows_tags_group_keys() {
    let kvk = NamedNode::new(KvkId::new(), "KVK Ludhiana".to_string());
    let vehicles = Registry::get("2.3").expect("section exists");
    let records = vec![
        testutil::vehicle("PB-10-1", Some(2018)),
        testutil::vehicle("PB-10-2", None),
    ];

    let (rows, _) = build_rows(&kvk, &records, vehicles, TZ);

    assert_eq!(rows[0].group_key.as_deref(), Some("2018"));
    assert_eq!(rows[1].group_key.as_deref(), Some("Not Recorded"));
}
