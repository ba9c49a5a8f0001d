use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use super::{RawReportFilter, SectionFilter, matches, normalize};
use crate::records::SectionRecord;
use crate::registry::{
    Registry, SectionDescriptor, TemporalFields, TemporalSpec, TemporalValue,
};
use crate::testutil;

const TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn raw(start: Option<NaiveDate>, end: Option<NaiveDate>, year: Option<i32>) -> RawReportFilter {
    RawReportFilter {
        start_date: start,
        end_date: end,
        year,
    }
}

#[test]
fn test_normalize_date_range_on_date_filterable_section() {
    let employees = Registry::get("1.3").expect("section exists");
    let filter = normalize(
        &raw(Some(date(2020, 1, 1)), Some(date(2020, 12, 31)), None),
        employees,
    );
    assert_eq!(
        filter,
        SectionFilter::DateRange {
            start: date(2020, 1, 1),
            end: date(2020, 12, 31),
        }
    );
}

#[test]
fn test_normalize_widens_half_open_range() {
    let employees = Registry::get("1.3").expect("section exists");
    let filter = normalize(&raw(Some(date(2020, 1, 1)), None, None), employees);
    assert_eq!(
        filter,
        SectionFilter::DateRange {
            start: date(2020, 1, 1),
            end: NaiveDate::MAX,
        }
    );
}

#[test]
fn test_normalize_year_on_year_filterable_section() {
    let vehicles = Registry::get("2.3").expect("section exists");
    let filter = normalize(&raw(None, None, Some(2018)), vehicles);
    assert_eq!(filter, SectionFilter::CalendarYear { year: 2018 });
}

#[test]
fn test_normalize_ignores_filter_on_unfilterable_section() {
    let bank = Registry::get("1.2").expect("section exists");
    let filter = normalize(
        &raw(Some(date(2020, 1, 1)), Some(date(2020, 12, 31)), Some(2020)),
        bank,
    );
    assert_eq!(filter, SectionFilter::None);
}

#[test]
fn test_normalize_year_ignored_without_year_fields() {
    // Employees declare only date fields; a bare year produces no filter.
    let employees = Registry::get("1.3").expect("section exists");
    let filter = normalize(&raw(None, None, Some(2020)), employees);
    assert_eq!(filter, SectionFilter::None);
}

// A section declaring BOTH date and year fields, to pin the precedence
// decision: year wins when both kinds of input are supplied.
static BOTH_DATES: &[TemporalSpec] = &[TemporalSpec {
    source_field: "date_of_joining",
    get: |r| match r {
        SectionRecord::Employee(e) => e.date_of_joining.map(TemporalValue::Date),
        _ => None,
    },
}];
static BOTH_YEARS: &[TemporalSpec] = &[TemporalSpec {
    source_field: "date_of_joining",
    get: |r| match r {
        SectionRecord::Employee(e) => e.date_of_joining.map(TemporalValue::Date),
        _ => None,
    },
}];

fn both_kinds_descriptor() -> SectionDescriptor {
    let base = Registry::get("1.3").expect("section exists");
    SectionDescriptor {
        temporal: TemporalFields {
            date_fields: BOTH_DATES,
            year_fields: BOTH_YEARS,
        },
        ..base.clone()
    }
}

#[test]
fn test_year_takes_precedence_when_both_declared_and_supplied() {
    let descriptor = both_kinds_descriptor();
    let filter = normalize(
        &raw(Some(date(2019, 1, 1)), Some(date(2019, 12, 31)), Some(2020)),
        &descriptor,
    );
    assert_eq!(filter, SectionFilter::CalendarYear { year: 2020 });

    // The year interval is evaluated against the date-valued accessor.
    let joined_2020 = testutil::employee("A", Some(date(2020, 6, 1)), None);
    let joined_2019 = testutil::employee("B", Some(date(2019, 6, 1)), None);
    assert!(matches(&joined_2020, &descriptor, &filter, TZ));
    assert!(!matches(&joined_2019, &descriptor, &filter, TZ));
}

#[test]
fn test_date_range_or_semantics_across_declared_fields() {
    let employees = Registry::get("1.3").expect("section exists");
    let filter = SectionFilter::DateRange {
        start: date(2020, 1, 1),
        end: date(2020, 12, 31),
    };

    // Joined inside the range.
    let by_joining = testutil::employee("A", Some(date(2020, 6, 1)), Some(date(1985, 2, 1)));
    // Joined outside the range but born inside it.
    let by_birth = testutil::employee("B", Some(date(2019, 3, 1)), Some(date(2020, 3, 1)));
    // Neither field in range.
    let neither = testutil::employee("C", Some(date(2019, 3, 1)), Some(date(1985, 2, 1)));
    // No temporal field populated at all.
    let unpopulated = testutil::employee("D", None, None);

    assert!(matches(&by_joining, employees, &filter, TZ));
    assert!(matches(&by_birth, employees, &filter, TZ));
    assert!(!matches(&neither, employees, &filter, TZ));
    assert!(!matches(&unpopulated, employees, &filter, TZ));
}

#[test]
fn test_calendar_year_matches_bare_year_fields() {
    let vehicles = Registry::get("2.3").expect("section exists");
    let filter = SectionFilter::CalendarYear { year: 2018 };

    assert!(matches(&testutil::vehicle("PB-10-1", Some(2018)), vehicles, &filter, TZ));
    assert!(!matches(&testutil::vehicle("PB-10-2", Some(2019)), vehicles, &filter, TZ));
    assert!(!matches(&testutil::vehicle("PB-10-3", None), vehicles, &filter, TZ));
}

#[test]
fn test_timestamp_bounds_use_reference_timezone() {
    let achievements = Registry::get("3.2").expect("section exists");
    let filter = SectionFilter::DateRange {
        start: date(2020, 1, 1),
        end: date(2020, 12, 31),
    };

    // 20:00 UTC on Dec 31 is already Jan 1 in IST (+05:30).
    let late = testutil::achievement(
        "Late",
        Some(Utc.with_ymd_and_hms(2020, 12, 31, 20, 0, 0).unwrap()),
    );
    // 10:00 UTC on Dec 31 is still Dec 31 in IST.
    let inside = testutil::achievement(
        "Inside",
        Some(Utc.with_ymd_and_hms(2020, 12, 31, 10, 0, 0).unwrap()),
    );

    assert!(!matches(&late, achievements, &filter, TZ));
    assert!(matches(&inside, achievements, &filter, TZ));
}

#[test]
fn test_no_filter_matches_everything() {
    let employees = Registry::get("1.3").expect("section exists");
    let record = testutil::employee("A", None, None);
    assert!(matches(&record, employees, &SectionFilter::None, TZ));
}

proptest! {
    /// Normalization is a projection: applying it to its own output (read
    /// back as a raw filter) yields the same normalized filter.
    #[test]
    fn test_normalize_is_idempotent(
        start_offset in proptest::option::of(0i64..20_000),
        end_offset in proptest::option::of(0i64..20_000),
        year in proptest::option::of(1990i32..2030),
        section_index in 0usize..Registry::all().len(),
    ) {
        let epoch = date(1990, 1, 1);
        let raw_filter = RawReportFilter {
            start_date: start_offset.map(|o| epoch + chrono::Duration::days(o)),
            end_date: end_offset.map(|o| epoch + chrono::Duration::days(o)),
            year,
        };
        let descriptor = &Registry::all()[section_index];

        let once = normalize(&raw_filter, descriptor);
        let twice = normalize(&RawReportFilter::from(once), descriptor);
        prop_assert_eq!(once, twice);
    }
}
