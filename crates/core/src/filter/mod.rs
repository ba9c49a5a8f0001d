//! Temporal filter normalization and matching.
//!
//! Callers supply a loose `{start_date, end_date, year}` shape; each
//! section declares which temporal fields it can be filtered on. The two
//! meet here: [`normalize`] projects the raw input onto the section's
//! declared capabilities, producing a closed [`SectionFilter`] union with
//! exactly one active kind, and [`matches`] evaluates it against a record.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::records::SectionRecord;
use crate::registry::{SectionDescriptor, TemporalSpec, TemporalValue};

#[cfg(test)]
mod tests;

/// Caller-supplied filter, straight off the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReportFilter {
    /// Start of a date range (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// End of a date range (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// A calendar year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl RawReportFilter {
    /// Returns true if no filter input was supplied at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.year.is_none()
    }
}

/// Normalized per-section filter. At most one kind is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionFilter {
    /// No temporal constraint applies to this section.
    None,
    /// Closed date interval.
    DateRange {
        /// Start of the range (inclusive).
        start: NaiveDate,
        /// End of the range (inclusive).
        end: NaiveDate,
    },
    /// One calendar year, `[Jan 1, Dec 31]` in the reference timezone.
    CalendarYear {
        /// The year.
        year: i32,
    },
}

impl From<SectionFilter> for RawReportFilter {
    fn from(filter: SectionFilter) -> Self {
        match filter {
            SectionFilter::None => Self::default(),
            SectionFilter::DateRange { start, end } => Self {
                start_date: Some(start),
                end_date: Some(end),
                year: None,
            },
            SectionFilter::CalendarYear { year } => Self {
                start_date: None,
                end_date: None,
                year: Some(year),
            },
        }
    }
}

/// Projects a raw filter onto a section's declared temporal fields.
///
/// Year wins when the section declares year-filterable fields; a date
/// range applies only when the section declares date-filterable fields; a
/// section declaring neither ignores whatever was supplied. A half-open
/// range is widened to the representable extreme on the missing side.
#[must_use]
pub fn normalize(raw: &RawReportFilter, descriptor: &SectionDescriptor) -> SectionFilter {
    if let Some(year) = raw.year {
        if !descriptor.temporal.year_fields.is_empty() {
            return SectionFilter::CalendarYear { year };
        }
    }

    if (raw.start_date.is_some() || raw.end_date.is_some())
        && !descriptor.temporal.date_fields.is_empty()
    {
        return SectionFilter::DateRange {
            start: raw.start_date.unwrap_or(NaiveDate::MIN),
            end: raw.end_date.unwrap_or(NaiveDate::MAX),
        };
    }

    SectionFilter::None
}

/// Evaluates a normalized filter against a record.
///
/// The predicate is a logical OR across the section's declared temporal
/// fields: a record matches if *any* declared field falls in range. A
/// record with no populated temporal field never matches an active filter.
#[must_use]
pub fn matches(
    record: &SectionRecord,
    descriptor: &SectionDescriptor,
    filter: &SectionFilter,
    tz: Tz,
) -> bool {
    match *filter {
        SectionFilter::None => true,
        SectionFilter::DateRange { start, end } => {
            any_in_range(record, descriptor.temporal.date_fields, start, end, tz)
        }
        SectionFilter::CalendarYear { year } => descriptor.temporal.year_fields.iter().any(|spec| {
            match (spec.get)(record) {
                Some(TemporalValue::Year(y)) => y == year,
                Some(TemporalValue::Date(d)) => {
                    let (Some(start), Some(end)) = year_bounds(year) else {
                        return false;
                    };
                    d >= start && d <= end
                }
                Some(TemporalValue::Timestamp(t)) => {
                    let (Some(start), Some(end)) = year_bounds(year) else {
                        return false;
                    };
                    let (lo, hi) = instant_bounds(start, end, tz);
                    t >= lo && t <= hi
                }
                None => false,
            }
        }),
    }
}

fn any_in_range(
    record: &SectionRecord,
    specs: &[TemporalSpec],
    start: NaiveDate,
    end: NaiveDate,
    tz: Tz,
) -> bool {
    specs.iter().any(|spec| match (spec.get)(record) {
        Some(TemporalValue::Date(d)) => d >= start && d <= end,
        Some(TemporalValue::Timestamp(t)) => {
            let (lo, hi) = instant_bounds(start, end, tz);
            t >= lo && t <= hi
        }
        // Bare years are not comparable against a date interval.
        Some(TemporalValue::Year(_)) | None => false,
    })
}

/// The closed `[Jan 1, Dec 31]` interval of a calendar year.
fn year_bounds(year: i32) -> (Option<NaiveDate>, Option<NaiveDate>) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    )
}

/// Converts a civil-date interval into instant bounds in the reference
/// timezone: start-of-day on the first date to end-of-day on the last.
fn instant_bounds(start: NaiveDate, end: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let lo = local_instant(start.and_time(NaiveTime::MIN), tz);
    let hi = local_instant(
        end.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)),
        tz,
    );
    (lo, hi)
}

fn local_instant(local: chrono::NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&local)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&local), |dt| dt.with_timezone(&Utc))
}
