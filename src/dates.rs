use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Serialize, Serializer};

/// How far back funding history is requested.
pub const LOOKBACK_DAYS: i64 = 5 * 365;

/// Width of a single window, in calendar months.
pub const WINDOW_MONTHS: u32 = 6;

/// Timestamp format expected by the `dateFrom`/`dateTo` query arguments.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT00:00:00Z";

/// A half-open funding interval `[from, to)` between two month-end midnights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateWindow {
    pub fn from_param(&self) -> String {
        format_timestamp(&self.from)
    }

    pub fn to_param(&self) -> String {
        format_timestamp(&self.to)
    }
}

pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Serializes a timestamp in window format (`YYYY-MM-DDT00:00:00Z`).
pub fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    format_timestamp(timestamp).serialize(serializer)
}

/// Windows covering the five years before `reference`, oldest first.
///
/// Boundaries fall on month ends six months apart, starting at the end of the
/// month containing `reference - 5 * 365 days` and never passing `reference`.
/// Consecutive windows share a boundary. Returns an empty vec when fewer than
/// two boundaries fit.
pub fn date_windows(reference: DateTime<Utc>) -> Vec<DateWindow> {
    let end = reference.date_naive();
    let start = end - Duration::days(LOOKBACK_DAYS);

    month_end_boundaries(start, end)
        .windows(2)
        .map(|pair| DateWindow {
            from: at_midnight(pair[0]),
            to: at_midnight(pair[1]),
        })
        .collect()
}

/// Windows relative to the current time.
pub fn current_date_windows() -> Vec<DateWindow> {
    date_windows(Utc::now())
}

fn month_end_boundaries(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut boundaries = Vec::new();
    let mut next = end_of_month(start);

    while let Some(boundary) = next.filter(|b| *b <= end) {
        boundaries.push(boundary);
        next = boundary
            .with_day(1)
            .and_then(|first| first.checked_add_months(Months::new(WINDOW_MONTHS)))
            .and_then(end_of_month);
    }

    boundaries
}

fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(end_of_month(date(2024, 2, 3)), Some(date(2024, 2, 29)));
        assert_eq!(end_of_month(date(2023, 2, 28)), Some(date(2023, 2, 28)));
        assert_eq!(end_of_month(date(2023, 12, 1)), Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_windows_for_known_reference() {
        let windows = date_windows(reference());

        assert_eq!(windows.len(), 9);
        assert_eq!(windows[0].from_param(), "2019-06-30T00:00:00Z");
        assert_eq!(windows[0].to_param(), "2019-12-31T00:00:00Z");
        assert_eq!(windows[1].to_param(), "2020-06-30T00:00:00Z");
        assert_eq!(windows[8].from_param(), "2023-06-30T00:00:00Z");
        assert_eq!(windows[8].to_param(), "2023-12-31T00:00:00Z");
    }

    #[test]
    fn test_windows_are_ordered_and_contiguous() {
        let references = [
            reference(),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
            Utc.with_ymd_and_hms(2023, 8, 31, 0, 0, 0).unwrap(),
        ];

        for reference in references {
            let windows = date_windows(reference);
            assert!(!windows.is_empty());

            for window in &windows {
                assert!(window.from < window.to);
                assert_eq!(window.from.time(), NaiveTime::MIN);
            }
            for pair in windows.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }

            let lookback_start = reference - Duration::days(LOOKBACK_DAYS);
            let first = windows.first().unwrap();
            let last = windows.last().unwrap();
            assert!(first.from >= lookback_start - Duration::days(1));
            assert!(first.from <= lookback_start + Duration::days(186));
            assert!(last.to <= reference);
        }
    }

    #[test]
    fn test_boundary_after_reference_is_excluded() {
        // Lookback starts 2019-08-02, so boundaries run Aug/Feb; 2024-08-31 is past the reference.
        let windows = date_windows(Utc.with_ymd_and_hms(2024, 7, 31, 8, 0, 0).unwrap());
        assert_eq!(windows[0].from_param(), "2019-08-31T00:00:00Z");
        assert_eq!(windows[1].from_param(), "2020-02-29T00:00:00Z");
        assert_eq!(windows.last().unwrap().to_param(), "2024-02-29T00:00:00Z");
    }

    #[test]
    fn test_fewer_than_two_boundaries_gives_no_windows() {
        assert!(month_end_boundaries(date(2024, 1, 10), date(2024, 3, 1)).len() < 2);
        assert_eq!(
            month_end_boundaries(date(2024, 1, 10), date(2024, 3, 1))
                .windows(2)
                .count(),
            0
        );
    }
}
