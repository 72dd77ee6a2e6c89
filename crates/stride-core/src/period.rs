use crate::error::{Result, StrideError};
use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Utc};

// ---------------------------------------------------------------------------
// MonthWindow
// ---------------------------------------------------------------------------

/// A calendar-month reporting window in a tenant's local time.
///
/// All aggregation is done against the half-open instant range
/// `[start, end)`; calendar bucketing (active days, due-day deadlines) uses
/// the tenant-local date of each instant.
#[derive(Debug, Clone, Copy)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub days: u32,
    offset: FixedOffset,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32, utc_offset_minutes: i32) -> Result<Self> {
        crate::paths::validate_month(month)?;

        let first =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or(StrideError::InvalidMonth(month))?;
        let (ny, nm) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let next_first =
            NaiveDate::from_ymd_opt(ny, nm, 1).ok_or(StrideError::InvalidMonth(month))?;
        let days = (next_first - first).num_days() as u32;

        let offset = FixedOffset::east_opt(utc_offset_minutes * 60)
            .ok_or(StrideError::InvalidUtcOffset(utc_offset_minutes))?;
        let start = local_midnight(first, offset)?;
        let end = local_midnight(next_first, offset)?;

        Ok(Self {
            year,
            month,
            days,
            offset,
            start,
            end,
        })
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }

    /// Whether a calendar date belongs to this month.
    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day.year() == self.year && day.month() == self.month
    }

    /// Tenant-local calendar date of an instant.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// 0-based day-of-month index for bucketing.
    pub fn day_index(&self, day: NaiveDate) -> usize {
        day.day0() as usize
    }

    /// First instant after the due day ends, tenant-local. A completion
    /// strictly before this is on-time.
    pub fn due_deadline(&self, due: NaiveDate) -> Result<DateTime<Utc>> {
        let next = due
            .checked_add_days(Days::new(1))
            .ok_or(StrideError::InvalidMonth(self.month))?;
        local_midnight(next, self.offset)
    }

    /// A month is closed once its last local instant has passed.
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.end <= now
    }

    /// Every calendar date of the month, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        (0..self.days as u64).filter_map(move |i| first.and_then(|f| f.checked_add_days(Days::new(i))))
    }

    /// (year, month) of the preceding calendar month.
    pub fn previous(&self) -> (i32, u32) {
        if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        }
    }
}

fn local_midnight(day: NaiveDate, offset: FixedOffset) -> Result<DateTime<Utc>> {
    let naive = day
        .and_hms_opt(0, 0, 0)
        .ok_or(StrideError::InvalidMonth(day.month()))?;
    let local = naive
        .and_local_timezone(offset)
        .earliest()
        .ok_or(StrideError::InvalidMonth(day.month()))?;
    Ok(local.with_timezone(&Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
