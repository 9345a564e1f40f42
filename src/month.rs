//! Fiscal month domain.
//!
//! The fiscal year runs April through March. [`MonthCode`] variants are
//! declared in that order, so the derived `Ord` is fiscal order and the
//! discriminant is the 0-based fiscal index.

use crate::error::{PivotError, Result};
use chrono::{Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum MonthCode {
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
    Jan,
    Feb,
    Mar,
}

pub const MONTHS_PER_YEAR: usize = 12;

pub const FISCAL_ORDER: [MonthCode; MONTHS_PER_YEAR] = [
    MonthCode::Apr,
    MonthCode::May,
    MonthCode::Jun,
    MonthCode::Jul,
    MonthCode::Aug,
    MonthCode::Sep,
    MonthCode::Oct,
    MonthCode::Nov,
    MonthCode::Dec,
    MonthCode::Jan,
    MonthCode::Feb,
    MonthCode::Mar,
];

/// Calendar month number of the first fiscal month (April).
const FISCAL_START_CALENDAR_MONTH: u32 = 4;

impl MonthCode {
    pub fn as_str(self) -> &'static str {
        match self {
            MonthCode::Apr => "Apr",
            MonthCode::May => "May",
            MonthCode::Jun => "Jun",
            MonthCode::Jul => "Jul",
            MonthCode::Aug => "Aug",
            MonthCode::Sep => "Sep",
            MonthCode::Oct => "Oct",
            MonthCode::Nov => "Nov",
            MonthCode::Dec => "Dec",
            MonthCode::Jan => "Jan",
            MonthCode::Feb => "Feb",
            MonthCode::Mar => "Mar",
        }
    }

    /// 0-based position within the fiscal year (Apr = 0, Mar = 11).
    pub fn fiscal_index(self) -> usize {
        self as usize
    }

    /// Calendar month number (Jan = 1, Dec = 12).
    pub fn calendar_month(self) -> u32 {
        let idx = self.fiscal_index() as u32;
        (idx + FISCAL_START_CALENDAR_MONTH - 1) % 12 + 1
    }

    pub fn from_calendar_month(month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let idx = (month + 12 - FISCAL_START_CALENDAR_MONTH) % 12;
        Some(FISCAL_ORDER[idx as usize])
    }

    pub fn from_date(date: NaiveDate) -> Self {
        // month() is always 1..=12
        let idx = (date.month() + 12 - FISCAL_START_CALENDAR_MONTH) % 12;
        FISCAL_ORDER[idx as usize]
    }

    pub fn to_chrono(self) -> chrono::Month {
        match self {
            MonthCode::Apr => chrono::Month::April,
            MonthCode::May => chrono::Month::May,
            MonthCode::Jun => chrono::Month::June,
            MonthCode::Jul => chrono::Month::July,
            MonthCode::Aug => chrono::Month::August,
            MonthCode::Sep => chrono::Month::September,
            MonthCode::Oct => chrono::Month::October,
            MonthCode::Nov => chrono::Month::November,
            MonthCode::Dec => chrono::Month::December,
            MonthCode::Jan => chrono::Month::January,
            MonthCode::Feb => chrono::Month::February,
            MonthCode::Mar => chrono::Month::March,
        }
    }

    /// Months from the fiscal year start up to and including `self`.
    pub fn prefix_through(self) -> &'static [MonthCode] {
        prefix_through(self)
    }
}

impl From<chrono::Month> for MonthCode {
    fn from(month: chrono::Month) -> Self {
        let idx = (month.number_from_month() + 12 - FISCAL_START_CALENDAR_MONTH) % 12;
        FISCAL_ORDER[idx as usize]
    }
}

impl fmt::Display for MonthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MonthCode {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        FISCAL_ORDER
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| PivotError::UnknownMonth(s.to_string()))
    }
}

pub fn index_of(month: MonthCode) -> usize {
    month.fiscal_index()
}

pub fn prefix_through(month: MonthCode) -> &'static [MonthCode] {
    &FISCAL_ORDER[..=month.fiscal_index()]
}

/// Fiscal-order slice `[start, end)`.
pub fn slice(start: usize, end: usize) -> Result<&'static [MonthCode]> {
    if start > end || end > MONTHS_PER_YEAR {
        return Err(PivotError::InvalidMonthRange { start, end });
    }
    Ok(&FISCAL_ORDER[start..end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    pub fn months(self) -> &'static [MonthCode] {
        let start = self as usize * 3;
        &FISCAL_ORDER[start..start + 3]
    }

    pub fn containing(month: MonthCode) -> Self {
        Self::ALL[month.fiscal_index() / 3]
    }

    pub fn label(self) -> String {
        let months = self.months();
        format!("{:?} ({}–{})", self, months[0], months[2])
    }
}

/// A single April–March fiscal year, identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FiscalYear {
    pub start_year: i32,
}

impl FiscalYear {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    pub fn containing(date: NaiveDate) -> Self {
        if date.month() >= FISCAL_START_CALENDAR_MONTH {
            Self::new(date.year())
        } else {
            Self::new(date.year() - 1)
        }
    }

    pub fn calendar_year(&self, month: MonthCode) -> i32 {
        if month.calendar_month() >= FISCAL_START_CALENDAR_MONTH {
            self.start_year
        } else {
            self.start_year + 1
        }
    }

    /// Last calendar day of `month` within this fiscal year.
    pub fn month_end(&self, month: MonthCode) -> Result<NaiveDate> {
        last_day_of_month(self.calendar_year(month), month.calendar_month()).ok_or_else(|| {
            PivotError::InvalidFiscalYear(format!(
                "no month end for {} in FY starting {}",
                month, self.start_year
            ))
        })
    }

    /// Two-digit table suffix, e.g. `25_26` for the year starting April 2025.
    pub fn suffix(&self) -> String {
        format!(
            "{:02}_{:02}",
            self.start_year.rem_euclid(100),
            (self.start_year + 1).rem_euclid(100)
        )
    }

    pub fn from_suffix(suffix: &str) -> Result<Self> {
        let invalid = || {
            PivotError::InvalidFiscalYear(format!(
                "'{}' is not a suffix like 25_26",
                suffix
            ))
        };

        let (start, end) = suffix.trim().split_once('_').ok_or_else(invalid)?;
        if start.len() != 2 || end.len() != 2 {
            return Err(invalid());
        }
        let start: i32 = start.parse().map_err(|_| invalid())?;
        let end: i32 = end.parse().map_err(|_| invalid())?;

        if (start + 1) % 100 != end {
            return Err(PivotError::InvalidFiscalYear(format!(
                "'{}' does not span consecutive years",
                suffix
            )));
        }

        Ok(Self::new(2000 + start))
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.checked_sub_days(Days::new(1))
}
