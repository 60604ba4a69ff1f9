//! The period a statistics view covers.

use std::fmt::Display;

use time::{Date, Month};

/// A calendar month or a whole calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// A single month of a year.
    Month {
        /// The calendar year.
        year: i32,
        /// The month of the year.
        month: Month,
    },
    /// A full calendar year.
    Year(i32),
}

impl Period {
    /// The month containing `date`.
    pub fn month_of(date: Date) -> Self {
        Period::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The year containing `date`.
    pub fn year_of(date: Date) -> Self {
        Period::Year(date.year())
    }

    /// The calendar year the period falls in.
    pub fn year(self) -> i32 {
        match self {
            Period::Month { year, .. } | Period::Year(year) => year,
        }
    }

    /// Whether `date` falls within the period.
    pub fn contains(self, date: Date) -> bool {
        match self {
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year(year) => date.year() == year,
        }
    }

    /// The period immediately before this one.
    ///
    /// The month before January is December of the previous year.
    pub fn previous(self) -> Self {
        match self {
            Period::Month {
                year,
                month: Month::January,
            } => Period::Month {
                year: year - 1,
                month: Month::December,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month.previous(),
            },
            Period::Year(year) => Period::Year(year - 1),
        }
    }

    /// The period immediately after this one.
    ///
    /// The month after December is January of the next year.
    pub fn next(self) -> Self {
        match self {
            Period::Month {
                year,
                month: Month::December,
            } => Period::Month {
                year: year + 1,
                month: Month::January,
            },
            Period::Month { year, month } => Period::Month {
                year,
                month: month.next(),
            },
            Period::Year(year) => Period::Year(year + 1),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{year}-{:02}", *month as u8),
            Period::Year(year) => write!(f, "{year}"),
        }
    }
}
