//! Contribution periods and how daily data is folded into them

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::date_math;

/// Length of one contribution period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// Periods per year, used to annualize period returns
    #[must_use]
    pub fn periods_per_year(self) -> f64 {
        match self {
            Period::Monthly => 12.0,
            Period::Quarterly => 4.0,
            Period::Yearly => 1.0,
        }
    }

    /// Calendar date closing the period that contains `date`.
    ///
    /// Period keys are period-end dates, so every date of one period maps to
    /// the same key.
    #[must_use]
    pub fn period_end(self, date: Date) -> Date {
        match self {
            Period::Monthly => date_math::month_end(date.year(), date.month()),
            Period::Quarterly => {
                let quarter_end_month = ((date.month() - 1) / 3 + 1) * 3;
                date_math::month_end(date.year(), quarter_end_month)
            }
            Period::Yearly => date_math::month_end(date.year(), 12),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        }
    }
}

/// Rule that picks one weight row to represent a whole period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodAggregation {
    /// The weights in force on the last observed day of the period
    #[default]
    Last,
    /// The most frequently observed weights; ties go to the latest observed
    Majority,
}
