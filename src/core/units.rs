use serde::{Deserialize, Serialize};
use serde_valid::Validate;

pub const WATT_HOURS_PER_KILOWATT_HOUR: u32 = 1_000;
pub const GRAMS_PER_KILOGRAM: u32 = 1_000;
pub const PERCENT_PER_UNIT: f64 = 100.;
pub const MONTHS_PER_YEAR: usize = 12;
pub const DAYS_PER_YEAR: u32 = 365;
// non-leap year
pub const DAYS_IN_MONTH: [u32; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub(crate) fn average_monthly_to_annual(list_monthly_averages: [f64; MONTHS_PER_YEAR]) -> f64 {
    list_monthly_averages
        .iter()
        .enumerate()
        .map(|(month_idx, month_ave)| month_ave * DAYS_IN_MONTH[month_idx] as f64)
        .sum::<f64>()
        / DAYS_IN_MONTH.iter().sum::<u32>() as f64
}

/// Converts a rate given in percent (which may be negative, e.g. deflation) into a fraction.
pub fn percent_to_fraction(percent: f64) -> f64 {
    percent / PERCENT_PER_UNIT
}

/// A percentage in the closed range [0, 100], as entered for efficiencies and depth of discharge.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, PartialOrd, Serialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(transparent)]
#[repr(transparent)]
pub struct Percentage(
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub(crate) f64,
);

impl Percentage {
    pub fn as_fraction(&self) -> f64 {
        percent_to_fraction(self.0)
    }
}
