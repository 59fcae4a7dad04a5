use crate::core::units::{DAYS_IN_MONTH, MONTHS_PER_YEAR};
use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Calendar month. The declaration order (January first) is the order in which every
/// monthly series in this crate is laid out.
#[derive(
    Clone, Copy, Debug, Display, EnumCount, EnumIter, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize,
)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

const _: () = assert!(Month::COUNT == MONTHS_PER_YEAR);

impl Month {
    /// Zero-based position of the month within a monthly series.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn days(self) -> u32 {
        DAYS_IN_MONTH[self.index()]
    }
}

/// Dimensionless month-by-month variation applied to a location's average irradiance.
/// The same profile is applied to every location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeasonalProfile {
    factors: [f64; MONTHS_PER_YEAR],
}

impl SeasonalProfile {
    pub const fn new(factors: [f64; MONTHS_PER_YEAR]) -> Self {
        Self { factors }
    }

    pub fn factor(&self, month: Month) -> f64 {
        self.factors[month.index()]
    }

    pub fn factors(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.factors
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        Month::iter().map(|month| (month, self.factor(month)))
    }
}

pub const MONTHLY_VARIATION_FACTORS: SeasonalProfile = SeasonalProfile::new([
    1.2, // January
    1.1, // February
    1.0, // March
    0.8, // April
    0.7, // May
    0.6, // June
    0.5, // July
    0.5, // August
    0.6, // September
    0.8, // October
    1.0, // November
    1.1, // December
]);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_iterate_months_january_to_december() {
        let months: Vec<Month> = Month::iter().collect();
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month::January);
        assert_eq!(months[11], Month::December);
        assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    #[case(Month::January, 1.2)]
    #[case(Month::July, 0.5)]
    #[case(Month::December, 1.1)]
    fn should_give_variation_factor_for_month(#[case] month: Month, #[case] expected: f64) {
        assert_eq!(MONTHLY_VARIATION_FACTORS.factor(month), expected);
    }

    #[rstest]
    fn should_keep_factors_within_expected_range() {
        assert!(MONTHLY_VARIATION_FACTORS
            .iter()
            .all(|(_, factor)| factor > 0. && factor <= 1.5));
    }

    #[rstest]
    fn should_display_month_name() {
        assert_eq!(Month::September.to_string(), "September");
        assert_eq!(Month::February.days(), 28);
    }
}
