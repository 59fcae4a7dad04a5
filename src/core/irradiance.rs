//! This module contains the long-term average daily global horizontal irradiance (GHI) data
//! that every yield estimate starts from.

use crate::errors::EngineError;
use indexmap::IndexMap;
use lazy_static::lazy_static;

/// Immutable lookup from location name to average daily GHI in kWh/m² per day.
#[derive(Clone, Debug, PartialEq)]
pub struct IrradianceTable {
    by_location: IndexMap<&'static str, f64>,
}

impl IrradianceTable {
    pub fn new(entries: impl IntoIterator<Item = (&'static str, f64)>) -> Self {
        Self {
            by_location: entries.into_iter().collect(),
        }
    }

    /// Average daily irradiance for the location, in kWh/m² per day.
    /// An unknown location is an error rather than falling back to any default.
    pub fn irradiance(&self, location: &str) -> Result<f64, EngineError> {
        self.by_location
            .get(location)
            .copied()
            .ok_or_else(|| EngineError::unknown_location(location))
    }

    /// Location names in table order, e.g. for offering as a fixed selection list.
    pub fn locations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_location.keys().copied()
    }
}

lazy_static! {
    /// GHI of the Nigerian states (and FCT) from a 22-year NASA climatology average.
    pub static ref NIGERIA_STATES_GHI: IrradianceTable = IrradianceTable::new([
        ("Abia", 4.71),
        ("Adamawa", 5.70),
        ("Akwa Ibom", 4.21),
        ("Anambra", 4.81),
        ("Bauchi", 5.77),
        ("Bayelsa", 4.88),
        ("Benue", 5.19),
        ("Borno", 5.90),
        ("Cross River", 4.74),
        ("Delta", 4.53),
        ("Ebonyi", 5.05),
        ("Edo", 4.66),
        ("Ekiti", 4.94),
        ("Enugu", 4.92),
        ("FCT", 5.45),
        ("Gombe", 5.77),
        ("Imo", 4.71),
        ("Jigawa", 6.16),
        ("Kaduna", 5.64),
        ("Kano", 5.87),
        ("Katsina", 5.94),
        ("Kebbi", 5.62),
        ("Kogi", 5.40),
        ("Kwara", 5.16),
        ("Lagos", 4.74),
        ("Nassarawa", 5.36),
        ("Niger", 5.51),
        ("Ogun", 4.74),
        ("Ondo", 4.66),
        ("Osun", 4.89),
        ("Oyo", 5.11),
        ("Plateau", 5.52),
        ("Rivers", 4.13),
        ("Sokoto", 6.24),
        ("Taraba", 5.53),
        ("Yobe", 6.11),
        ("Zamfara", 6.01),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("Lagos", 4.74)]
    #[case("Sokoto", 6.24)]
    #[case("Rivers", 4.13)]
    #[case("Akwa Ibom", 4.21)]
    fn should_look_up_irradiance_for_state(#[case] location: &str, #[case] expected: f64) {
        assert_eq!(NIGERIA_STATES_GHI.irradiance(location).unwrap(), expected);
    }

    #[rstest]
    #[case("Atlantis")]
    #[case("lagos")]
    #[case("")]
    fn should_fail_for_unknown_location(#[case] location: &str) {
        assert_eq!(
            NIGERIA_STATES_GHI.irradiance(location),
            Err(EngineError::UnknownLocation {
                location: location.to_string()
            })
        );
    }

    #[rstest]
    fn should_list_locations_in_table_order() {
        let locations: Vec<_> = NIGERIA_STATES_GHI.locations().collect();
        assert_eq!(locations.len(), 37);
        assert_eq!(locations.first(), Some(&"Abia"));
        assert_eq!(locations.last(), Some(&"Zamfara"));
        assert!(locations.contains(&"FCT"));
    }
}
