use crate::design::PvSystemDesign;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PvSizingError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Error identified during PV system calculation: {0}")]
    FailureInCalculation(#[from] EngineError),
    /// The design could only be partly computed. Quantities that do not depend on the failed
    /// one are still present in `design` and have been written out.
    #[error("PV system design is incomplete: {source}")]
    IncompleteDesign {
        design: Box<PvSystemDesign>,
        source: EngineError,
    },
    #[error("Error writing out results: {0}")]
    OutputFailure(anyhow::Error),
}

/// Failures raised by the sizing engine itself. Each one halts the derived quantity it was
/// raised for; nothing is clamped or defaulted.
#[derive(Clone, Debug, Error, PartialEq, Serialize)]
pub enum EngineError {
    #[error("Location '{location}' is not present in the irradiance table")]
    UnknownLocation { location: String },
    #[error("Minimum monthly yield of {min_monthly_yield} kWh/day per panel is not positive, so the array cannot be sized")]
    DegenerateYield { min_monthly_yield: f64 },
    #[error("Parameter '{name}' must be greater than zero, but was {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Value of '{name}' ({value}) exceeds the supported maximum of {maximum}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        maximum: f64,
    },
}

impl EngineError {
    pub(crate) fn unknown_location(location: &str) -> Self {
        Self::UnknownLocation {
            location: location.to_string(),
        }
    }

    /// Returns the value back if it is a usable (strictly positive) divisor.
    pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_nan() || value <= 0. {
            return Err(Self::InvalidParameter { name, value });
        }

        Ok(value)
    }

    pub(crate) fn require_at_most(
        name: &'static str,
        value: f64,
        maximum: f64,
    ) -> Result<f64, Self> {
        if value.is_nan() || value > maximum {
            return Err(Self::OutOfRange {
                name,
                value,
                maximum,
            });
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(0.)]
    #[case(-12.)]
    #[case(f64::NAN)]
    fn should_reject_non_positive_divisor(#[case] value: f64) {
        assert!(matches!(
            EngineError::require_positive("battery_voltage", value),
            Err(EngineError::InvalidParameter {
                name: "battery_voltage",
                ..
            })
        ));
    }

    #[rstest]
    fn should_pass_through_positive_divisor() {
        assert_eq!(EngineError::require_positive("battery_voltage", 12.), Ok(12.));
    }

    #[rstest]
    #[case(101.)]
    #[case(f64::NAN)]
    fn should_reject_value_above_maximum(#[case] value: f64) {
        assert!(matches!(
            EngineError::require_at_most("cost_projection_years", value, 100.),
            Err(EngineError::OutOfRange {
                name: "cost_projection_years",
                ..
            })
        ));
    }

    #[rstest]
    fn should_pass_through_value_at_maximum() {
        assert_eq!(
            EngineError::require_at_most("cost_projection_years", 100., 100.),
            Ok(100.)
        );
    }

    #[rstest]
    fn should_name_location_in_message() {
        assert_eq!(
            EngineError::unknown_location("Atlantis").to_string(),
            "Location 'Atlantis' is not present in the irradiance table"
        );
    }
}
