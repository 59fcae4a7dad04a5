//! This module estimates the daily energy yield of a single PV panel for each month of the year.

use crate::compare_floats::{max_of_slice, min_of_slice};
use crate::core::irradiance::{IrradianceTable, NIGERIA_STATES_GHI};
use crate::core::seasonal::{Month, SeasonalProfile, MONTHLY_VARIATION_FACTORS};
use crate::core::units::{average_monthly_to_annual, MONTHS_PER_YEAR};
use crate::errors::EngineError;
use serde::Serialize;
use strum::IntoEnumIterator;

/// Physical description of one panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PanelSpec {
    /// in m
    pub length: f64,
    /// in m
    pub width: f64,
    /// conversion efficiency as a fraction (0 to 1)
    pub efficiency: f64,
}

impl PanelSpec {
    pub fn new(length: f64, width: f64, efficiency: f64) -> Self {
        Self {
            length,
            width,
            efficiency,
        }
    }

    /// in m²
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Daily yield of one panel (kWh/day) for each month, January first.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyYieldProfile([f64; MONTHS_PER_YEAR]);

impl MonthlyYieldProfile {
    pub fn new(values: [f64; MONTHS_PER_YEAR]) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64; MONTHS_PER_YEAR] {
        &self.0
    }

    pub fn for_month(&self, month: Month) -> f64 {
        self.0[month.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, f64)> + '_ {
        Month::iter().map(|month| (month, self.for_month(month)))
    }

    /// The worst month's daily yield, which is what the array has to be sized against.
    pub fn minimum(&self) -> f64 {
        min_of_slice(&self.0).unwrap_or_default()
    }

    pub fn maximum(&self) -> f64 {
        max_of_slice(&self.0).unwrap_or_default()
    }

    /// The month with the lowest yield (the earliest, if several tie).
    pub fn worst_month(&self) -> Month {
        let minimum = self.minimum();
        self.iter()
            .find(|(_, value)| *value == minimum)
            .map_or(Month::January, |(month, _)| month)
    }

    /// Average daily yield across the year, weighting each month by its number of days.
    pub fn annual_average(&self) -> f64 {
        average_monthly_to_annual(self.0)
    }
}

/// Combines an irradiance table and a seasonal profile into per-panel monthly yields.
#[derive(Clone, Copy, Debug)]
pub struct YieldEstimator<'a> {
    irradiance: &'a IrradianceTable,
    seasonal_profile: &'a SeasonalProfile,
}

impl<'a> YieldEstimator<'a> {
    pub fn new(irradiance: &'a IrradianceTable, seasonal_profile: &'a SeasonalProfile) -> Self {
        Self {
            irradiance,
            seasonal_profile,
        }
    }

    /// Estimate the daily yield of one panel at the given location for each month.
    ///
    /// Arguments:
    /// * `location` - a key of the irradiance table
    /// * `panel` - panel dimensions and efficiency; a zero area or efficiency yields zeros
    /// * `inverter_efficiency` - fraction (0 to 1) of DC output delivered as AC
    pub fn estimate(
        &self,
        location: &str,
        panel: &PanelSpec,
        inverter_efficiency: f64,
    ) -> Result<MonthlyYieldProfile, EngineError> {
        let ghi = self.irradiance.irradiance(location)?;
        let daily_yield_before_seasonality =
            ghi * panel.area() * panel.efficiency * inverter_efficiency;

        Ok(MonthlyYieldProfile(self.seasonal_profile.factors().map(
            |factor| daily_yield_before_seasonality * factor,
        )))
    }
}

impl Default for YieldEstimator<'static> {
    fn default() -> Self {
        Self::new(&NIGERIA_STATES_GHI, &MONTHLY_VARIATION_FACTORS)
    }
}
