//! This module compares the carbon emissions of supplying the daily target from the grid and from PV.

use crate::core::units::{DAYS_PER_YEAR, GRAMS_PER_KILOGRAM};
use crate::errors::EngineError;
use serde::Serialize;

/// Carbon intensity of grid electricity, in gCO2/kWh
pub const GRID_EMISSION_FACTOR: f64 = 402.;
/// Lifecycle carbon intensity of PV generated electricity, in gCO2/kWh
pub const SOLAR_EMISSION_FACTOR: f64 = 41.;

/// Emission factors in gCO2/kWh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EmissionFactors {
    pub grid: f64,
    pub solar: f64,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            grid: GRID_EMISSION_FACTOR,
            solar: SOLAR_EMISSION_FACTOR,
        }
    }
}

/// Emissions in kgCO2 of supplying the same daily energy from the grid and from PV.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EmissionResult {
    pub horizon_years: u32,
    pub grid_daily: f64,
    pub solar_daily: f64,
    pub grid_total: f64,
    pub solar_total: f64,
}

impl EmissionResult {
    /// Emissions avoided over the horizon by supplying from PV instead of the grid, in kgCO2
    pub fn avoided(&self) -> f64 {
        self.grid_total - self.solar_total
    }
}

/// Emissions per day in kgCO2 for `daily_target_energy` kWh at `factor` gCO2/kWh.
pub fn daily_emission(daily_target_energy: f64, factor: f64) -> f64 {
    daily_target_energy * factor / GRAMS_PER_KILOGRAM as f64
}

pub fn total_emission(daily_target_energy: f64, factor: f64, horizon_years: u32) -> f64 {
    daily_emission(daily_target_energy, factor) * DAYS_PER_YEAR as f64 * horizon_years as f64
}

pub fn project(
    daily_target_energy: f64,
    horizon_years: u32,
    factors: &EmissionFactors,
) -> Result<EmissionResult, EngineError> {
    EngineError::require_positive("emission_projection_years", horizon_years as f64)?;

    Ok(EmissionResult {
        horizon_years,
        grid_daily: daily_emission(daily_target_energy, factors.grid),
        solar_daily: daily_emission(daily_target_energy, factors.solar),
        grid_total: total_emission(daily_target_energy, factors.grid, horizon_years),
        solar_total: total_emission(daily_target_energy, factors.solar, horizon_years),
    })
}
