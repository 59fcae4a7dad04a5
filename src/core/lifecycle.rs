//! This module projects the yearly cost of running the PV system against buying the same energy
//! from the grid.

use crate::core::units::DAYS_PER_YEAR;
use crate::errors::EngineError;
use itertools::izip;
use serde::Serialize;
use std::iter::successors;
use tracing::debug;

/// Longest cost projection supported, in years.
pub const MAX_PROJECTION_YEARS: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LifecycleParameters {
    /// number of years to project, from one to `MAX_PROJECTION_YEARS`
    pub horizon_years: u32,
    /// in kWh/day
    pub daily_target_energy: f64,
    /// grid electricity price per kWh in the first year
    pub grid_rate: f64,
    /// yearly inflation as a fraction; negative values deflate
    pub inflation_rate: f64,
    /// one-off procurement and installation cost
    pub commission_cost: f64,
    pub per_visit_maintenance_cost: f64,
    pub maintenance_visits_per_year: f64,
    /// number of initial years in which maintenance is free
    pub warranty_years: u32,
}

impl LifecycleParameters {
    /// Yearly maintenance cost of the PV system before inflation.
    pub fn usage_cost(&self) -> f64 {
        self.per_visit_maintenance_cost * self.maintenance_visits_per_year
    }

    /// Cost of supplying the daily target from the grid for the first year.
    pub fn first_year_grid_cost(&self) -> f64 {
        self.daily_target_energy * self.grid_rate * DAYS_PER_YEAR as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LifecycleYear {
    /// 1-based
    pub year: u32,
    /// PV maintenance cost for the year, excluding commissioning
    pub pv_cost: f64,
    /// commissioning cost attributed to this year (only ever non-zero in year 1)
    pub commissioning_cost: f64,
    pub grid_cost: f64,
    /// running total of PV cost including commissioning
    pub cumulative_pv_cost: f64,
    pub cumulative_grid_cost: f64,
}

impl LifecycleYear {
    pub fn pv_cost_including_commissioning(&self) -> f64 {
        self.pv_cost + self.commissioning_cost
    }
}

/// Year-by-year PV and grid costs. The plain annual view reads `pv_cost`; the cumulative view
/// reads `pv_cost_including_commissioning` and the running totals. Both come from the same
/// per-year values.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LifecycleSeries {
    years: Vec<LifecycleYear>,
}

impl LifecycleSeries {
    pub fn years(&self) -> &[LifecycleYear] {
        &self.years
    }

    pub fn horizon_years(&self) -> usize {
        self.years.len()
    }

    pub fn pv_costs(&self) -> Vec<f64> {
        self.years.iter().map(|year| year.pv_cost).collect()
    }

    pub fn grid_costs(&self) -> Vec<f64> {
        self.years.iter().map(|year| year.grid_cost).collect()
    }

    pub fn final_year(&self) -> Option<&LifecycleYear> {
        self.years.last()
    }
}

pub fn project(parameters: &LifecycleParameters) -> Result<LifecycleSeries, EngineError> {
    EngineError::require_positive("cost_projection_years", parameters.horizon_years as f64)?;
    EngineError::require_at_most(
        "cost_projection_years",
        parameters.horizon_years as f64,
        MAX_PROJECTION_YEARS as f64,
    )?;

    let horizon_years = parameters.horizon_years as usize;
    let grid_costs = grid_costs(
        parameters.first_year_grid_cost(),
        parameters.inflation_rate,
        horizon_years,
    );
    let pv_costs = pv_costs(
        parameters.usage_cost(),
        parameters.inflation_rate,
        parameters.warranty_years,
        horizon_years,
    );
    let commissioning_costs =
        (0..horizon_years).map(|i| if i == 0 { parameters.commission_cost } else { 0. });

    let years = izip!(0u32.., pv_costs, commissioning_costs, grid_costs)
        .scan(
            (0., 0.),
            |(cumulative_pv_cost, cumulative_grid_cost), (i, pv_cost, commissioning_cost, grid_cost)| {
                *cumulative_pv_cost += pv_cost + commissioning_cost;
                *cumulative_grid_cost += grid_cost;
                Some(LifecycleYear {
                    year: i + 1,
                    pv_cost,
                    commissioning_cost,
                    grid_cost,
                    cumulative_pv_cost: *cumulative_pv_cost,
                    cumulative_grid_cost: *cumulative_grid_cost,
                })
            },
        )
        .collect::<Vec<_>>();

    let series = LifecycleSeries { years };
    if let Some(final_year) = series.final_year() {
        debug!(
            cumulative_pv_cost = final_year.cumulative_pv_cost,
            cumulative_grid_cost = final_year.cumulative_grid_cost,
            "projected lifecycle costs over {horizon_years} years"
        );
    }

    Ok(series)
}

/// Grid cost for each year, each year's cost being the previous year's inflated once.
pub fn grid_costs(first_year_cost: f64, inflation_rate: f64, horizon_years: usize) -> Vec<f64> {
    successors(Some(first_year_cost), |previous| {
        Some(previous * (1. + inflation_rate))
    })
    .take(horizon_years)
    .collect()
}

/// PV maintenance cost for each year. Years within the warranty cost nothing; after that the
/// cost is inflated by the absolute year index (not by years since the warranty ended), so the
/// first post-warranty year already carries the accumulated inflation.
pub fn pv_costs(
    usage_cost: f64,
    inflation_rate: f64,
    warranty_years: u32,
    horizon_years: usize,
) -> Vec<f64> {
    (0..horizon_years)
        .map(|i| {
            if i < warranty_years as usize {
                0.
            } else {
                usage_cost * (1. + inflation_rate).powi(i as i32)
            }
        })
        .collect()
}
