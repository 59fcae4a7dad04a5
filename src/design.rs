use crate::core::cost::{self, CommissioningCost, SubsystemCost};
use crate::core::emissions::{self, EmissionResult};
use crate::core::lifecycle::{self, LifecycleParameters, LifecycleSeries};
use crate::core::pv_yield::{MonthlyYieldProfile, YieldEstimator};
use crate::core::seasonal::Month;
use crate::core::sizing::{self, BatteryBankSizing, SizingResult};
use crate::core::units::MONTHS_PER_YEAR;
use crate::errors::EngineError;
use crate::input::Input;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Everything computed for one project, from the per-panel yield through to the emission
/// comparison. A design is always rebuilt in full from the input; nothing is cached.
///
/// A failure in the battery bank or the cost projection only takes out the quantities that
/// depend on it, so those are carried as results of their own.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PvSystemDesign {
    pub location: String,
    /// in kWh/day
    pub daily_target_energy: f64,
    pub monthly_yield: MonthlyYieldProfile,
    pub worst_month: Month,
    pub panel_count: u32,
    /// energy generated by the whole array in each month, in kWh
    pub monthly_generation: [f64; MONTHS_PER_YEAR],
    pub battery_bank: Result<BatteryBankSizing, EngineError>,
    pub financials: Result<Financials, EngineError>,
    pub emissions: EmissionResult,
}

/// Costs of the sized system and their projection against the grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Financials {
    pub sizing: SizingResult,
    pub cost_breakdown: Vec<SubsystemCost>,
    pub commissioning: CommissioningCost,
    pub maintenance_per_visit: f64,
    /// maintenance cost per year before inflation
    pub annual_usage_cost: f64,
    pub lifecycle: LifecycleSeries,
}

impl PvSystemDesign {
    pub fn from_input(input: &Input) -> Result<Self, EngineError> {
        Self::from_input_with_estimator(input, &YieldEstimator::default())
    }

    /// Fails outright only when the array itself cannot be sized or the emissions cannot be
    /// projected; see `failure` for the rest.
    #[instrument(skip_all, fields(location = %input.location))]
    pub fn from_input_with_estimator(
        input: &Input,
        estimator: &YieldEstimator<'_>,
    ) -> Result<Self, EngineError> {
        warn_about_accepted_oddities(input);

        let monthly_yield =
            estimator.estimate(&input.location, &input.panel_spec(), input.inverter_efficiency())?;
        debug!(
            min_monthly_yield = monthly_yield.minimum(),
            max_monthly_yield = monthly_yield.maximum(),
            "estimated monthly yield per panel"
        );

        let panel_count = sizing::panel_count(&monthly_yield, input.daily_target_energy)?;
        let monthly_generation = sizing::monthly_generation(panel_count, &monthly_yield);

        let emissions = emissions::project(
            input.daily_target_energy,
            input.emission_projection_years,
            &input.emission_factors(),
        )?;

        let battery_bank =
            sizing::size_battery_bank(input.daily_target_energy, &input.battery_bank_spec());
        let financials = battery_bank.clone().and_then(|battery_bank| {
            Financials::new(input, SizingResult::new(panel_count, &battery_bank))
        });

        if let Err(error) = &battery_bank {
            warn!("Battery bank could not be sized, so no costs are projected: {error}");
        } else if let Err(error) = &financials {
            warn!("Costs could not be projected: {error}");
        }

        Ok(Self {
            location: input.location.clone(),
            daily_target_energy: input.daily_target_energy,
            worst_month: monthly_yield.worst_month(),
            monthly_yield,
            panel_count,
            monthly_generation,
            battery_bank,
            financials,
            emissions,
        })
    }

    /// The first failure that left part of the design uncomputed, if any.
    pub fn failure(&self) -> Option<&EngineError> {
        self.battery_bank
            .as_ref()
            .err()
            .or_else(|| self.financials.as_ref().err())
    }
}

impl Financials {
    fn new(input: &Input, sizing: SizingResult) -> Result<Self, EngineError> {
        let cost_line_items = input.cost_line_items();
        let cost_breakdown = cost::cost_breakdown(&sizing, &cost_line_items);
        let commissioning = cost::commission(&sizing, &cost_line_items);
        let maintenance_per_visit = cost::maintenance(&sizing, &cost_line_items);

        let lifecycle_parameters = LifecycleParameters {
            horizon_years: input.cost_projection_years,
            daily_target_energy: input.daily_target_energy,
            grid_rate: input.grid_tariff.rate,
            inflation_rate: input.inflation_rate(),
            commission_cost: commissioning.commission_cost,
            per_visit_maintenance_cost: maintenance_per_visit,
            maintenance_visits_per_year: input.maintenance.visits_per_year,
            warranty_years: input.maintenance.warranty_years,
        };
        let lifecycle = lifecycle::project(&lifecycle_parameters)?;

        Ok(Self {
            sizing,
            cost_breakdown,
            commissioning,
            maintenance_per_visit,
            annual_usage_cost: lifecycle_parameters.usage_cost(),
            lifecycle,
        })
    }
}

fn warn_about_accepted_oddities(input: &Input) {
    if input.daily_target_energy < 0. {
        warn!(
            "Daily target energy of {} kWh is negative; results will be computed regardless",
            input.daily_target_energy
        );
    }
    for subsystem in input.cost_line_items().subsystems_with_negative_costs() {
        warn!("{subsystem} has a negative unit cost, which will reduce the cost totals");
    }
    if input.grid_tariff.rate < 0. {
        warn!("Grid rate is negative");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ingest_for_processing;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    #[fixture]
    fn input() -> Input {
        ingest_for_processing(
            json!({
                "Location": "Lagos",
                "Panel": {"length": 2.0, "width": 1.0, "efficiency": 18.0},
                "Inverter": {"efficiency": 95.0},
                "DailyTargetEnergy": 5.0,
                "BatteryBank": {
                    "autonomy_days": 1.0,
                    "voltage": 12.0,
                    "depth_of_discharge": 50.0,
                    "round_trip_efficiency": 85.0,
                    "module_capacity": 100.0
                },
                "Costs": {
                    "solar_panel": {"procurement": 100000.0, "installation": 5000.0, "maintenance": 1000.0},
                    "inverter": {"procurement": 250000.0, "installation": 10000.0, "maintenance": 2000.0}
                },
                "Maintenance": {"visits_per_year": 2.0, "warranty_years": 1},
                "GridTariff": {"rate": 50.0, "inflation_rate": 10.0},
                "CostProjectionYears": 3,
                "EmissionProjectionYears": 2
            })
            .to_string()
            .as_bytes(),
        )
        .unwrap()
    }

    #[rstest]
    fn should_design_system_end_to_end(input: Input) {
        let design = PvSystemDesign::from_input(&input).unwrap();
        assert_eq!(design.failure(), None);

        assert_eq!(design.worst_month, Month::July);
        assert_eq!(design.panel_count, 7);
        let financials = design.financials.unwrap();
        assert_eq!(
            financials.sizing,
            SizingResult {
                panel_count: 7,
                battery_module_count: 10,
                required_capacity: 981.,
            }
        );
        // 7 * 100k + 250k, 7 * 5k + 10k
        assert_relative_eq!(financials.commissioning.total_procurement, 950_000.);
        assert_relative_eq!(financials.commissioning.total_installation, 45_000.);
        assert_relative_eq!(financials.commissioning.commission_cost, 995_000.);
        assert_relative_eq!(financials.maintenance_per_visit, 9_000.);
        assert_relative_eq!(financials.annual_usage_cost, 18_000.);

        let years = financials.lifecycle.years();
        assert_eq!(years.len(), 3);
        assert_eq!(years[0].pv_cost, 0.);
        assert_relative_eq!(years[1].pv_cost, 19_800., max_relative = 1e-12);
        assert_relative_eq!(years[0].cumulative_pv_cost, 995_000.);
        assert_relative_eq!(years[0].grid_cost, 91_250.);

        assert_eq!(design.emissions.horizon_years, 2);
        assert_relative_eq!(design.emissions.grid_total, 1_467.3, max_relative = 1e-12);
        assert_relative_eq!(design.emissions.solar_total, 149.65, max_relative = 1e-12);
    }

    #[rstest]
    fn should_halt_on_unknown_location(input: Input) {
        let input = Input {
            location: "Gotham".to_string(),
            ..input
        };
        assert_eq!(
            PvSystemDesign::from_input(&input),
            Err(EngineError::UnknownLocation {
                location: "Gotham".to_string()
            })
        );
    }

    #[rstest]
    fn should_halt_on_zero_area_panel(mut input: Input) {
        input.panel.width = 0.;
        assert!(matches!(
            PvSystemDesign::from_input(&input),
            Err(EngineError::DegenerateYield { .. })
        ));
    }

    #[rstest]
    fn should_keep_array_and_emissions_when_battery_bank_is_invalid(mut input: Input) {
        input.battery_bank.voltage = 0.;
        let design = PvSystemDesign::from_input(&input).unwrap();

        let expected_failure = EngineError::InvalidParameter {
            name: "battery_voltage",
            value: 0.,
        };
        assert_eq!(design.battery_bank, Err(expected_failure.clone()));
        assert_eq!(design.financials, Err(expected_failure.clone()));
        assert_eq!(design.failure(), Some(&expected_failure));

        assert_eq!(design.worst_month, Month::July);
        assert_eq!(design.panel_count, 7);
        assert_relative_eq!(design.monthly_yield.minimum(), 0.81054, max_relative = 1e-9);
        assert_relative_eq!(design.emissions.grid_total, 1_467.3, max_relative = 1e-12);
    }

    #[rstest]
    fn should_keep_battery_bank_when_only_cost_projection_fails(mut input: Input) {
        input.cost_projection_years = 0;
        let design = PvSystemDesign::from_input(&input).unwrap();

        assert_eq!(
            design.battery_bank,
            Ok(BatteryBankSizing {
                required_capacity: 981.,
                module_count: 10,
            })
        );
        assert!(matches!(
            design.failure(),
            Some(EngineError::InvalidParameter {
                name: "cost_projection_years",
                ..
            })
        ));
    }

    #[rstest]
    fn should_halt_when_panel_count_cannot_be_held(mut input: Input) {
        input.daily_target_energy = 1e12;
        assert!(matches!(
            PvSystemDesign::from_input(&input),
            Err(EngineError::OutOfRange {
                name: "panel_count",
                ..
            })
        ));
    }

    #[rstest]
    fn should_be_deterministic(input: Input) {
        assert_eq!(
            PvSystemDesign::from_input(&input).unwrap(),
            PvSystemDesign::from_input(&input).unwrap()
        );
    }
}
