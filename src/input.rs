use crate::core::cost::{CostLineItem, CostLineItems};
use crate::core::emissions::{EmissionFactors, GRID_EMISSION_FACTOR, SOLAR_EMISSION_FACTOR};
use crate::core::pv_yield::PanelSpec;
use crate::core::sizing::BatteryBankSpec;
use crate::core::units::{percent_to_fraction, Percentage};
use anyhow::anyhow;
use serde::Deserialize;
use serde_valid::Validate;
use std::io::Read;

pub fn ingest_for_processing(json: impl Read) -> Result<Input, anyhow::Error> {
    let input: Input = serde_json::from_reader(json)?;
    input
        .validate()
        .map_err(|errors| anyhow!("Input failed validation: {errors}"))?;

    Ok(input)
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Input {
    /// Must be one of the irradiance table's locations
    pub location: String,
    #[validate]
    pub panel: PanelInput,
    #[validate]
    #[serde(default)]
    pub inverter: InverterInput,
    /// in kWh/day
    #[serde(default = "default_daily_target_energy")]
    pub daily_target_energy: f64,
    #[validate]
    #[serde(default)]
    pub battery_bank: BatteryBankInput,
    #[serde(default)]
    pub costs: CostsInput,
    #[serde(default)]
    pub maintenance: MaintenanceInput,
    #[serde(default)]
    pub grid_tariff: GridTariffInput,
    /// from 1 to `lifecycle::MAX_PROJECTION_YEARS`
    #[validate(minimum = 1)]
    #[validate(maximum = 100)]
    #[serde(default = "default_cost_projection_years")]
    pub cost_projection_years: u32,
    #[validate(minimum = 1)]
    #[serde(default = "default_emission_projection_years")]
    pub emission_projection_years: u32,
    #[serde(default)]
    pub emission_factors: EmissionFactorsInput,
}

fn default_daily_target_energy() -> f64 {
    5.
}

fn default_cost_projection_years() -> u32 {
    5
}

fn default_emission_projection_years() -> u32 {
    1
}

impl Input {
    pub fn panel_spec(&self) -> PanelSpec {
        PanelSpec::new(
            self.panel.length,
            self.panel.width,
            self.panel.efficiency.as_fraction(),
        )
    }

    pub fn inverter_efficiency(&self) -> f64 {
        self.inverter.efficiency.as_fraction()
    }

    pub fn battery_bank_spec(&self) -> BatteryBankSpec {
        let BatteryBankInput {
            autonomy_days,
            voltage,
            depth_of_discharge,
            round_trip_efficiency,
            module_capacity,
        } = self.battery_bank;

        BatteryBankSpec {
            autonomy_days,
            voltage,
            round_trip_efficiency: round_trip_efficiency.as_fraction(),
            depth_of_discharge: depth_of_discharge.as_fraction(),
            module_capacity,
        }
    }

    pub fn cost_line_items(&self) -> CostLineItems {
        let CostsInput {
            solar_panel,
            charge_controller,
            inverter,
            battery,
            miscellaneous,
        } = self.costs;

        CostLineItems {
            solar_panel: solar_panel.into(),
            charge_controller: charge_controller.into(),
            inverter: inverter.into(),
            battery: battery.into(),
            miscellaneous: miscellaneous.into(),
        }
    }

    /// Yearly inflation as a fraction.
    pub fn inflation_rate(&self) -> f64 {
        percent_to_fraction(self.grid_tariff.inflation_rate)
    }

    pub fn emission_factors(&self) -> EmissionFactors {
        EmissionFactors {
            grid: self.emission_factors.grid,
            solar: self.emission_factors.solar,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct PanelInput {
    /// in m
    #[validate(minimum = 0.)]
    pub length: f64,
    /// in m
    #[validate(minimum = 0.)]
    pub width: f64,
    /// in %
    #[validate]
    #[serde(default = "default_panel_efficiency")]
    pub efficiency: Percentage,
}

fn default_panel_efficiency() -> Percentage {
    Percentage(15.)
}

#[derive(Clone, Copy, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(deny_unknown_fields)]
pub struct InverterInput {
    /// in %
    #[validate]
    pub efficiency: Percentage,
}

impl Default for InverterInput {
    fn default() -> Self {
        Self {
            efficiency: Percentage(90.),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Validate)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct BatteryBankInput {
    pub autonomy_days: f64,
    /// in V
    pub voltage: f64,
    /// in %
    #[validate]
    pub depth_of_discharge: Percentage,
    /// charge and discharge round trip efficiency, in %
    #[validate]
    pub round_trip_efficiency: Percentage,
    /// capacity of a single module, in Ah
    pub module_capacity: f64,
}

impl Default for BatteryBankInput {
    fn default() -> Self {
        Self {
            autonomy_days: 1.,
            voltage: 12.,
            depth_of_discharge: Percentage(50.),
            round_trip_efficiency: Percentage(85.),
            module_capacity: 100.,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct CostsInput {
    /// per panel
    pub solar_panel: CostLineItemInput,
    pub charge_controller: CostLineItemInput,
    pub inverter: CostLineItemInput,
    /// per battery module
    pub battery: CostLineItemInput,
    pub miscellaneous: CostLineItemInput,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct CostLineItemInput {
    pub procurement: f64,
    pub installation: f64,
    /// per maintenance visit
    pub maintenance: f64,
}

impl From<CostLineItemInput> for CostLineItem {
    fn from(input: CostLineItemInput) -> Self {
        Self {
            procurement: input.procurement,
            installation: input.installation,
            maintenance: input.maintenance,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct MaintenanceInput {
    pub visits_per_year: f64,
    /// number of years for which maintenance is covered by warranty
    pub warranty_years: u32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct GridTariffInput {
    /// price of grid electricity per kWh
    pub rate: f64,
    /// expected yearly inflation, in % (may be negative)
    pub inflation_rate: f64,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[serde(default, deny_unknown_fields)]
pub struct EmissionFactorsInput {
    /// in gCO2/kWh
    pub grid: f64,
    /// in gCO2/kWh
    pub solar: f64,
}

impl Default for EmissionFactorsInput {
    fn default() -> Self {
        Self {
            grid: GRID_EMISSION_FACTOR,
            solar: SOLAR_EMISSION_FACTOR,
        }
    }
}
