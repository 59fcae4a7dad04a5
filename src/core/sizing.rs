//! This module sizes the panel array and battery bank of a stand-alone PV system.
//! Both are sized against the worst month of the year rather than an average.

use crate::core::pv_yield::MonthlyYieldProfile;
use crate::core::seasonal::Month;
use crate::core::units::{MONTHS_PER_YEAR, WATT_HOURS_PER_KILOWATT_HOUR};
use crate::errors::EngineError;
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::debug;

/// Electrical parameters of the battery bank.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BatteryBankSpec {
    /// number of days the bank must carry the load without any solar recharge
    pub autonomy_days: f64,
    /// bank voltage, in V (modules are connected in parallel)
    pub voltage: f64,
    /// charge/discharge round trip efficiency as a fraction (0 to 1]
    pub round_trip_efficiency: f64,
    /// usable fraction of capacity (0 to 1]
    pub depth_of_discharge: f64,
    /// capacity of a single battery module, in Ah
    pub module_capacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SizingResult {
    pub panel_count: u32,
    pub battery_module_count: u32,
    /// in Ah
    pub required_capacity: f64,
}

impl SizingResult {
    pub fn new(panel_count: u32, battery_bank: &BatteryBankSizing) -> Self {
        Self {
            panel_count,
            battery_module_count: battery_bank.module_count,
            required_capacity: battery_bank.required_capacity,
        }
    }
}

/// The battery bank half of the sizing, which does not depend on the panel array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BatteryBankSizing {
    /// in Ah
    pub required_capacity: f64,
    pub module_count: u32,
}

/// Size the array and bank needed to supply `daily_target_energy` (kWh/day) all year round.
pub fn size(
    yield_profile: &MonthlyYieldProfile,
    daily_target_energy: f64,
    battery_bank: &BatteryBankSpec,
) -> Result<SizingResult, EngineError> {
    let panel_count = panel_count(yield_profile, daily_target_energy)?;
    let battery_bank = size_battery_bank(daily_target_energy, battery_bank)?;

    Ok(SizingResult::new(panel_count, &battery_bank))
}

pub fn size_battery_bank(
    daily_target_energy: f64,
    battery_bank: &BatteryBankSpec,
) -> Result<BatteryBankSizing, EngineError> {
    let required_capacity = required_bank_capacity(daily_target_energy, battery_bank)?;
    let module_count = battery_module_count(required_capacity, battery_bank.module_capacity)?;

    debug!(required_capacity, module_count, "sized battery bank");

    Ok(BatteryBankSizing {
        required_capacity,
        module_count,
    })
}

/// Smallest number of panels whose combined yield in the worst month meets the daily target.
/// A target that divides exactly needs no extra panel; any fractional remainder rounds up.
pub fn panel_count(
    yield_profile: &MonthlyYieldProfile,
    daily_target_energy: f64,
) -> Result<u32, EngineError> {
    let min_monthly_yield = yield_profile.minimum();
    if min_monthly_yield.is_nan() || min_monthly_yield <= 0. {
        return Err(EngineError::DegenerateYield { min_monthly_yield });
    }

    let panel_count = ceil_to_count("panel_count", daily_target_energy / min_monthly_yield)?;
    debug!(panel_count, min_monthly_yield, "sized PV array");

    Ok(panel_count)
}

/// Bank capacity (Ah) needed to carry the daily target through the autonomy period,
/// rounded up to a whole ampere-hour.
pub fn required_bank_capacity(
    daily_target_energy: f64,
    battery_bank: &BatteryBankSpec,
) -> Result<f64, EngineError> {
    let voltage = EngineError::require_positive("battery_voltage", battery_bank.voltage)?;
    let round_trip_efficiency = EngineError::require_positive(
        "battery_round_trip_efficiency",
        battery_bank.round_trip_efficiency,
    )?;
    let depth_of_discharge =
        EngineError::require_positive("depth_of_discharge", battery_bank.depth_of_discharge)?;

    let energy_to_store =
        daily_target_energy * battery_bank.autonomy_days * WATT_HOURS_PER_KILOWATT_HOUR as f64;

    Ok((energy_to_store / voltage / round_trip_efficiency / depth_of_discharge).ceil())
}

pub fn battery_module_count(
    required_capacity: f64,
    module_capacity: f64,
) -> Result<u32, EngineError> {
    let module_capacity = EngineError::require_positive("battery_module_capacity", module_capacity)?;

    ceil_to_count("battery_module_count", required_capacity / module_capacity)
}

/// Energy generated by the whole array in each month (kWh/month), January first.
pub fn monthly_generation(
    panel_count: u32,
    yield_profile: &MonthlyYieldProfile,
) -> [f64; MONTHS_PER_YEAR] {
    let mut generation = [0.; MONTHS_PER_YEAR];
    for month in Month::iter() {
        generation[month.index()] =
            panel_count as f64 * yield_profile.for_month(month) * month.days() as f64;
    }

    generation
}

fn ceil_to_count(name: &'static str, quantity: f64) -> Result<u32, EngineError> {
    let count = EngineError::require_at_most(name, quantity.ceil(), u32::MAX as f64)?;

    // a non-positive demand needs nothing installed, so this saturates at zero
    Ok(count as u32)
}
