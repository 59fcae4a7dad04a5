//! Cost model for commissioning and maintaining the system.
//! Panel and battery costs are per unit and scale with the sized quantities; every other
//! subsystem is a single flat cost per system. Negative unit costs are not rejected here and
//! flow through into the totals.

use crate::core::sizing::SizingResult;
use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
pub enum Subsystem {
    #[strum(to_string = "Solar panel")]
    SolarPanel,
    #[strum(to_string = "Charge controller")]
    ChargeController,
    Inverter,
    Battery,
    Miscellaneous,
}

impl Subsystem {
    /// How many of this subsystem's units the sized system contains.
    pub fn quantity(&self, sizing: &SizingResult) -> u32 {
        match self {
            Subsystem::SolarPanel => sizing.panel_count,
            Subsystem::Battery => sizing.battery_module_count,
            Subsystem::ChargeController | Subsystem::Inverter | Subsystem::Miscellaneous => 1,
        }
    }
}

/// Unit costs of one subsystem, in currency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CostLineItem {
    pub procurement: f64,
    pub installation: f64,
    /// per maintenance visit
    pub maintenance: f64,
}

impl CostLineItem {
    fn scaled(&self, quantity: u32) -> Self {
        let quantity = quantity as f64;
        Self {
            procurement: self.procurement * quantity,
            installation: self.installation * quantity,
            maintenance: self.maintenance * quantity,
        }
    }

    fn has_negative_cost(&self) -> bool {
        self.procurement < 0. || self.installation < 0. || self.maintenance < 0.
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CostLineItems {
    pub solar_panel: CostLineItem,
    pub charge_controller: CostLineItem,
    pub inverter: CostLineItem,
    pub battery: CostLineItem,
    pub miscellaneous: CostLineItem,
}

impl CostLineItems {
    pub fn unit_costs(&self, subsystem: Subsystem) -> &CostLineItem {
        match subsystem {
            Subsystem::SolarPanel => &self.solar_panel,
            Subsystem::ChargeController => &self.charge_controller,
            Subsystem::Inverter => &self.inverter,
            Subsystem::Battery => &self.battery,
            Subsystem::Miscellaneous => &self.miscellaneous,
        }
    }

    /// Subsystems with a negative unit cost. These are accepted, but worth reporting.
    pub fn subsystems_with_negative_costs(&self) -> Vec<Subsystem> {
        Subsystem::iter()
            .filter(|subsystem| self.unit_costs(*subsystem).has_negative_cost())
            .collect()
    }
}

/// One subsystem's unit costs multiplied out by the quantity installed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SubsystemCost {
    pub subsystem: Subsystem,
    pub quantity: u32,
    pub cost: CostLineItem,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CommissioningCost {
    pub total_procurement: f64,
    pub total_installation: f64,
    /// procurement plus installation
    pub commission_cost: f64,
}

pub fn cost_breakdown(sizing: &SizingResult, cost_line_items: &CostLineItems) -> Vec<SubsystemCost> {
    Subsystem::iter()
        .map(|subsystem| {
            let quantity = subsystem.quantity(sizing);
            SubsystemCost {
                subsystem,
                quantity,
                cost: cost_line_items.unit_costs(subsystem).scaled(quantity),
            }
        })
        .collect()
}

pub fn commission(sizing: &SizingResult, cost_line_items: &CostLineItems) -> CommissioningCost {
    let breakdown = cost_breakdown(sizing, cost_line_items);
    let total_procurement = breakdown.iter().map(|line| line.cost.procurement).sum::<f64>();
    let total_installation = breakdown.iter().map(|line| line.cost.installation).sum::<f64>();

    CommissioningCost {
        total_procurement,
        total_installation,
        commission_cost: total_procurement + total_installation,
    }
}

/// Cost of a single maintenance visit to the whole system.
pub fn maintenance(sizing: &SizingResult, cost_line_items: &CostLineItems) -> f64 {
    cost_breakdown(sizing, cost_line_items)
        .iter()
        .map(|line| line.cost.maintenance)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn sizing() -> SizingResult {
        SizingResult {
            panel_count: 7,
            battery_module_count: 10,
            required_capacity: 981.,
        }
    }

    #[fixture]
    fn cost_line_items() -> CostLineItems {
        CostLineItems {
            solar_panel: CostLineItem {
                procurement: 100_000.,
                installation: 5_000.,
                maintenance: 1_000.,
            },
            charge_controller: CostLineItem {
                procurement: 40_000.,
                installation: 2_000.,
                maintenance: 500.,
            },
            inverter: CostLineItem {
                procurement: 250_000.,
                installation: 10_000.,
                maintenance: 2_500.,
            },
            battery: CostLineItem {
                procurement: 150_000.,
                installation: 3_000.,
                maintenance: 800.,
            },
            miscellaneous: CostLineItem {
                procurement: 30_000.,
                installation: 20_000.,
                maintenance: 0.,
            },
        }
    }

    #[rstest]
    fn should_scale_panel_and_battery_costs_only(
        sizing: SizingResult,
        cost_line_items: CostLineItems,
    ) {
        let breakdown = cost_breakdown(&sizing, &cost_line_items);

        let quantities: Vec<(Subsystem, u32)> = breakdown
            .iter()
            .map(|line| (line.subsystem, line.quantity))
            .collect();
        assert_eq!(
            quantities,
            vec![
                (Subsystem::SolarPanel, 7),
                (Subsystem::ChargeController, 1),
                (Subsystem::Inverter, 1),
                (Subsystem::Battery, 10),
                (Subsystem::Miscellaneous, 1),
            ]
        );
        assert_eq!(breakdown[0].cost.procurement, 700_000.);
        assert_eq!(breakdown[3].cost.installation, 30_000.);
        assert_eq!(breakdown[2].cost.procurement, 250_000.);
    }

    #[rstest]
    fn should_total_commissioning_cost(sizing: SizingResult, cost_line_items: CostLineItems) {
        let commissioning = commission(&sizing, &cost_line_items);

        // 700k + 40k + 250k + 1.5M + 30k
        assert_relative_eq!(commissioning.total_procurement, 2_520_000.);
        // 35k + 2k + 10k + 30k + 20k
        assert_relative_eq!(commissioning.total_installation, 97_000.);
        assert_relative_eq!(commissioning.commission_cost, 2_617_000.);
    }

    #[rstest]
    fn should_total_maintenance_per_visit(sizing: SizingResult, cost_line_items: CostLineItems) {
        // 7k + 500 + 2.5k + 8k + 0
        assert_relative_eq!(maintenance(&sizing, &cost_line_items), 18_000.);
    }

    #[rstest]
    fn should_cost_nothing_with_default_costs(sizing: SizingResult) {
        let commissioning = commission(&sizing, &CostLineItems::default());
        assert_eq!(commissioning.commission_cost, 0.);
        assert_eq!(maintenance(&sizing, &CostLineItems::default()), 0.);
    }

    #[rstest]
    fn should_propagate_negative_unit_costs(sizing: SizingResult) {
        let cost_line_items = CostLineItems {
            inverter: CostLineItem {
                procurement: -1_000.,
                ..Default::default()
            },
            ..Default::default()
        };

        assert_eq!(commission(&sizing, &cost_line_items).commission_cost, -1_000.);
        assert_eq!(
            cost_line_items.subsystems_with_negative_costs(),
            vec![Subsystem::Inverter]
        );
    }

    #[rstest]
    fn should_display_subsystem_names() {
        assert_eq!(Subsystem::SolarPanel.to_string(), "Solar panel");
        assert_eq!(Subsystem::Miscellaneous.to_string(), "Miscellaneous");
    }
}
