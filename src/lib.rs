mod compare_floats;
pub mod core;
pub mod design;
pub mod errors;
pub mod input;
pub mod output;

pub use crate::design::PvSystemDesign;
use crate::design::Financials;
use crate::core::seasonal::Month;
use crate::errors::PvSizingError;
use crate::input::ingest_for_processing;
use crate::output::Output;
use bitflags::bitflags;
use csv::WriterBuilder;
use std::io::{Read, Write};
use strum::IntoEnumIterator;
use tracing::{info, instrument};

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ProjectFlags: u8 {
        /// Also write the monthly generation of the designed array.
        const DETAILED_OUTPUT = 0b1;
        /// Also write the whole design out as JSON.
        const SUMMARY_JSON = 0b10;
    }
}

/// Read a project from JSON, design the system, and write the results to the given output.
///
/// When only part of the design could be computed, whatever was computed is still written out
/// before the failure is returned as `PvSizingError::IncompleteDesign`.
#[instrument(skip_all)]
pub fn run_project(
    input: impl Read,
    output: impl Output,
    flags: &ProjectFlags,
) -> Result<PvSystemDesign, PvSizingError> {
    let input = ingest_for_processing(input)?;

    let design = PvSystemDesign::from_input(&input)?;

    if !output.is_noop() {
        write_outputs(&output, &design, flags).map_err(PvSizingError::OutputFailure)?;
    }

    if let Some(source) = design.failure().cloned() {
        return Err(PvSizingError::IncompleteDesign {
            design: Box::new(design),
            source,
        });
    }

    Ok(design)
}

fn write_outputs(
    output: &impl Output,
    design: &PvSystemDesign,
    flags: &ProjectFlags,
) -> anyhow::Result<()> {
    write_monthly_yield_output(
        output.writer_for_location_key("monthly_yield", "csv")?,
        design,
        flags.contains(ProjectFlags::DETAILED_OUTPUT),
    )?;
    if let Ok(financials) = &design.financials {
        write_annual_costs_output(
            output.writer_for_location_key("annual_costs", "csv")?,
            financials,
        )?;
        write_cumulative_costs_output(
            output.writer_for_location_key("cumulative_costs", "csv")?,
            financials,
        )?;
        write_cost_breakdown_output(output.writer_for_location_key("costs", "csv")?, financials)?;
    }
    write_summary_output(output.writer_for_location_key("summary", "csv")?, design)?;

    if flags.contains(ProjectFlags::SUMMARY_JSON) {
        let mut writer = output.writer_for_location_key("summary", "json")?;
        serde_json::to_writer_pretty(&mut writer, design)?;
        writer.flush()?;
    }

    Ok(())
}

// monetary values are only rounded here, on the way out
fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn write_monthly_yield_output(
    writer: impl Write,
    design: &PvSystemDesign,
    include_generation: bool,
) -> anyhow::Result<()> {
    info!("writing out monthly yield");
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings = vec!["Month", "PV potential per panel"];
    let mut units_row = vec!["", "[kWh/day]"];
    if include_generation {
        headings.push("System generation");
        units_row.push("[kWh]");
    }
    writer.write_record(&headings)?;
    writer.write_record(&units_row)?;

    for month in Month::iter() {
        let mut row = vec![
            month.to_string(),
            design.monthly_yield.for_month(month).to_string(),
        ];
        if include_generation {
            row.push(design.monthly_generation[month.index()].to_string());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;

    Ok(())
}

fn write_annual_costs_output(writer: impl Write, financials: &Financials) -> anyhow::Result<()> {
    info!("writing out annual costs");
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(["Year", "PV Cost", "Grid Cost"])?;
    writer.write_record(["[count]", "[currency]", "[currency]"])?;

    for year in financials.lifecycle.years() {
        writer.write_record([
            year.year.to_string(),
            money(year.pv_cost),
            money(year.grid_cost),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

fn write_cumulative_costs_output(
    writer: impl Write,
    financials: &Financials,
) -> anyhow::Result<()> {
    info!("writing out cumulative costs");
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Year",
        "PV Cost",
        "Grid Cost",
        "Cumulative PV Cost",
        "Cumulative Grid Cost",
    ])?;
    writer.write_record(["[count]", "[currency]", "[currency]", "[currency]", "[currency]"])?;

    for year in financials.lifecycle.years() {
        writer.write_record([
            year.year.to_string(),
            money(year.pv_cost_including_commissioning()),
            money(year.grid_cost),
            money(year.cumulative_pv_cost),
            money(year.cumulative_grid_cost),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

fn write_cost_breakdown_output(writer: impl Write, financials: &Financials) -> anyhow::Result<()> {
    info!("writing out cost breakdown");
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record(["Subsystem", "Quantity", "Procurement", "Installation", "Maintenance"])?;
    writer.write_record(["", "[count]", "[currency]", "[currency]", "[currency/visit]"])?;

    for line in &financials.cost_breakdown {
        writer.write_record([
            line.subsystem.to_string(),
            line.quantity.to_string(),
            money(line.cost.procurement),
            money(line.cost.installation),
            money(line.cost.maintenance),
        ])?;
    }
    writer.write_record([
        "Total".to_string(),
        String::new(),
        money(financials.commissioning.total_procurement),
        money(financials.commissioning.total_installation),
        money(financials.maintenance_per_visit),
    ])?;

    writer.flush()?;

    Ok(())
}

fn write_summary_output(writer: impl Write, design: &PvSystemDesign) -> anyhow::Result<()> {
    info!("writing out summary");
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut rows: Vec<(&str, String, &str)> = vec![
        ("Location", design.location.clone(), ""),
        ("Daily target energy", design.daily_target_energy.to_string(), "[kWh/day]"),
        ("Worst month", design.worst_month.to_string(), ""),
        (
            "Average PV potential per panel",
            format!("{:.3}", design.monthly_yield.annual_average()),
            "[kWh/day]",
        ),
        ("Number of panels", design.panel_count.to_string(), "[count]"),
    ];
    if let Ok(battery_bank) = &design.battery_bank {
        rows.extend([
            (
                "Bank capacity needed",
                format!("{:.2}", battery_bank.required_capacity),
                "[Ah]",
            ),
            ("Number of batteries", battery_bank.module_count.to_string(), "[count]"),
        ]);
    }
    if let Ok(financials) = &design.financials {
        rows.extend([
            (
                "Total procurement cost",
                money(financials.commissioning.total_procurement),
                "[currency]",
            ),
            (
                "Total installation cost",
                money(financials.commissioning.total_installation),
                "[currency]",
            ),
            (
                "Commissioning cost",
                money(financials.commissioning.commission_cost),
                "[currency]",
            ),
            (
                "Maintenance cost",
                money(financials.maintenance_per_visit),
                "[currency/visit]",
            ),
            (
                "Annual maintenance cost",
                money(financials.annual_usage_cost),
                "[currency/year]",
            ),
        ]);
    }
    rows.extend([
        (
            "Grid emissions",
            format!("{:.2}", design.emissions.grid_total),
            "[kgCO2]",
        ),
        (
            "PV system emissions",
            format!("{:.2}", design.emissions.solar_total),
            "[kgCO2]",
        ),
        (
            "Emissions avoided",
            format!("{:.2}", design.emissions.avoided()),
            "[kgCO2]",
        ),
    ]);
    if let Some(failure) = design.failure() {
        rows.push(("Not computed", failure.to_string(), ""));
    }

    writer.write_record(["Output", "Value", "Units"])?;
    for (output, value, unit) in rows {
        writer.write_record([output, value.as_str(), unit])?;
    }

    writer.flush()?;

    Ok(())
}
