use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{DispatchCostModel, Simulation},
    optimizer::OptimizationResult,
    ops::RangeInclusive,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_steps_table(model: &DispatchCostModel, simulation: &Simulation) -> Table {
    let series = model.series();
    let mean_import_rate: KilowattHourRate = {
        let estimate: Mean = series.iter().map(|slot| slot.import_rate.0).collect();
        if estimate.is_empty() { KilowattHourRate::ZERO } else { estimate.mean().into() }
    };
    let capacity = RangeInclusive::new(KilowattHours::ZERO, model.battery().capacity);

    let mut table = new_table();
    table.set_header(vec![
        "#", "Import", "Export", "Load", "Solar", "Grid", "Battery", "Clip", "Before", "After",
        "Loss",
    ]);
    for (index, (slot, step)) in series.iter().zip(&simulation.steps).enumerate() {
        let level_color = |level: KilowattHours| {
            if capacity.contains(level) { Color::Reset } else { Color::Red }
        };
        let loss = step.losses.total();
        table.add_row(vec![
            Cell::new(index).add_attribute(Attribute::Dim),
            Cell::new(slot.import_rate).fg(if slot.import_rate >= mean_import_rate {
                Color::Red
            } else {
                Color::Green
            }),
            Cell::new(slot.export_rate),
            Cell::new(slot.load).set_alignment(CellAlignment::Right),
            Cell::new(slot.solar).set_alignment(CellAlignment::Right),
            Cell::new(step.grid).set_alignment(CellAlignment::Right),
            Cell::new(step.battery).set_alignment(CellAlignment::Right).fg(
                if step.battery.0 > 0.0 {
                    Color::Green
                } else if step.battery.0 < 0.0 {
                    Color::Red
                } else {
                    Color::Reset
                },
            ),
            Cell::new(step.curtailment).set_alignment(CellAlignment::Right).fg(
                if step.curtailment.0 > 0.0 { Color::DarkYellow } else { Color::Reset },
            ),
            Cell::new(step.energy_level_before)
                .set_alignment(CellAlignment::Right)
                .fg(level_color(step.energy_level_before)),
            Cell::new(step.energy_level_after)
                .set_alignment(CellAlignment::Right)
                .fg(level_color(step.energy_level_after)),
            Cell::new(loss)
                .set_alignment(CellAlignment::Right)
                .fg(if loss >= Cost::ONE_CENT { Color::Red } else { Color::Green }),
        ]);
    }
    table
}

pub fn build_summary_table(model: &DispatchCostModel, simulation: &Simulation) -> Table {
    let metrics = &simulation.metrics;
    let losses = &metrics.losses;
    let total = losses.total();
    let baseline = model.baseline();
    let saving = baseline - total;

    let mut table = new_table();
    table.set_header(vec!["Mode", "Item", "Value"]);
    let mode = Cell::new(model.mode()).fg(model.mode().color());
    let rows: [(&str, Cell); 15] = [
        ("Imported", Cell::new(metrics.grid_import)),
        ("Exported", Cell::new(metrics.grid_export)),
        ("Charged", Cell::new(metrics.battery_charge)),
        ("Discharged", Cell::new(metrics.battery_discharge)),
        ("Curtailed", Cell::new(metrics.curtailment)),
        ("Import cost", Cell::new(losses.grid_import)),
        ("Export cost", Cell::new(losses.grid_export)),
        ("Battery energy wear", Cell::new(losses.battery_energy_wear)),
        ("Battery power wear", Cell::new(losses.battery_power_wear)),
        ("Grid power wear", Cell::new(losses.grid_power_wear)),
        ("Level change", Cell::new(losses.level_change)),
        ("Total", Cell::new(total).add_attribute(Attribute::Bold)),
        ("Standing charge", Cell::new(losses.standing_charge).add_attribute(Attribute::Dim)),
        ("Billed", Cell::new(losses.billed())),
        (
            "Saving",
            Cell::new(format!("{saving} of {baseline}")).fg(if saving >= Cost::ZERO {
                Color::Green
            } else {
                Color::Red
            }),
        ),
    ];
    for (index, (name, value)) in rows.into_iter().enumerate() {
        let mode = if index == 0 { mode.clone() } else { Cell::new("") };
        table.add_row(vec![mode, Cell::new(name), value.set_alignment(CellAlignment::Right)]);
    }
    table
}

pub fn build_result_table(result: &OptimizationResult) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Status", "Message", "Iterations", "Evaluations", "Elapsed"]);
    table.add_row(vec![
        Cell::new(result.status).fg(if result.converged { Color::Green } else { Color::Red }),
        Cell::new(&result.message),
        Cell::new(result.iterations).set_alignment(CellAlignment::Right),
        Cell::new(result.evaluations).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.3} s", result.elapsed_seconds)).set_alignment(CellAlignment::Right),
    ]);
    table
}
