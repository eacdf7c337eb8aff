use crate::{
    core::solution::{Losses, Metrics},
    quantity::{energy::KilowattHours, power::Kilowatts, time::Hours},
};

/// Single-slot outcome of the dispatch simulation.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Step {
    /// Net grid power, export is positive.
    pub grid: Kilowatts,

    /// External battery power, charging is positive.
    pub battery: Kilowatts,

    /// Solar power thrown away on purpose.
    pub curtailment: Kilowatts,

    pub energy_level_before: KilowattHours,
    pub energy_level_after: KilowattHours,

    /// Trading and wear costs within this single slot.
    pub losses: Losses,
}

impl Step {
    /// Convert the step powers into the cumulative energy metrics.
    pub fn metrics(&self, duration: Hours) -> Metrics {
        let grid = self.grid * duration;
        let battery = self.battery * duration;
        Metrics {
            losses: self.losses,
            grid_import: (-grid).max(KilowattHours::ZERO),
            grid_export: grid.max(KilowattHours::ZERO),
            battery_charge: battery.max(KilowattHours::ZERO),
            battery_discharge: (-battery).max(KilowattHours::ZERO),
            curtailment: self.curtailment * duration,
        }
    }
}
