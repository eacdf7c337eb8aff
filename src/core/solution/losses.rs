use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::quantity::cost::Cost;

/// Components of the objective.
///
/// Export revenue is negative, so that every component reads as a loss and the total is minimized.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Add, AddAssign, Serialize)]
pub struct Losses {
    pub grid_import: Cost,
    pub grid_export: Cost,

    /// Wear caused by the battery energy level.
    pub battery_energy_wear: Cost,

    /// Wear caused by the battery charge or discharge power.
    pub battery_power_wear: Cost,

    /// Wear caused by the grid import or export power.
    pub grid_power_wear: Cost,

    /// Net change of the stored energy valued at the mean tariff of the horizon.
    pub level_change: Cost,

    /// Fixed daily charges prorated to the horizon, not affected by the dispatch.
    pub standing_charge: Cost,
}

impl Losses {
    pub fn trading(&self) -> Cost {
        self.grid_import + self.grid_export
    }

    pub fn wear(&self) -> Cost {
        self.battery_energy_wear + self.battery_power_wear + self.grid_power_wear
    }

    /// Objective value, excludes the standing charge.
    pub fn total(&self) -> Cost {
        self.trading() + self.wear() + self.level_change
    }

    /// Total including the standing charge, as it would appear on the bill.
    pub fn billed(&self) -> Cost {
        self.total() + self.standing_charge
    }
}
