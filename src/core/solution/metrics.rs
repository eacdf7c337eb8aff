use derive_more::{Add, AddAssign};
use serde::Serialize;

use crate::{core::solution::Losses, quantity::energy::KilowattHours};

/// Cumulative metrics over the horizon.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Add, AddAssign, Serialize)]
pub struct Metrics {
    pub losses: Losses,

    pub grid_import: KilowattHours,
    pub grid_export: KilowattHours,

    /// External energy flowing into the battery.
    pub battery_charge: KilowattHours,

    /// External energy flowing out of the battery.
    pub battery_discharge: KilowattHours,

    pub curtailment: KilowattHours,
}
