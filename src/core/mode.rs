use std::fmt::{Display, Formatter};

use comfy_table::Color;
use serde::{Deserialize, Serialize};

/// Which control variables the optimizer searches over.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// One variable per slot: the net grid power, export is positive.
    ///
    /// The battery absorbs whatever the grid and the house do not.
    GridControlled,

    /// One variable per slot: the battery charge power, discharge is negative.
    ///
    /// The grid absorbs whatever the battery and the house do not.
    BatteryChargeControlled,

    /// Two variables per slot: the battery charge power, followed by the curtailed solar power.
    BatteryChargeWithSolarClip,
}

impl DispatchMode {
    /// Decision vector length for the horizon of `n_slots`.
    #[must_use]
    pub const fn dimension(self, n_slots: usize) -> usize {
        match self {
            Self::GridControlled | Self::BatteryChargeControlled => n_slots,
            Self::BatteryChargeWithSolarClip => 2 * n_slots,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::GridControlled => Color::Cyan,
            Self::BatteryChargeControlled => Color::Green,
            Self::BatteryChargeWithSolarClip => Color::DarkYellow,
        }
    }
}

impl Display for DispatchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GridControlled => write!(f, "Grid"),
            Self::BatteryChargeControlled => write!(f, "Charge"),
            Self::BatteryChargeWithSolarClip => write!(f, "Charge & clip"),
        }
    }
}
