use crate::quantity::{Quantity, energy::KilowattHours, power::Kilowatts};

/// Static battery parameters.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Battery {
    pub capacity: KilowattHours,

    /// Efficiency of a single conversion, so that the round trip is its square.
    pub one_way_efficiency: f64,

    pub max_charge: Kilowatts,
    pub max_discharge: Kilowatts,

    /// Stored energy at the start of the horizon.
    pub initial_energy: KilowattHours,
}

impl Battery {
    /// Apply the external energy flow to the stored energy.
    ///
    /// Positive flow charges the battery, which stores less than it receives.
    /// Negative flow discharges it, which drains more than it delivers.
    /// The stored energy is not clamped to the capacity: the energy wear curve penalizes the excess.
    pub fn apply(&self, energy_level: KilowattHours, flow: KilowattHours) -> KilowattHours {
        if flow > Quantity::ZERO {
            energy_level + flow * self.one_way_efficiency
        } else {
            energy_level + flow / self.one_way_efficiency
        }
    }
}
