use bon::bon;

use crate::{
    prelude::*,
    quantity::{Quantity, power::Kilowatts, rate::KilowattHourRate, time::Hours},
};

/// Forecast for a single time slot.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Slot {
    pub import_rate: KilowattHourRate,
    pub export_rate: KilowattHourRate,

    /// House consumption.
    pub load: Kilowatts,

    /// Solar generation, already capped at the generation limit.
    pub solar: Kilowatts,
}

impl Slot {
    pub fn mean_rate(&self) -> KilowattHourRate {
        KilowattHourRate::midpoint(self.import_rate, self.export_rate)
    }

    /// Consumption not covered by the solar generation, negative is excess solar.
    pub fn net_load(&self) -> Kilowatts {
        self.load - self.solar
    }
}

/// Chronologically ordered forecast for the optimization horizon.
#[must_use]
#[derive(Clone, Debug)]
pub struct SlotSeries {
    slots: Vec<Slot>,
    duration: Hours,
}

#[bon]
impl SlotSeries {
    #[builder]
    pub fn new(
        import_rates: &[f64],
        export_rates: &[f64],
        loads: &[f64],
        solar: &[f64],

        duration: Hours,

        // Solar generation above the limit is lost in the inverter:
        solar_limit: Option<Kilowatts>,
    ) -> Result<Self> {
        let n_slots = import_rates.len();
        ensure!(n_slots != 0, "the horizon must contain at least one slot");
        for (name, values) in
            [("export rates", export_rates), ("loads", loads), ("solar generation", solar)]
        {
            ensure!(
                values.len() == n_slots,
                "expected {n_slots} {name} to match the import rates, got {}",
                values.len(),
            );
        }
        ensure!(
            duration.is_finite() && duration > Hours::ZERO,
            "slot duration must be positive, got {duration}",
        );
        if let Some(solar_limit) = solar_limit {
            ensure!(
                solar_limit.is_finite() && solar_limit >= Kilowatts::ZERO,
                "solar generation limit must be non-negative, got {solar_limit}",
            );
        }

        let slots = (0..n_slots)
            .map(|index| {
                let slot = Slot {
                    import_rate: Quantity(import_rates[index]),
                    export_rate: Quantity(export_rates[index]),
                    load: Quantity(loads[index]),
                    solar: Quantity(solar[index]),
                };
                ensure!(
                    slot.import_rate.is_finite()
                        && slot.export_rate.is_finite()
                        && slot.load.is_finite()
                        && slot.solar.is_finite(),
                    "slot #{index} contains a non-finite value: {slot:?}",
                );
                ensure!(
                    slot.solar >= Kilowatts::ZERO,
                    "slot #{index} has negative solar generation: {}",
                    slot.solar,
                );
                let solar = solar_limit.map_or(slot.solar, |limit| slot.solar.min(limit));
                Ok(Slot { solar, ..slot })
            })
            .collect::<Result<_>>()?;

        Ok(Self { slots, duration })
    }
}

impl SlotSeries {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.slots.len()
    }

    pub const fn duration(&self) -> Hours {
        self.duration
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Horizon length in days.
    #[must_use]
    pub fn days(&self) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let n_slots = self.slots.len() as f64;
        self.duration.0 * n_slots / 24.0
    }

    /// Mean of the import and export tariff midpoints over the horizon.
    pub fn mean_rate(&self) -> KilowattHourRate {
        #[expect(clippy::cast_precision_loss)]
        let n_slots = self.slots.len() as f64;
        self.slots.iter().map(Slot::mean_rate).sum::<KilowattHourRate>() / n_slots
    }
}
