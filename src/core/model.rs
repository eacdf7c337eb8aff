use std::iter::repeat_n;

use bon::bon;

use crate::{
    core::{
        battery::Battery,
        mode::DispatchMode,
        series::{Slot, SlotSeries},
        solution::{Losses, Metrics, Simulation},
        step::Step,
        wear::{BoundWearCurve, Domain, WearCurve},
    },
    optimizer::Bounds,
    prelude::*,
    quantity::{
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        rate::KilowattHourRate,
    },
};

/// Grid connection power limits, both non-negative.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct GridLimits {
    pub import: Kilowatts,
    pub export: Kilowatts,
}

/// Wear curve shapes of the stressed resources.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct WearCurves {
    pub battery_energy: WearCurve,
    pub battery_power: WearCurve,
    pub grid_power: WearCurve,
}

/// Objective of the dispatch optimization.
///
/// Folds a decision vector over the slot series, threading the battery energy level
/// through the horizon, and prices the grid trading, the wear and the net change of the stored energy.
/// Evaluation is a pure function of the decision vector, so the model may be shared between threads.
#[must_use]
#[derive(Clone, Debug)]
pub struct DispatchCostModel {
    series: SlotSeries,
    mode: DispatchMode,
    battery: Battery,
    grid_limits: GridLimits,
    battery_energy_wear: BoundWearCurve,
    battery_power_wear: BoundWearCurve,
    grid_power_wear: BoundWearCurve,

    /// Fixed import and export charges per day, reported but never optimized.
    daily_standing_charge: Cost,
}

/// Powers requested for a single slot.
#[derive(Copy, Clone)]
struct Control {
    grid: Kilowatts,
    battery: Kilowatts,
    curtailment: Kilowatts,
}

/// Left fold state.
#[derive(Copy, Clone)]
struct Accumulator {
    energy_level: KilowattHours,
    metrics: Metrics,
}

#[bon]
impl DispatchCostModel {
    #[builder]
    pub fn new(
        series: SlotSeries,
        mode: DispatchMode,
        battery: Battery,
        grid_limits: GridLimits,
        wear: WearCurves,
        #[builder(default)]
        daily_standing_charge: Cost,
    ) -> Result<Self> {
        ensure!(
            battery.one_way_efficiency.is_finite()
                && battery.one_way_efficiency > 0.0
                && battery.one_way_efficiency <= 1.0,
            "battery one-way efficiency must be within (0, 1], got {}",
            battery.one_way_efficiency,
        );
        ensure!(
            battery.initial_energy.is_finite(),
            "initial battery energy must be finite, got {}",
            battery.initial_energy,
        );
        for (name, limit) in [
            ("battery charge", battery.max_charge),
            ("battery discharge", battery.max_discharge),
            ("grid import", grid_limits.import),
            ("grid export", grid_limits.export),
        ] {
            ensure!(
                limit.is_finite() && limit >= Kilowatts::ZERO,
                "{name} power limit must be non-negative, got {limit}",
            );
        }

        ensure!(
            daily_standing_charge.is_finite(),
            "daily standing charge must be finite, got {daily_standing_charge}",
        );

        let battery_energy_wear = wear
            .battery_energy
            .bind(Domain::new(0.0, battery.capacity.0))
            .context("invalid battery energy wear curve")?;
        let battery_power_wear = wear
            .battery_power
            .bind(Domain::new(-battery.max_discharge.0, battery.max_charge.0))
            .context("invalid battery power wear curve")?;
        let grid_power_wear = wear
            .grid_power
            .bind(Domain::new(-grid_limits.import.0, grid_limits.export.0))
            .context("invalid grid power wear curve")?;
        for (name, curve) in [
            ("battery energy", battery_energy_wear),
            ("battery power", battery_power_wear),
            ("grid power", grid_power_wear),
        ] {
            debug!(
                name,
                domain = ?curve.domain(),
                normalization_coefficient = curve.normalization_coefficient(),
                "bound wear curve",
            );
        }

        Ok(Self {
            series,
            mode,
            battery,
            grid_limits,
            battery_energy_wear,
            battery_power_wear,
            grid_power_wear,
            daily_standing_charge,
        })
    }
}

impl DispatchCostModel {
    pub const fn series(&self) -> &SlotSeries {
        &self.series
    }

    pub const fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub const fn battery(&self) -> &Battery {
        &self.battery
    }

    /// The same forecast and equipment, but another dispatch mode.
    pub fn with_mode(&self, mode: DispatchMode) -> Self {
        Self { mode, ..self.clone() }
    }

    /// Decision vector length.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.mode.dimension(self.series.len())
    }

    /// Total cost of the decision vector, lower is better.
    ///
    /// # Panics
    ///
    /// When the vector length does not match [`Self::dimension`].
    pub fn evaluate(&self, decision: &[f64]) -> Cost {
        self.fold(decision, |_| {}).losses.total()
    }

    /// Same as [`Self::evaluate`], but keeps the individual steps and the cost breakdown.
    ///
    /// # Panics
    ///
    /// When the vector length does not match [`Self::dimension`].
    pub fn simulate(&self, decision: &[f64]) -> Simulation {
        let mut steps = Vec::with_capacity(self.series.len());
        let metrics = self.fold(decision, |step| steps.push(step));
        Simulation { steps, metrics }
    }

    /// Trading cost of the horizon without using the battery and without curtailing the solar.
    pub fn baseline(&self) -> Cost {
        let duration = self.series.duration();
        self.series
            .iter()
            .map(|slot| {
                let (import, export) = Self::trade(slot, -slot.net_load() * duration);
                import + export
            })
            .sum()
    }

    /// Decision vector which leaves the battery idle and the solar untouched.
    #[must_use]
    pub fn idle_decision(&self) -> Vec<f64> {
        match self.mode {
            DispatchMode::GridControlled => {
                self.series.iter().map(|slot| -slot.net_load().0).collect()
            }
            DispatchMode::BatteryChargeControlled | DispatchMode::BatteryChargeWithSolarClip => {
                vec![0.0; self.dimension()]
            }
        }
    }

    /// Box bounds of the decision vector derived from the power limits.
    #[must_use]
    pub fn bounds(&self) -> Vec<Bounds> {
        let n_slots = self.series.len();
        let battery = Bounds::new(-self.battery.max_discharge.0, self.battery.max_charge.0);
        match self.mode {
            DispatchMode::GridControlled => {
                vec![Bounds::new(-self.grid_limits.import.0, self.grid_limits.export.0); n_slots]
            }
            DispatchMode::BatteryChargeControlled => vec![battery; n_slots],
            DispatchMode::BatteryChargeWithSolarClip => repeat_n(battery, n_slots)
                .chain(self.series.iter().map(|slot| Bounds::new(0.0, slot.solar.0)))
                .collect(),
        }
    }

    fn fold(&self, decision: &[f64], mut inspect: impl FnMut(Step)) -> Metrics {
        assert_eq!(
            decision.len(),
            self.dimension(),
            "decision vector length does not match the dispatch mode",
        );

        let duration = self.series.duration();
        let initial = Accumulator {
            energy_level: self.battery.initial_energy,
            metrics: Metrics::default(),
        };
        let last = self.series.iter().enumerate().fold(initial, |accumulator, (index, slot)| {
            let control = self.control(decision, index, slot);
            let step = self.simulate_step(slot, control, accumulator.energy_level);
            inspect(step);
            Accumulator {
                energy_level: step.energy_level_after,
                metrics: accumulator.metrics + step.metrics(duration),
            }
        });

        let mut metrics = last.metrics;
        metrics.losses.level_change =
            (self.battery.initial_energy - last.energy_level) * self.series.mean_rate();
        metrics.losses.standing_charge = self.daily_standing_charge * self.series.days();
        metrics
    }

    /// Derive the slot powers from the decision vector.
    ///
    /// Whatever is not controlled directly balances the house: `grid + battery + net load + curtailment = 0`.
    fn control(&self, decision: &[f64], index: usize, slot: &Slot) -> Control {
        match self.mode {
            DispatchMode::GridControlled => {
                let grid = Kilowatts::from(decision[index]);
                Control { grid, battery: -grid - slot.net_load(), curtailment: Kilowatts::ZERO }
            }
            DispatchMode::BatteryChargeControlled => {
                let battery = Kilowatts::from(decision[index]);
                Control { grid: -slot.net_load() - battery, battery, curtailment: Kilowatts::ZERO }
            }
            DispatchMode::BatteryChargeWithSolarClip => {
                let battery = Kilowatts::from(decision[index]);
                let curtailment = Kilowatts::from(decision[index + self.series.len()]);
                Control { grid: -(slot.net_load() + curtailment) - battery, battery, curtailment }
            }
        }
    }

    fn simulate_step(
        &self,
        slot: &Slot,
        control: Control,
        energy_level_before: KilowattHours,
    ) -> Step {
        let duration = self.series.duration();
        let grid_flow = control.grid * duration;
        let battery_flow = control.battery * duration;
        let energy_level_after = self.battery.apply(energy_level_before, battery_flow);
        let (grid_import, grid_export) = Self::trade(slot, grid_flow);

        let battery_energy_wear_rate =
            KilowattHourRate::from(self.battery_energy_wear.cost_rate(energy_level_after.0));
        let battery_power_wear_rate =
            KilowattHourRate::from(self.battery_power_wear.cost_rate(control.battery.0));
        let grid_power_wear_rate =
            KilowattHourRate::from(self.grid_power_wear.cost_rate(control.grid.0));

        Step {
            grid: control.grid,
            battery: control.battery,
            curtailment: control.curtailment,
            energy_level_before,
            energy_level_after,
            losses: Losses {
                grid_import,
                grid_export,
                battery_energy_wear: battery_flow.abs() * battery_energy_wear_rate,
                battery_power_wear: battery_flow.abs() * battery_power_wear_rate,
                grid_power_wear: grid_flow.abs() * grid_power_wear_rate,
                level_change: Cost::ZERO,
                standing_charge: Cost::ZERO,
            },
        }
    }

    /// Price the grid flow: export is earned at the export rate, import is paid at the import rate.
    ///
    /// # Returns
    ///
    /// Import cost and export cost, the latter is negative.
    fn trade(slot: &Slot, grid_flow: KilowattHours) -> (Cost, Cost) {
        if grid_flow > KilowattHours::ZERO {
            (Cost::ZERO, -(grid_flow * slot.export_rate))
        } else {
            (-(grid_flow * slot.import_rate), Cost::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::quantity::{Quantity, time::Hours};

    const WEAR: WearCurves = WearCurves {
        battery_energy: WearCurve {
            cost_average: 0.05,
            constant_coefficient: 0.5,
            exponential_coefficient: 1.0,
            activation: 0.5,
        },
        battery_power: WearCurve {
            cost_average: 0.02,
            constant_coefficient: 0.8,
            exponential_coefficient: 1.0,
            activation: 0.2,
        },
        grid_power: WearCurve {
            cost_average: 0.01,
            constant_coefficient: 0.9,
            exponential_coefficient: 1.0,
            activation: 0.2,
        },
    };

    const BATTERY: Battery = Battery {
        capacity: Quantity(10.0),
        one_way_efficiency: 0.95,
        max_charge: Quantity(3.0),
        max_discharge: Quantity(3.0),
        initial_energy: Quantity(5.0),
    };

    const GRID_LIMITS: GridLimits = GridLimits { import: Quantity(6.0), export: Quantity(4.0) };

    #[derive(Clone)]
    struct Forecast {
        import_rates: Vec<f64>,
        export_rates: Vec<f64>,
        loads: Vec<f64>,
        solar: Vec<f64>,
        duration: f64,
    }

    impl Forecast {
        fn day() -> Self {
            Self {
                import_rates: vec![0.10, 0.12, 0.30, 0.35, 0.20, 0.15],
                export_rates: vec![0.05, 0.05, 0.08, 0.10, 0.06, 0.05],
                loads: vec![0.4, 0.5, 1.2, 2.0, 0.8, 0.6],
                solar: vec![0.0, 1.5, 3.0, 0.5, 0.0, 0.0],
                duration: 0.5,
            }
        }

        fn series(&self) -> SlotSeries {
            SlotSeries::builder()
                .import_rates(&self.import_rates)
                .export_rates(&self.export_rates)
                .loads(&self.loads)
                .solar(&self.solar)
                .duration(Hours::from(self.duration))
                .build()
                .unwrap()
        }

        fn model(&self, mode: DispatchMode, battery: Battery) -> DispatchCostModel {
            DispatchCostModel::builder()
                .series(self.series())
                .mode(mode)
                .battery(battery)
                .grid_limits(GRID_LIMITS)
                .wear(WEAR)
                .build()
                .unwrap()
        }
    }

    /// Deterministic, but irregular decision vector.
    fn wiggle(dimension: usize) -> Vec<f64> {
        (0..dimension)
            .map(|i| {
                #[expect(clippy::cast_precision_loss)]
                let i = i as f64;
                2.5 * 1.7f64.mul_add(i, 0.3).sin()
            })
            .collect()
    }

    const ALL_MODES: [DispatchMode; 3] = [
        DispatchMode::GridControlled,
        DispatchMode::BatteryChargeControlled,
        DispatchMode::BatteryChargeWithSolarClip,
    ];

    /// Import exactly the load with the battery idle.
    #[test]
    fn test_single_slot_import() {
        let forecast = Forecast {
            import_rates: vec![0.30],
            export_rates: vec![0.10],
            loads: vec![1.0],
            solar: vec![0.0],
            duration: 1.0,
        };
        let model = forecast.model(DispatchMode::GridControlled, BATTERY);
        let simulation = model.simulate(&[-1.0]);
        let losses = simulation.metrics.losses;

        assert_abs_diff_eq!(simulation.steps[0].battery.0, 0.0);
        assert_abs_diff_eq!(losses.grid_import.0, 0.30, epsilon = 1e-12);
        assert_abs_diff_eq!(losses.grid_export.0, 0.0);
        assert_abs_diff_eq!(losses.battery_energy_wear.0, 0.0);
        assert_abs_diff_eq!(losses.battery_power_wear.0, 0.0);
        assert_abs_diff_eq!(losses.grid_power_wear.0, model.grid_power_wear.cost_rate(-1.0));
        assert_abs_diff_eq!(losses.level_change.0, 0.0);
        assert_abs_diff_eq!(
            model.evaluate(&[-1.0]).0,
            0.30 + model.grid_power_wear.cost_rate(-1.0),
            epsilon = 1e-12,
        );
    }

    #[test]
    fn test_zero_flow_is_idempotent() {
        let forecast = Forecast {
            import_rates: vec![0.30, 0.20, 0.10],
            export_rates: vec![0.10, 0.05, 0.02],
            loads: vec![1.0, 0.5, 2.0],
            solar: vec![1.0, 0.5, 2.0],
            duration: 0.5,
        };
        for mode in ALL_MODES {
            let model = forecast.model(mode, BATTERY);
            let simulation = model.simulate(&model.idle_decision());
            let last_step = simulation.steps.last().unwrap();
            assert_eq!(last_step.energy_level_after, BATTERY.initial_energy, "{mode:?}");
            assert_eq!(simulation.metrics.losses.level_change, Cost::ZERO, "{mode:?}");
            assert_abs_diff_eq!(simulation.metrics.losses.total().0, 0.0);
        }
    }

    /// With lossless conversion, the stored energy moves exactly by the external battery flow.
    #[test]
    fn test_energy_conservation() {
        let forecast = Forecast::day();
        let duration = forecast.series().duration();
        let battery = Battery { one_way_efficiency: 1.0, ..BATTERY };
        for mode in ALL_MODES {
            let model = forecast.model(mode, battery);
            let simulation = model.simulate(&wiggle(model.dimension()));
            let battery_flow: KilowattHours =
                simulation.steps.iter().map(|step| step.battery * duration).sum();
            let last_step = simulation.steps.last().unwrap();
            assert_abs_diff_eq!(
                battery_flow.0,
                (last_step.energy_level_after - BATTERY.initial_energy).0,
                epsilon = 1e-12,
            );
        }
    }

    /// Charging stores `η` of the flow, discharging drains `1 / η` of it.
    #[test]
    fn test_energy_conservation_with_losses() {
        let forecast = Forecast::day();
        let battery = Battery { one_way_efficiency: 0.9, ..BATTERY };
        for mode in ALL_MODES {
            let model = forecast.model(mode, battery);
            let simulation = model.simulate(&wiggle(model.dimension()));
            let metrics = simulation.metrics;
            let stored = metrics.battery_charge * 0.9 - metrics.battery_discharge / 0.9;
            let last_step = simulation.steps.last().unwrap();
            assert_abs_diff_eq!(
                stored.0,
                (last_step.energy_level_after - BATTERY.initial_energy).0,
                epsilon = 1e-12,
            );
            assert!(metrics.battery_charge > KilowattHours::ZERO, "{mode:?}");
            assert!(metrics.battery_discharge > KilowattHours::ZERO, "{mode:?}");
        }
    }

    #[test]
    fn test_energy_level_is_threaded() {
        let forecast = Forecast::day();
        let model = forecast.model(DispatchMode::BatteryChargeControlled, BATTERY);
        let simulation = model.simulate(&wiggle(model.dimension()));
        assert_eq!(simulation.steps[0].energy_level_before, BATTERY.initial_energy);
        for (previous, next) in simulation.steps.iter().zip(&simulation.steps[1..]) {
            assert_eq!(previous.energy_level_after, next.energy_level_before);
        }
    }

    #[test]
    fn test_evaluate_matches_simulate() {
        let forecast = Forecast::day();
        for mode in ALL_MODES {
            let model = forecast.model(mode, BATTERY);
            let decision = wiggle(model.dimension());
            assert_abs_diff_eq!(
                model.evaluate(&decision).0,
                model.simulate(&decision).metrics.losses.total().0,
            );
        }
    }

    #[test]
    fn test_asymmetric_efficiency() {
        let forecast = Forecast {
            import_rates: vec![0.2, 0.2],
            export_rates: vec![0.1, 0.1],
            loads: vec![0.0, 0.0],
            solar: vec![0.0, 0.0],
            duration: 0.5,
        };
        let battery = Battery { one_way_efficiency: 0.9, ..BATTERY };
        let model = forecast.model(DispatchMode::BatteryChargeControlled, battery);
        let simulation = model.simulate(&[2.0, -1.8]);
        assert_abs_diff_eq!(simulation.steps[0].energy_level_after.0, 5.9, epsilon = 1e-12);
        assert_abs_diff_eq!(simulation.steps[1].energy_level_after.0, 4.9, epsilon = 1e-12);
    }

    /// Draining the battery is priced at the mean tariff of the horizon.
    #[test]
    fn test_level_change() {
        let forecast = Forecast {
            import_rates: vec![0.3],
            export_rates: vec![0.1],
            loads: vec![2.0],
            solar: vec![0.0],
            duration: 1.0,
        };
        let battery = Battery { one_way_efficiency: 1.0, ..BATTERY };
        let model = forecast.model(DispatchMode::BatteryChargeControlled, battery);
        let losses = model.simulate(&[-2.0]).metrics.losses;
        assert_abs_diff_eq!(losses.level_change.0, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(losses.trading().0, 0.0);
    }

    /// With the stored energy back at its initial level, the tariffs only act through the trading.
    #[test]
    fn test_monotonic_tariff_response() {
        let forecast = Forecast {
            import_rates: vec![0.20, 0.30, 0.10, 0.35],
            export_rates: vec![0.05, 0.05, 0.05, 0.05],
            loads: vec![1.0, 2.0, 0.5, 1.0],
            solar: vec![0.0, 0.0, 3.0, 0.0],
            duration: 0.5,
        };
        let battery = Battery { one_way_efficiency: 1.0, ..BATTERY };
        let charge = [1.0, -1.0, 0.5, -0.5];

        for mode in ALL_MODES {
            // The same level-neutral battery schedule expressed in every mode:
            let decision: Vec<f64> = match mode {
                DispatchMode::GridControlled => forecast
                    .loads
                    .iter()
                    .zip(&forecast.solar)
                    .zip(charge)
                    .map(|((load, solar), charge)| solar - load - charge)
                    .collect(),
                DispatchMode::BatteryChargeControlled => charge.to_vec(),
                DispatchMode::BatteryChargeWithSolarClip => {
                    charge.iter().copied().chain([0.0, 0.0, 1.0, 0.0]).collect()
                }
            };
            let model = forecast.model(mode, battery);
            let simulation = model.simulate(&decision);
            for (step, expected) in simulation.steps.iter().zip(charge) {
                assert_abs_diff_eq!(step.battery.0, expected, epsilon = 1e-12);
            }
            assert_abs_diff_eq!(simulation.metrics.losses.level_change.0, 0.0, epsilon = 1e-12);
            let base_cost = model.evaluate(&decision);

            for index in 0..4 {
                let mut bumped = forecast.clone();
                bumped.import_rates[index] += 0.1;
                let cost = bumped.model(mode, battery).evaluate(&decision);
                assert!(cost.0 >= base_cost.0 - 1e-12, "{mode:?}: import rate #{index}");

                bumped.import_rates[index] -= 0.1;
                bumped.export_rates[index] += 0.1;
                let cost = bumped.model(mode, battery).evaluate(&decision);
                assert!(cost.0 <= base_cost.0 + 1e-12, "{mode:?}: export rate #{index}");
            }
        }
    }

    #[test]
    fn test_standing_charge_is_reported_apart() {
        let forecast = Forecast::day();
        let build = |daily_standing_charge: f64| {
            DispatchCostModel::builder()
                .series(forecast.series())
                .mode(DispatchMode::BatteryChargeControlled)
                .battery(BATTERY)
                .grid_limits(GRID_LIMITS)
                .wear(WEAR)
                .daily_standing_charge(Cost::from(daily_standing_charge))
                .build()
                .unwrap()
        };
        let decision = wiggle(6);
        let plain = build(0.0);
        let charged = build(0.48);
        assert_eq!(plain.evaluate(&decision), charged.evaluate(&decision));

        // Six half-hour slots make an eighth of a day:
        let losses = charged.simulate(&decision).metrics.losses;
        assert_abs_diff_eq!(losses.standing_charge.0, 0.06, epsilon = 1e-12);
        assert_abs_diff_eq!(losses.billed().0, losses.total().0 + 0.06, epsilon = 1e-12);
        assert_eq!(plain.simulate(&decision).metrics.losses.standing_charge, Cost::ZERO);
    }

    #[test]
    fn test_with_mode() {
        let model = Forecast::day().model(DispatchMode::BatteryChargeWithSolarClip, BATTERY);
        let charge_model = model.with_mode(DispatchMode::BatteryChargeControlled);
        assert_eq!(charge_model.dimension(), 6);
        let charge = wiggle(6);
        let clip: Vec<f64> = charge.iter().copied().chain([0.0; 6]).collect();
        assert_eq!(model.evaluate(&clip), charge_model.evaluate(&charge));
    }

    #[test]
    fn test_idle_decision_matches_baseline() {
        let forecast = Forecast::day();
        for mode in ALL_MODES {
            let model = forecast.model(mode, BATTERY);
            let metrics = model.simulate(&model.idle_decision()).metrics;
            assert_abs_diff_eq!(metrics.losses.trading().0, model.baseline().0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_curtailment_reduces_export() {
        let forecast = Forecast {
            import_rates: vec![0.3],
            export_rates: vec![-0.05],
            loads: vec![1.0],
            solar: vec![3.0],
            duration: 1.0,
        };
        let model = forecast.model(DispatchMode::BatteryChargeWithSolarClip, BATTERY);
        let step = model.simulate(&[0.0, 1.5]).steps[0];
        assert_abs_diff_eq!(step.grid.0, 0.5);
        assert!(model.evaluate(&[0.0, 2.0]) < model.evaluate(&[0.0, 0.0]));
    }

    #[test]
    fn test_bounds() {
        let forecast = Forecast::day();

        let bounds = forecast.model(DispatchMode::GridControlled, BATTERY).bounds();
        assert_eq!(bounds.len(), 6);
        assert_eq!(bounds[0], Bounds::new(-6.0, 4.0));

        let bounds = forecast.model(DispatchMode::BatteryChargeControlled, BATTERY).bounds();
        assert_eq!(bounds.len(), 6);
        assert_eq!(bounds[5], Bounds::new(-3.0, 3.0));

        let bounds = forecast.model(DispatchMode::BatteryChargeWithSolarClip, BATTERY).bounds();
        assert_eq!(bounds.len(), 12);
        assert_eq!(bounds[0], Bounds::new(-3.0, 3.0));
        assert_eq!(bounds[8], Bounds::new(0.0, 3.0));
        assert!(bounds.iter().all(|bounds| bounds.is_ordered()));
    }

    #[test]
    fn test_invalid_efficiency() {
        let result = DispatchCostModel::builder()
            .series(Forecast::day().series())
            .mode(DispatchMode::GridControlled)
            .battery(Battery { one_way_efficiency: 0.0, ..BATTERY })
            .grid_limits(GRID_LIMITS)
            .wear(WEAR)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_degenerate_battery_power_domain() {
        let result = DispatchCostModel::builder()
            .series(Forecast::day().series())
            .mode(DispatchMode::GridControlled)
            .battery(Battery { max_charge: Quantity(0.0), max_discharge: Quantity(0.0), ..BATTERY })
            .grid_limits(GRID_LIMITS)
            .wear(WEAR)
            .build();
        assert!(result.is_err());
    }

    #[test]
    #[should_panic(expected = "decision vector length")]
    fn test_wrong_dimension() {
        let model = Forecast::day().model(DispatchMode::BatteryChargeWithSolarClip, BATTERY);
        let _ = model.evaluate(&[0.0; 6]);
    }

    #[test]
    fn test_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DispatchCostModel>();
    }
}
