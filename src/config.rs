//! Planning problem as described by a TOML document.

use std::{fs, iter::repeat_n, path::Path, str::FromStr};

use serde::Deserialize;

use crate::{
    core::{Battery, DispatchCostModel, DispatchMode, GridLimits, SlotSeries, WearCurve, WearCurves},
    optimizer::{Bounds, Minimizer, OptimizationResult, Problem, SumConstraint},
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, power::Kilowatts, time::Hours},
};

#[must_use]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub battery: BatteryConfig,
    pub grid: GridConfig,

    #[serde(default)]
    pub solar: SolarConfig,

    #[serde(default)]
    pub tariff: TariffConfig,

    pub horizon: HorizonConfig,
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub decision: DecisionConfig,
}

#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryConfig {
    pub capacity: KilowattHours,

    /// Efficiency of a single conversion, the round trip is its square.
    pub one_way_efficiency: f64,

    pub max_charge: Kilowatts,
    pub max_discharge: Kilowatts,
    pub initial_energy: KilowattHours,
    pub wear: BatteryWearConfig,
}

#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatteryWearConfig {
    /// Stress of the stored energy level.
    pub energy: WearCurve,

    /// Stress of the charge and discharge power.
    pub power: WearCurve,
}

#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub import_limit: Kilowatts,
    pub export_limit: Kilowatts,
    pub wear: WearCurve,
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarConfig {
    /// Inverter generation limit, the forecast is capped at it.
    pub generation_limit: Option<Kilowatts>,
}

/// Fixed charges per day, independent of the energy traded.
#[must_use]
#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TariffConfig {
    #[serde(default)]
    pub standing_import: Cost,

    #[serde(default)]
    pub standing_export: Cost,
}

#[must_use]
#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HorizonConfig {
    /// Slot duration in hours.
    pub slot_duration: Hours,

    pub mode: DispatchMode,
}

/// Parallel per-slot arrays.
#[must_use]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastConfig {
    pub import_rates: Vec<f64>,
    pub export_rates: Vec<f64>,
    pub loads: Vec<f64>,
    pub solar: Vec<f64>,
}

#[must_use]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionConfig {
    /// Starting point of the search, defaults to the idle decision.
    pub initial_guess: Option<Vec<f64>>,

    /// Per-variable `[min, max]` pairs, default to the power limits.
    pub bounds: Option<Vec<(f64, f64)>>,

    /// Tolerance of the stored energy sum constraint, enables the constraint when set.
    pub sum_tolerance: Option<f64>,
}

/// Validated planning problem, ready for the optimizer.
#[must_use]
pub struct Plan {
    pub model: DispatchCostModel,
    pub initial_guess: Vec<f64>,

    /// Whether the initial guess came from the configuration rather than the idle default.
    pub has_initial_guess: bool,

    pub bounds: Vec<Bounds>,
    pub sum_tolerance: Option<f64>,
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let this = contents
            .parse::<Self>()
            .with_context(|| format!("failed to parse `{}`", path.display()))?;
        debug!(n_slots = this.forecast.import_rates.len(), "loaded");
        Ok(this)
    }

    /// Validate the configuration and build the planning problem.
    ///
    /// The `mode` overrides the configured dispatch mode.
    pub fn into_plan(self, mode: Option<DispatchMode>) -> Result<Plan> {
        let mode = mode.unwrap_or(self.horizon.mode);
        let series = SlotSeries::builder()
            .import_rates(&self.forecast.import_rates)
            .export_rates(&self.forecast.export_rates)
            .loads(&self.forecast.loads)
            .solar(&self.forecast.solar)
            .duration(self.horizon.slot_duration)
            .maybe_solar_limit(self.solar.generation_limit)
            .build()
            .context("invalid forecast")?;
        ensure!(
            self.battery.capacity.is_finite() && self.battery.capacity > KilowattHours::ZERO,
            "battery capacity must be positive, got {}",
            self.battery.capacity,
        );
        let model = DispatchCostModel::builder()
            .series(series)
            .mode(mode)
            .battery(Battery {
                capacity: self.battery.capacity,
                one_way_efficiency: self.battery.one_way_efficiency,
                max_charge: self.battery.max_charge,
                max_discharge: self.battery.max_discharge,
                initial_energy: self.battery.initial_energy,
            })
            .grid_limits(GridLimits {
                import: self.grid.import_limit,
                export: self.grid.export_limit,
            })
            .wear(WearCurves {
                battery_energy: self.battery.wear.energy,
                battery_power: self.battery.wear.power,
                grid_power: self.grid.wear,
            })
            .daily_standing_charge(self.tariff.standing_import + self.tariff.standing_export)
            .build()?;

        let dimension = model.dimension();
        let has_initial_guess = self.decision.initial_guess.is_some();
        let initial_guess = match self.decision.initial_guess {
            Some(initial_guess) => {
                ensure!(
                    initial_guess.len() == dimension,
                    "the `{mode:?}` mode expects an initial guess of {dimension} values, got {}",
                    initial_guess.len(),
                );
                ensure!(
                    initial_guess.iter().all(|x| x.is_finite()),
                    "the initial guess must be finite",
                );
                initial_guess
            }
            None => model.idle_decision(),
        };
        let bounds = match self.decision.bounds {
            Some(pairs) => {
                ensure!(
                    pairs.len() == dimension,
                    "the `{mode:?}` mode expects {dimension} bound pairs, got {}",
                    pairs.len(),
                );
                pairs
                    .into_iter()
                    .enumerate()
                    .map(|(index, (min, max))| {
                        let bounds = Bounds::new(min, max);
                        ensure!(
                            min.is_finite() && max.is_finite() && bounds.is_ordered(),
                            "bounds #{index} must be a finite `[min, max]` pair, got {bounds:?}",
                        );
                        Ok(bounds)
                    })
                    .collect::<Result<Vec<_>>>()?
            }
            None => model.bounds(),
        };
        if let Some(tolerance) = self.decision.sum_tolerance {
            ensure!(
                tolerance.is_finite() && tolerance >= 0.0,
                "sum tolerance must be non-negative, got {tolerance}",
            );
        }

        Ok(Plan {
            model,
            initial_guess,
            has_initial_guess,
            bounds,
            sum_tolerance: self.decision.sum_tolerance,
        })
    }
}

impl Plan {
    /// Pin the net battery charge of the initial guess, if enabled either way.
    ///
    /// The grid-controlled mode has no charge variables: the `force` flag is an error there,
    /// and the configured tolerance is ignored.
    pub fn sum_constraint(&self, force: bool) -> Result<Option<SumConstraint>> {
        if !force && self.sum_tolerance.is_none() {
            return Ok(None);
        }
        if self.model.mode() == DispatchMode::GridControlled {
            ensure!(!force, "the sum constraint requires the battery charge to be the decision");
            warn!("the sum tolerance does not apply to the grid-controlled mode, ignoring");
            return Ok(None);
        }
        let charge = &self.initial_guess[..self.model.series().len()];
        let tolerance = self.sum_tolerance.unwrap_or(SumConstraint::DEFAULT_TOLERANCE);
        Ok(Some(SumConstraint::around(charge, tolerance)))
    }

    pub fn minimize(
        &self,
        minimizer: &impl Minimizer,
        sum_constraint: Option<SumConstraint>,
    ) -> OptimizationResult {
        let objective = |x: &[f64]| self.model.evaluate(x).0;
        let problem = Problem::builder()
            .objective(&objective)
            .initial_guess(&self.initial_guess)
            .bounds(&self.bounds)
            .maybe_sum_constraint(sum_constraint)
            .build();
        minimizer.minimize(&problem)
    }

    /// Seed the solar clip search with the battery-charge-only optimum and no curtailment.
    ///
    /// Only applies to the solar clip mode with the default initial guess.
    /// The clip search then starts at least as good as the charge-only one.
    #[instrument(skip_all)]
    pub fn warm_start(
        &mut self,
        minimizer: &impl Minimizer,
        sum_constraint: Option<SumConstraint>,
    ) -> Option<OptimizationResult> {
        if self.model.mode() != DispatchMode::BatteryChargeWithSolarClip || self.has_initial_guess {
            return None;
        }
        let n_slots = self.model.series().len();
        let charge_plan = Self {
            model: self.model.with_mode(DispatchMode::BatteryChargeControlled),
            initial_guess: self.initial_guess[..n_slots].to_vec(),
            has_initial_guess: false,
            bounds: self.bounds[..n_slots].to_vec(),
            sum_tolerance: self.sum_tolerance,
        };
        info!("warming up without curtailment…");
        let result = charge_plan.minimize(minimizer, sum_constraint);
        self.initial_guess = result.optimum.iter().copied().chain(repeat_n(0.0, n_slots)).collect();
        Some(result)
    }
}
