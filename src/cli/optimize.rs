use clap::Parser;
use serde::Serialize;

use crate::{
    cli::PlanArgs,
    optimizer::{NelderMead, OptimizationResult},
    prelude::*,
    quantity::cost::Cost,
    tables::{build_result_table, build_steps_table, build_summary_table},
};

#[derive(Parser)]
pub struct OptimizeArgs {
    #[clap(flatten)]
    pub plan: PlanArgs,

    #[clap(long, env = "MAX_ITERATIONS", default_value = "20000")]
    pub max_iterations: usize,

    #[clap(long, env = "MAX_EVALUATIONS", default_value = "100000")]
    pub max_evaluations: usize,

    /// Objective spread of the simplex at which the search stops.
    #[clap(long, env = "TOLERANCE", default_value = "1e-8")]
    pub tolerance: f64,

    /// Keep the net battery charge of the initial guess.
    #[clap(long, env = "CONSTRAIN_SUM")]
    pub constrain_sum: bool,

    /// Scale the simplex coefficients with the dimension.
    #[clap(long, env = "ADAPTIVE")]
    pub adaptive: bool,
}

/// JSON record of the optimization.
#[derive(Serialize)]
struct Record<'a> {
    #[serde(flatten)]
    result: &'a OptimizationResult,

    standing_charge: Cost,

    /// Energy cost plus the standing charge.
    billed_cost: Cost,
}

#[instrument(skip_all)]
pub fn optimize(args: &OptimizeArgs) -> Result {
    ensure!(
        args.tolerance.is_finite() && args.tolerance > 0.0,
        "tolerance must be positive, got {}",
        args.tolerance,
    );
    let mut plan = args.plan.load()?;
    let sum_constraint = plan.sum_constraint(args.constrain_sum)?;
    info!(
        mode = ?plan.model.mode(),
        n_slots = plan.model.series().len(),
        dimension = plan.model.dimension(),
        constrained = sum_constraint.is_some(),
        "optimizing…",
    );

    let minimizer = NelderMead::builder()
        .max_iterations(args.max_iterations)
        .max_evaluations(args.max_evaluations)
        .objective_tolerance(args.tolerance)
        .adaptive(args.adaptive)
        .build();
    if let Some(warm_up) = plan.warm_start(&minimizer, sum_constraint) {
        info!(
            energy_cost = warm_up.objective_value,
            evaluations = warm_up.evaluations,
            "warmed up without curtailment",
        );
    }
    let result = plan.minimize(&minimizer, sum_constraint);
    let model = &plan.model;
    let simulation = model.simulate(&result.optimum);

    if args.plan.json {
        let losses = &simulation.metrics.losses;
        let record = Record {
            result: &result,
            standing_charge: losses.standing_charge,
            billed_cost: losses.billed(),
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", build_steps_table(model, &simulation));
        println!("{}", build_summary_table(model, &simulation));
        println!("{}", build_result_table(&result));
    }
    Ok(())
}
