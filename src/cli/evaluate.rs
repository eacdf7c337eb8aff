use clap::Parser;
use serde::Serialize;

use crate::{
    cli::PlanArgs,
    core::Metrics,
    prelude::*,
    quantity::cost::Cost,
    tables::{build_steps_table, build_summary_table},
};

#[derive(Parser)]
pub struct EvaluateArgs {
    #[clap(flatten)]
    pub plan: PlanArgs,
}

#[derive(Serialize)]
struct Evaluation<'a> {
    decision: &'a [f64],
    energy_cost: Cost,
    billed_cost: Cost,
    baseline: Cost,
    metrics: Metrics,
}

#[instrument(skip_all)]
pub fn evaluate(args: &EvaluateArgs) -> Result {
    let plan = args.plan.load()?;
    let model = &plan.model;
    let simulation = model.simulate(&plan.initial_guess);
    info!(total = %simulation.metrics.losses.total(), "evaluated");

    if args.plan.json {
        let evaluation = Evaluation {
            decision: &plan.initial_guess,
            energy_cost: simulation.metrics.losses.total(),
            billed_cost: simulation.metrics.losses.billed(),
            baseline: model.baseline(),
            metrics: simulation.metrics,
        };
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        println!("{}", build_steps_table(model, &simulation));
        println!("{}", build_summary_table(model, &simulation));
    }
    Ok(())
}
