mod evaluate;
mod optimize;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use self::{
    evaluate::{EvaluateArgs, evaluate},
    optimize::{OptimizeArgs, optimize},
};
use crate::{
    config::{Config, Plan},
    core::DispatchMode,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search for the lowest-cost dispatch over the horizon.
    #[clap(name = "optimize")]
    Optimize(Box<OptimizeArgs>),

    /// Price the initial guess without optimizing.
    #[clap(name = "evaluate")]
    Evaluate(Box<EvaluateArgs>),
}

#[derive(Parser)]
pub struct PlanArgs {
    /// TOML file with the battery, grid, forecast and decision settings.
    #[clap(long, env = "DISPATCH_CONFIG", default_value = "dispatch.toml")]
    pub config: PathBuf,

    /// Override the configured dispatch mode.
    #[clap(long, env = "DISPATCH_MODE")]
    pub mode: Option<DispatchMode>,

    /// Print a JSON record instead of the tables.
    #[clap(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn load(&self) -> Result<Plan> {
        Config::read_from(&self.config)?
            .into_plan(self.mode)
            .with_context(|| format!("invalid configuration in `{}`", self.config.display()))
    }
}
