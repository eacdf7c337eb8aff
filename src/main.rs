#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod config;
mod core;
mod ops;
mod optimizer;
mod prelude;
mod quantity;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, evaluate, optimize},
    prelude::*,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Optimize(args) => optimize(&args),
        Command::Evaluate(args) => evaluate(&args),
    }
}
