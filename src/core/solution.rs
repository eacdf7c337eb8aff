mod losses;
mod metrics;

pub use self::{losses::Losses, metrics::Metrics};
use crate::core::step::Step;

/// Full simulation of a decision vector.
#[must_use]
pub struct Simulation {
    pub steps: Vec<Step>,
    pub metrics: Metrics,
}
