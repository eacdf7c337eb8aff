mod battery;
mod mode;
mod model;
mod series;
mod solution;
mod step;
mod wear;

pub use self::{
    battery::Battery,
    mode::DispatchMode,
    model::{DispatchCostModel, GridLimits, WearCurves},
    series::SlotSeries,
    solution::{Metrics, Simulation},
    wear::WearCurve,
};
