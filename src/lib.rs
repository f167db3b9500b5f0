pub mod batch;
pub mod calling;
pub mod cli;
pub mod config;
pub mod ctx;
pub mod io;
pub mod math;
pub mod model;
pub mod pipeline;
pub mod qc;
pub mod schema;

use anyhow::{Context, Result};

use crate::config::AnalysisConfig;
use crate::ctx::Ctx;
use crate::model::{PlateLayout, WellRecord};
use crate::pipeline::Pipeline;
use crate::schema::v1::SmaCnV1;

/// Analyzes already-normalized wells of one plate and returns the result
/// document. Nothing is written to disk.
pub fn analyze_plate(
    wells: Vec<WellRecord>,
    layout: PlateLayout,
    config: AnalysisConfig,
) -> Result<SmaCnV1> {
    let mut ctx = Ctx::from_wells(wells, layout, config);
    Pipeline::standard().run(&mut ctx)?;
    ctx.report.context("pipeline produced no report")
}
