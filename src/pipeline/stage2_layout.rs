use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::model::partition_plate;
use crate::pipeline::Stage;

pub struct Stage2Layout;

impl Stage2Layout {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Layout {
    fn name(&self) -> &'static str {
        "stage2_layout"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let partition = partition_plate(&ctx.wells, &ctx.layout);
        ctx.warnings.extend(partition.warnings);
        for role in &partition.missing_controls {
            ctx.warnings.push(format!("{} well not found on plate", role));
        }

        info!(
            samples = partition.samples.len(),
            missing_controls = partition.missing_controls.len(),
            "layout_resolved"
        );
        ctx.calibration = Some(partition.calibration);
        ctx.samples = partition.samples;
        Ok(())
    }
}
