use anyhow::Result;
use tracing::{debug, info};

use crate::calling::delta::compute_sample_deltas;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Delta;

impl Stage4Delta {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Delta {
    fn name(&self) -> &'static str {
        "stage4_delta"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.sample_deltas = ctx.samples.iter().map(compute_sample_deltas).collect();

        let mut incomplete = 0usize;
        for (record, deltas) in ctx.samples.iter().zip(&ctx.sample_deltas) {
            if !deltas.locus1.is_computable() || !deltas.locus2.is_computable() {
                incomplete += 1;
                debug!(well = %record.well, "sample missing a Ct reading, delta set to 0");
            }
        }
        info!(
            samples = ctx.sample_deltas.len(),
            incomplete, "deltas_computed"
        );
        Ok(())
    }
}
