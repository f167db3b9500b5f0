use anyhow::{Context, Result};
use tracing::info;

use crate::calling::classify::classify_sample;
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage6Classify;

impl Stage6Classify {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Classify {
    fn name(&self) -> &'static str {
        "stage6_classify"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let status = ctx.qc.as_ref().context("qc result missing")?.status;
        if ctx.sample_deltas.len() != ctx.samples.len() {
            anyhow::bail!(
                "deltas ({}) do not match samples ({})",
                ctx.sample_deltas.len(),
                ctx.samples.len()
            );
        }

        ctx.results = ctx
            .samples
            .iter()
            .zip(&ctx.sample_deltas)
            .map(|(record, deltas)| {
                classify_sample(record, deltas, status, ctx.bands.as_ref(), &ctx.correction)
            })
            .collect();

        let valid = ctx.results.iter().filter(|r| r.valid).count();
        info!(samples = ctx.results.len(), valid, "samples_classified");
        Ok(())
    }
}
