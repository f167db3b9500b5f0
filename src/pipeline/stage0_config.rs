use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage0Config;

impl Stage0Config {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage0Config {
    fn name(&self) -> &'static str {
        "stage0_config"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        ctx.config.validate().context("invalid analysis config")?;
        ctx.layout.validate().context("invalid plate layout")?;
        ctx.profile = ctx.config.profile();

        info!(
            mode = %ctx.config.mode,
            instrument = %ctx.profile.instrument,
            ntc = %ctx.layout.ntc,
            ref1 = %ctx.layout.ref1,
            ref2 = %ctx.layout.ref2,
            "config_ready"
        );
        Ok(())
    }
}
