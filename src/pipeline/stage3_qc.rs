use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::qc::validate_calibration;

pub struct Stage3Qc;

impl Stage3Qc {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Qc {
    fn name(&self) -> &'static str {
        "stage3_qc"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let calibration = ctx
            .calibration
            .as_ref()
            .context("calibration wells not resolved")?;
        let criteria = ctx.config.qc_criteria();
        ctx.qc = Some(validate_calibration(calibration, &criteria, &ctx.run_id));
        Ok(())
    }
}
