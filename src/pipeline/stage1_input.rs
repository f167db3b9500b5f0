use anyhow::Result;
use tracing::{debug, info};

use crate::ctx::Ctx;
use crate::io::plate_reader;
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let Some(input) = ctx.input.clone() else {
            debug!(wells = ctx.wells.len(), "no input file, using in-memory wells");
            return Ok(());
        };

        let plate = plate_reader::read_plate(&input, &ctx.profile)?;
        if ctx.config.run_label().is_none() {
            ctx.run_id = plate.run_id;
        }
        ctx.wells = plate.wells;
        ctx.warnings.extend(plate.warnings);

        info!(run_id = %ctx.run_id, wells = ctx.wells.len(), "input_ready");
        Ok(())
    }
}
