use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_config;
pub mod stage1_input;
pub mod stage2_layout;
pub mod stage3_qc;
pub mod stage4_delta;
pub mod stage5_bands;
pub mod stage6_classify;
pub mod stage7_output;

use stage0_config::Stage0Config;
use stage1_input::Stage1Input;
use stage2_layout::Stage2Layout;
use stage3_qc::Stage3Qc;
use stage4_delta::Stage4Delta;
use stage5_bands::Stage5Bands;
use stage6_classify::Stage6Classify;
use stage7_output::Stage7Output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Full analysis of one plate, from ingestion to the result document.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(Stage0Config::new()),
            Box::new(Stage1Input::new()),
            Box::new(Stage2Layout::new()),
            Box::new(Stage3Qc::new()),
            Box::new(Stage4Delta::new()),
            Box::new(Stage5Bands::new()),
            Box::new(Stage6Classify::new()),
            Box::new(Stage7Output::new()),
        ])
    }

    /// Ingestion and calibration QC only.
    pub fn validate() -> Self {
        Self::new(vec![
            Box::new(Stage0Config::new()),
            Box::new(Stage1Input::new()),
            Box::new(Stage2Layout::new()),
            Box::new(Stage3Qc::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        info!(run_id = %ctx.run_id, stages = self.stages.len(), "pipeline started");
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
