use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::calling::bands::strategy_for;
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::qc::{QcIssue, QcIssueKind};

pub struct Stage5Bands;

impl Stage5Bands {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Bands {
    fn name(&self) -> &'static str {
        "stage5_bands"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let qc = ctx.qc.as_mut().context("qc result missing")?;
        let calibration = match (&qc.calibration, qc.is_pass()) {
            (Some(calibration), true) => *calibration,
            _ => {
                info!(status = %qc.status, "qc did not pass, band building skipped");
                return Ok(());
            }
        };

        let strategy = strategy_for(&ctx.config).context("invalid analysis config")?;
        let bands = strategy.build(&calibration);

        for locus in bands.non_monotonic_loci() {
            let b = bands.for_locus(locus);
            let message = format!(
                "{} bands are not increasing: [{}, {}, {}]",
                locus, b.b1, b.b2, b.b3
            );
            warn!(mode = %strategy.mode(), "{}", message);
            if ctx.config.strict_band_order {
                qc.fail_with(QcIssue {
                    kind: QcIssueKind::NonMonotonicBands,
                    role: None,
                    well: None,
                    channel: Some(locus.channel()),
                    message: message.clone(),
                });
            }
            ctx.warnings.push(message);
        }

        if !qc.is_pass() {
            info!("band order failed strict check, samples left unclassified");
            return Ok(());
        }

        info!(
            mode = %strategy.mode(),
            locus1 = ?bands.locus1.as_array(),
            locus2 = ?bands.locus2.as_array(),
            "bands_ready"
        );
        ctx.correction = strategy.correction();
        ctx.bands = Some(bands);
        Ok(())
    }
}
