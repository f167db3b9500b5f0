use std::path::Path;

use anyhow::{Context, Result};

use crate::calling::classify::{ClassificationResult, LocusCall};
use crate::ctx::Ctx;
use crate::model::Locus;
use crate::qc::{CalibrationLevels, QcResult};
use crate::schema::v1::{
    BandsV1, Calibration, Levels, LocusResult, Qc, QcIssue, RunConfig, SampleResult, SmaCnV1,
};

pub fn build_report(ctx: &Ctx) -> Result<SmaCnV1> {
    let qc = ctx.qc.as_ref().context("qc result missing")?;

    let config = RunConfig {
        mode: ctx.config.mode.to_string(),
        run_label: ctx.run_id.clone(),
        instrument: ctx.profile.instrument.to_string(),
        locus1_factor: ctx.correction.factor(Locus::Locus1),
        locus2_factor: ctx.correction.factor(Locus::Locus2),
        bands: ctx.bands.as_ref().map(|b| BandsV1 {
            locus1: b.locus1.as_array(),
            locus2: b.locus2.as_array(),
        }),
    };

    let samples = ctx.results.iter().map(sample_result).collect();

    Ok(SmaCnV1 {
        tool: "kira-smacn".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        config,
        qc: qc_section(qc),
        samples,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, report: &SmaCnV1) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

fn qc_section(qc: &QcResult) -> Qc {
    let levels = |l: &CalibrationLevels| Levels {
        n1: l.n1,
        n2: l.n2,
        n3: l.n3,
        n4: l.n4,
    };
    Qc {
        run_id: qc.run_id.clone(),
        status: qc.status.to_string(),
        calibration: qc.calibration.as_ref().map(|c| Calibration {
            locus1: levels(&c.locus1),
            locus2: levels(&c.locus2),
        }),
        issues: qc
            .issues
            .iter()
            .map(|i| QcIssue {
                kind: i.kind.as_str().to_string(),
                role: i.role.map(|r| r.to_string()),
                well: i.well.clone(),
                channel: i.channel.map(|c| c.to_string()),
                message: i.message.clone(),
            })
            .collect(),
    }
}

fn sample_result(r: &ClassificationResult) -> SampleResult {
    let locus = |call: &LocusCall| LocusResult {
        delta: call.delta,
        code: call.display_code(),
        raw_code: call.code,
    };
    SampleResult {
        well: r.well.clone(),
        sample_name: r.sample_name.clone(),
        locus1: locus(&r.locus1),
        locus2: locus(&r.locus2),
        diagnosis: r.diagnosis,
        valid: r.valid,
    }
}
