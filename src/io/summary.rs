use anyhow::{Result, bail};

use crate::calling::diagnosis::Diagnosis;
use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let Some(qc) = ctx.qc.as_ref() else {
        bail!("qc result missing");
    };

    let mut out = String::new();
    out.push_str(&format!("kira-smacn v{}\n", version));
    out.push_str(&format!(
        "Run: {}, mode={}, instrument={}\n",
        ctx.run_id, ctx.config.mode, ctx.profile.instrument
    ));
    out.push_str(&format!("QC: {} ({} issues)\n", qc.status, qc.issues.len()));
    out.push_str(&format!("Samples: {}\n", ctx.results.len()));

    let parts: Vec<String> = Diagnosis::ALL
        .iter()
        .filter_map(|d| {
            let n = ctx.results.iter().filter(|r| r.diagnosis == *d).count();
            (n > 0).then(|| format!("{}={}", d, n))
        })
        .collect();
    if parts.is_empty() {
        out.push_str("Diagnoses: none\n");
    } else {
        out.push_str(&format!("Diagnoses: {}\n", parts.join(", ")));
    }
    for r in ctx.results.iter().filter(|r| r.diagnosis.is_affected()) {
        out.push_str(&format!(
            "  {} {}: {}\n",
            r.well,
            r.sample_name,
            r.diagnosis.label()
        ));
    }

    Ok(out)
}

pub fn format_qc(ctx: &Ctx) -> Result<String> {
    let Some(qc) = ctx.qc.as_ref() else {
        bail!("qc result missing");
    };
    let mut out = String::new();
    out.push_str(&format!("kira-smacn validate: {}\n", qc.status));
    out.push_str(&format!("run: {}\n", qc.run_id));
    out.push_str(&format!("wells: {}\n", ctx.wells.len()));
    out.push_str(&format!("samples: {}\n", ctx.samples.len()));
    if let Some(cal) = &qc.calibration {
        for (name, l) in [("locus1", &cal.locus1), ("locus2", &cal.locus2)] {
            out.push_str(&format!(
                "{}: 1n={:.3} 2n={:.3} 3n={:.3} 4n={:.3}\n",
                name, l.n1, l.n2, l.n3, l.n4
            ));
        }
    }
    for issue in &qc.issues {
        out.push_str(&format!("- {}\n", issue));
    }
    Ok(out)
}
