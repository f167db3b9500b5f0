use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::calling::classify::LocusCall;
use crate::ctx::Ctx;

pub const TSV_HEADER: &str =
    "well\tsample\tlocus1_delta\tlocus1_code\tlocus2_delta\tlocus2_code\tdiagnosis";

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{}", TSV_HEADER)?;
    for r in &ctx.results {
        writeln!(
            w,
            "{}\t{}\t{:.3}\t{}\t{:.3}\t{}\t{}",
            r.well,
            r.sample_name,
            r.locus1.delta,
            code_cell(&r.locus1),
            r.locus2.delta,
            code_cell(&r.locus2),
            r.diagnosis
        )?;
    }
    w.flush()?;

    Ok(())
}

fn code_cell(call: &LocusCall) -> String {
    match call.display_code() {
        Some(c) => c.to_string(),
        None => "NA".to_string(),
    }
}
