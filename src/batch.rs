use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::ctx::{Ctx, run_id_from_path};
use crate::model::PlateLayout;
use crate::pipeline::Pipeline;

/// Settings shared by every plate of a batch. Each plate still gets its own
/// `Ctx`; nothing computed for one plate is visible to another.
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub out_dir: PathBuf,
    pub layout: PlateLayout,
    pub config: AnalysisConfig,
    pub write_json: bool,
    pub write_tsv: bool,
    pub threads: usize,
}

/// Output directory of one plate inside a batch.
pub fn plate_out_dir(out_dir: &Path, input: &Path) -> PathBuf {
    out_dir.join(run_id_from_path(input))
}

/// Runs the standard pipeline over several plates in parallel. Results come
/// back in input order. A run label is suffixed with each plate's file stem.
pub fn run_batch(inputs: &[PathBuf], settings: &BatchSettings) -> Result<Vec<Ctx>> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for input in inputs {
        let run_id = run_id_from_path(input);
        if let Some(prev) = seen.insert(run_id.clone(), input) {
            bail!(
                "inputs {} and {} share run id '{}'",
                prev.display(),
                input.display(),
                run_id
            );
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.threads)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
    info!(
        plates = inputs.len(),
        threads = pool.current_num_threads(),
        "batch started"
    );

    pool.install(|| {
        inputs
            .par_iter()
            .map(|input| run_plate(input, settings))
            .collect::<Result<Vec<_>>>()
    })
}

fn run_plate(input: &Path, settings: &BatchSettings) -> Result<Ctx> {
    let mut config = settings.config.clone();
    let label = config
        .run_label()
        .map(|label| format!("{}-{}", label.trim(), run_id_from_path(input)));
    if label.is_some() {
        config.run_label = label;
    }
    let mut ctx = Ctx::new(
        Some(input.to_path_buf()),
        plate_out_dir(&settings.out_dir, input),
        settings.layout.clone(),
        config,
        settings.write_json,
        settings.write_tsv,
    );
    Pipeline::standard()
        .run(&mut ctx)
        .with_context(|| format!("plate {} failed", input.display()))?;
    Ok(ctx)
}
