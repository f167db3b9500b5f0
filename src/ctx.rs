use std::path::{Path, PathBuf};

use crate::calling::bands::{Correction, ThresholdBands};
use crate::calling::classify::ClassificationResult;
use crate::calling::delta::SampleDeltas;
use crate::config::{AnalysisConfig, InstrumentProfile};
use crate::io::plate_reader::sanitize_name;
use crate::model::{CalibrationSet, PlateLayout, WellRecord};
use crate::qc::QcResult;
use crate::schema::v1::SmaCnV1;

const DEFAULT_RUN_ID: &str = "run";

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            json_path: out_dir.join("smacn.json"),
            tsv_path: out_dir.join("smacn.tsv"),
            out_dir,
        }
    }
}

/// State of one plate's run. Every run owns its own context; nothing here
/// is shared between plates.
#[derive(Debug)]
pub struct Ctx {
    pub input: Option<PathBuf>,
    pub layout: PlateLayout,
    pub config: AnalysisConfig,
    pub profile: InstrumentProfile,
    pub write_json: bool,
    pub write_tsv: bool,
    pub run_id: String,
    pub wells: Vec<WellRecord>,
    pub calibration: Option<CalibrationSet>,
    pub samples: Vec<WellRecord>,
    pub sample_deltas: Vec<SampleDeltas>,
    pub qc: Option<QcResult>,
    pub bands: Option<ThresholdBands>,
    pub correction: Correction,
    pub results: Vec<ClassificationResult>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
    pub report: Option<SmaCnV1>,
}

impl Ctx {
    pub fn new(
        input: Option<PathBuf>,
        out_dir: PathBuf,
        layout: PlateLayout,
        config: AnalysisConfig,
        write_json: bool,
        write_tsv: bool,
    ) -> Self {
        let run_id = config
            .run_label()
            .map(sanitize_name)
            .or_else(|| input.as_deref().map(run_id_from_path))
            .unwrap_or_else(|| DEFAULT_RUN_ID.to_string());
        let profile = config.profile();
        Self {
            input,
            layout,
            config,
            profile,
            write_json,
            write_tsv,
            run_id,
            wells: Vec::new(),
            calibration: None,
            samples: Vec::new(),
            sample_deltas: Vec::new(),
            qc: None,
            bands: None,
            correction: Correction::none(),
            results: Vec::new(),
            warnings: Vec::new(),
            output: OutputPaths::new(out_dir),
            report: None,
        }
    }

    /// In-memory run over already-normalized wells; nothing is written.
    pub fn from_wells(wells: Vec<WellRecord>, layout: PlateLayout, config: AnalysisConfig) -> Self {
        let mut ctx = Self::new(None, PathBuf::from("."), layout, config, false, false);
        ctx.wells = wells;
        ctx
    }

    pub fn qc_passed(&self) -> bool {
        self.qc.as_ref().is_some_and(|qc| qc.is_pass())
    }
}

pub fn run_id_from_path(path: &Path) -> String {
    let stem = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.trim_end_matches(".gz"))
        .map(|s| s.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(s))
        .unwrap_or(DEFAULT_RUN_ID);
    sanitize_name(stem)
}
