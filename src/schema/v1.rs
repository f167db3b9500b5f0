use serde::{Deserialize, Serialize};

use crate::calling::diagnosis::Diagnosis;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandsV1 {
    pub locus1: [f64; 3],
    pub locus2: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub mode: String,
    pub run_label: String,
    pub instrument: String,
    pub locus1_factor: f64,
    pub locus2_factor: f64,
    pub bands: Option<BandsV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Levels {
    #[serde(rename = "1n")]
    pub n1: f64,
    #[serde(rename = "2n")]
    pub n2: f64,
    #[serde(rename = "3n")]
    pub n3: f64,
    #[serde(rename = "4n")]
    pub n4: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calibration {
    pub locus1: Levels,
    pub locus2: Levels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QcIssue {
    pub kind: String,
    pub role: Option<String>,
    pub well: Option<String>,
    pub channel: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qc {
    pub run_id: String,
    pub status: String,
    pub calibration: Option<Calibration>,
    pub issues: Vec<QcIssue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocusResult {
    pub delta: f64,
    pub code: Option<u8>,
    pub raw_code: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResult {
    pub well: String,
    pub sample_name: String,
    pub locus1: LocusResult,
    pub locus2: LocusResult,
    pub diagnosis: Diagnosis,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmaCnV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub config: RunConfig,
    pub qc: Qc,
    pub samples: Vec<SampleResult>,
    pub warnings: Vec<String>,
}
