use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ConfigError;
use crate::model::WellRecord;

/// Caller-supplied positions of the three calibration wells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateLayout {
    pub ntc: String,
    pub ref1: String,
    pub ref2: String,
}

impl PlateLayout {
    pub fn new(ntc: impl Into<String>, ref1: impl Into<String>, ref2: impl Into<String>) -> Self {
        Self {
            ntc: ntc.into().trim().to_string(),
            ref1: ref1.into().trim().to_string(),
            ref2: ref2.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (role, well) in self.wells() {
            if well.is_empty() {
                return Err(ConfigError::EmptyLayoutWell { role: role.to_string() });
            }
        }
        let wells = self.wells();
        for i in 0..wells.len() {
            for j in (i + 1)..wells.len() {
                if same_well(wells[i].1, wells[j].1) {
                    return Err(ConfigError::DuplicateLayoutWell {
                        well: wells[i].1.to_string(),
                        first: wells[i].0.to_string(),
                        second: wells[j].0.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn role_of(&self, well: &str) -> WellRole {
        if same_well(well, &self.ntc) {
            WellRole::Ntc
        } else if same_well(well, &self.ref1) {
            WellRole::Ref1
        } else if same_well(well, &self.ref2) {
            WellRole::Ref2
        } else {
            WellRole::Sample
        }
    }

    fn wells(&self) -> [(WellRole, &str); 3] {
        [
            (WellRole::Ntc, self.ntc.as_str()),
            (WellRole::Ref1, self.ref1.as_str()),
            (WellRole::Ref2, self.ref2.as_str()),
        ]
    }
}

fn same_well(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellRole {
    Ntc,
    Ref1,
    Ref2,
    Sample,
}

impl fmt::Display for WellRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ntc => "ntc",
            Self::Ref1 => "ref1",
            Self::Ref2 => "ref2",
            Self::Sample => "sample",
        };
        f.write_str(s)
    }
}

/// The three calibration wells of one run. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSet {
    pub ntc: WellRecord,
    pub ref1: WellRecord,
    pub ref2: WellRecord,
}

impl CalibrationSet {
    pub fn get(&self, role: WellRole) -> Option<&WellRecord> {
        match role {
            WellRole::Ntc => Some(&self.ntc),
            WellRole::Ref1 => Some(&self.ref1),
            WellRole::Ref2 => Some(&self.ref2),
            WellRole::Sample => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlatePartition {
    pub calibration: CalibrationSet,
    pub samples: Vec<WellRecord>,
    pub missing_controls: Vec<WellRole>,
    pub warnings: Vec<String>,
}

/// Splits a plate into its calibration set and sample wells.
///
/// A layout well that does not appear on the plate becomes an all-missing
/// placeholder so QC can name it. Sample wells without a sample name are
/// dropped. A well position seen twice keeps its first record.
pub fn partition_plate(wells: &[WellRecord], layout: &PlateLayout) -> PlatePartition {
    let mut ntc = None;
    let mut ref1 = None;
    let mut ref2 = None;
    let mut samples = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut warnings = Vec::new();

    for record in wells {
        if !seen.insert(record.well.trim().to_ascii_uppercase()) {
            let msg = format!("well {} appears more than once; later record dropped", record.well);
            warn!("{}", msg);
            warnings.push(msg);
            continue;
        }
        let slot = match layout.role_of(&record.well) {
            WellRole::Ntc => &mut ntc,
            WellRole::Ref1 => &mut ref1,
            WellRole::Ref2 => &mut ref2,
            WellRole::Sample => {
                if record.sample_name.trim().is_empty() {
                    debug!(well = %record.well, "skipping well without sample name");
                } else {
                    samples.push(record.clone());
                }
                continue;
            }
        };
        *slot = Some(record.clone());
    }

    let mut missing_controls = Vec::new();
    let mut take = |slot: Option<WellRecord>, role: WellRole, well: &str, name: &str| {
        slot.unwrap_or_else(|| {
            warn!(role = %role, well, "calibration well not found on plate");
            missing_controls.push(role);
            WellRecord::new(well, name)
        })
    };
    let calibration = CalibrationSet {
        ntc: take(ntc, WellRole::Ntc, &layout.ntc, "NTC"),
        ref1: take(ref1, WellRole::Ref1, &layout.ref1, "Standard 1"),
        ref2: take(ref2, WellRole::Ref2, &layout.ref2, "Standard 2"),
    };

    PlatePartition {
        calibration,
        samples,
        missing_controls,
        warnings,
    }
}
