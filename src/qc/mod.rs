mod validator;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::precision::round3;
use crate::model::{Channel, Locus, WellRole};

pub use validator::validate_calibration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcStatus {
    Pass,
    Fail,
}

impl QcStatus {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for QcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        })
    }
}

/// Which calibration checks apply to a run. A range bound of `0` leaves
/// that side unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QcCriteria {
    pub range_locus1: Option<[f64; 2]>,
    pub range_locus2: Option<[f64; 2]>,
    pub require_monotonic: bool,
    pub require_positive_delta: bool,
    pub strict_band_order: bool,
}

impl QcCriteria {
    pub fn range(&self, locus: Locus) -> Option<[f64; 2]> {
        match locus {
            Locus::Locus1 => self.range_locus1,
            Locus::Locus2 => self.range_locus2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QcIssueKind {
    MissingChannel,
    NoAmplification,
    NtcAmplified,
    NonPositiveDelta,
    StepOutOfRange,
    NonMonotonicCalibration,
    NonMonotonicBands,
}

impl QcIssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingChannel => "missing_channel",
            Self::NoAmplification => "no_amplification",
            Self::NtcAmplified => "ntc_amplified",
            Self::NonPositiveDelta => "non_positive_delta",
            Self::StepOutOfRange => "step_out_of_range",
            Self::NonMonotonicCalibration => "non_monotonic_calibration",
            Self::NonMonotonicBands => "non_monotonic_bands",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QcIssue {
    pub kind: QcIssueKind,
    pub role: Option<WellRole>,
    pub well: Option<String>,
    pub channel: Option<Channel>,
    pub message: String,
}

impl fmt::Display for QcIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Reference levels for one locus, in delta units. `n3` and `n4` are
/// linear extrapolations from the measured `n1`/`n2` step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationLevels {
    pub n1: f64,
    pub n2: f64,
    pub n3: f64,
    pub n4: f64,
}

impl CalibrationLevels {
    pub fn from_references(n1: f64, n2: f64) -> Self {
        let step = round3(n2 - n1);
        let n3 = n2 + step;
        let n4 = n3 + step;
        Self { n1, n2, n3, n4 }
    }

    /// The 1-copy to 2-copy delta step, at instrument precision.
    pub fn step(&self) -> f64 {
        round3(self.n2 - self.n1)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.n1, self.n2, self.n3, self.n4]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationDeltas {
    pub locus1: CalibrationLevels,
    pub locus2: CalibrationLevels,
}

impl CalibrationDeltas {
    pub fn for_locus(&self, locus: Locus) -> &CalibrationLevels {
        match locus {
            Locus::Locus1 => &self.locus1,
            Locus::Locus2 => &self.locus2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QcResult {
    pub status: QcStatus,
    pub run_id: String,
    pub calibration: Option<CalibrationDeltas>,
    pub issues: Vec<QcIssue>,
}

impl QcResult {
    pub fn is_pass(&self) -> bool {
        self.status.is_pass()
    }

    /// Records a late issue (found after calibration was accepted) and
    /// fails the run.
    pub fn fail_with(&mut self, issue: QcIssue) {
        self.issues.push(issue);
        self.status = QcStatus::Fail;
    }
}
