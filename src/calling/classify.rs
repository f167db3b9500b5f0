use tracing::debug;

use crate::calling::bands::{Correction, LocusBands, ThresholdBands};
use crate::calling::delta::{AbundanceDelta, SampleDeltas};
use crate::calling::diagnosis::{Diagnosis, diagnose};
use crate::model::{Locus, WellRecord};
use crate::qc::QcStatus;

/// Classifier output for one locus. `code` is `None` when the run was not
/// classifiable (QC failure), `Some(0)` for a no-call and `Some(1..=4)` for
/// a copy-number class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusCall {
    pub delta: f64,
    pub code: Option<u8>,
}

impl LocusCall {
    /// Class 4 is a calculation aid from the extrapolated boundary and is
    /// reported as 3.
    pub fn display_code(&self) -> Option<u8> {
        self.code.map(|c| if c == 4 { 3 } else { c })
    }

    pub fn is_no_call(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub well: String,
    pub sample_name: String,
    pub locus1: LocusCall,
    pub locus2: LocusCall,
    pub diagnosis: Diagnosis,
    pub valid: bool,
}

/// Ascending first-match over the bands; ties go to the lower class.
pub fn copy_class(delta: f64, bands: &LocusBands) -> u8 {
    if delta <= bands.b1 {
        1
    } else if delta <= bands.b2 {
        2
    } else if delta <= bands.b3 {
        3
    } else {
        4
    }
}

pub fn classify_locus(
    delta: &AbundanceDelta,
    bands: &LocusBands,
    status: QcStatus,
    factor: f64,
) -> LocusCall {
    if !status.is_pass() {
        return LocusCall {
            delta: delta.delta,
            code: None,
        };
    }
    if !delta.is_computable() {
        return LocusCall {
            delta: delta.delta,
            code: Some(0),
        };
    }
    let corrected = delta.delta - factor;
    LocusCall {
        delta: corrected,
        code: Some(copy_class(corrected, bands)),
    }
}

/// Classifies both loci of a sample and maps the pair to a diagnosis.
/// Without bands (QC failure) the sample is inconclusive. A channel with no
/// data at all makes the whole sample invalid; only an undetermined Ct
/// counts as a real zero-copy call.
pub fn classify_sample(
    record: &WellRecord,
    deltas: &SampleDeltas,
    status: QcStatus,
    bands: Option<&ThresholdBands>,
    correction: &Correction,
) -> ClassificationResult {
    let (Some(bands), true) = (bands, status.is_pass()) else {
        let unclassified = |d: &AbundanceDelta| LocusCall {
            delta: d.delta,
            code: None,
        };
        return ClassificationResult {
            well: record.well.clone(),
            sample_name: record.sample_name.clone(),
            locus1: unclassified(&deltas.locus1),
            locus2: unclassified(&deltas.locus2),
            diagnosis: Diagnosis::Inconclusive,
            valid: false,
        };
    };

    if record.has_missing_channel() {
        debug!(well = %record.well, "channel absent from export, sample is a no-call");
        let no_call = |d: &AbundanceDelta| LocusCall {
            delta: d.delta,
            code: Some(0),
        };
        return ClassificationResult {
            well: record.well.clone(),
            sample_name: record.sample_name.clone(),
            locus1: no_call(&deltas.locus1),
            locus2: no_call(&deltas.locus2),
            diagnosis: Diagnosis::Invalid,
            valid: false,
        };
    }

    let call = |locus: Locus| {
        classify_locus(
            deltas.for_locus(locus),
            bands.for_locus(locus),
            status,
            correction.factor(locus),
        )
    };
    let locus1 = call(Locus::Locus1);
    let locus2 = call(Locus::Locus2);

    let (diagnosis, valid) = if locus1.is_no_call() && locus2.is_no_call() {
        (Diagnosis::Invalid, false)
    } else {
        let d = diagnose(locus1.code.unwrap_or(0), locus2.code.unwrap_or(0));
        (d, d.is_call())
    };

    ClassificationResult {
        well: record.well.clone(),
        sample_name: record.sample_name.clone(),
        locus1,
        locus2,
        diagnosis,
        valid,
    }
}
