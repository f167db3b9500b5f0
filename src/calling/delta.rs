use tracing::debug;

use crate::math::precision::round3;
use crate::model::{CtReading, Locus, WellRecord};

/// Reference-normalized abundance of one locus in one well.
/// A larger delta means relatively more target copies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbundanceDelta {
    pub locus: Locus,
    pub reference_ct: CtReading,
    pub target_ct: CtReading,
    pub delta: f64,
}

impl AbundanceDelta {
    /// True when both reference and target amplified, i.e. `delta` is a
    /// real normalization rather than the `0` fallback.
    pub fn is_computable(&self) -> bool {
        self.reference_ct.is_measured() && self.target_ct.is_measured()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDeltas {
    pub locus1: AbundanceDelta,
    pub locus2: AbundanceDelta,
}

impl SampleDeltas {
    pub fn for_locus(&self, locus: Locus) -> &AbundanceDelta {
        match locus {
            Locus::Locus1 => &self.locus1,
            Locus::Locus2 => &self.locus2,
        }
    }
}

/// `reference - target`, to three significant figures. Falls back to `0`
/// when either channel did not amplify; this is a data-quality condition,
/// not an error.
pub fn compute_delta(record: &WellRecord, locus: Locus) -> AbundanceDelta {
    let reference_ct = record.reference;
    let target_ct = record.reading(locus.channel());
    let delta = match (reference_ct, target_ct) {
        (CtReading::Measured(r), CtReading::Measured(t)) => round3(r - t),
        _ => 0.0,
    };
    AbundanceDelta {
        locus,
        reference_ct,
        target_ct,
        delta,
    }
}

pub fn compute_sample_deltas(record: &WellRecord) -> SampleDeltas {
    if !record.reference.is_measured() {
        debug!(well = %record.well, "no reference signal, deltas forced to 0");
    }
    SampleDeltas {
        locus1: compute_delta(record, Locus::Locus1),
        locus2: compute_delta(record, Locus::Locus2),
    }
}
