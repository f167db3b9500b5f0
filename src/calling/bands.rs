use crate::config::{AnalysisConfig, ConfigError, CustomBands, Mode};
use crate::model::Locus;
use crate::qc::{CalibrationDeltas, CalibrationLevels};

/// Upper delta bounds of copy-number classes 1, 2 and 3 for one locus.
/// Anything above `b3` is class 4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusBands {
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
}

impl LocusBands {
    pub fn new(b1: f64, b2: f64, b3: f64) -> Self {
        Self { b1, b2, b3 }
    }

    /// Bands at the reference levels themselves: a value belongs to the
    /// lower class up to the next level.
    pub fn raw(levels: &CalibrationLevels) -> Self {
        Self::new(levels.n1, levels.n2, levels.n3)
    }

    /// Bands bisecting each gap between adjacent reference levels.
    pub fn midpoints(levels: &CalibrationLevels) -> Self {
        Self::new(
            (levels.n1 + levels.n2) / 2.0,
            (levels.n2 + levels.n3) / 2.0,
            (levels.n3 + levels.n4) / 2.0,
        )
    }

    pub fn is_monotonic(&self) -> bool {
        self.b1 < self.b2 && self.b2 < self.b3
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.b1, self.b2, self.b3]
    }
}

impl From<[f64; 3]> for LocusBands {
    fn from(b: [f64; 3]) -> Self {
        Self::new(b[0], b[1], b[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdBands {
    pub locus1: LocusBands,
    pub locus2: LocusBands,
}

impl ThresholdBands {
    pub fn for_locus(&self, locus: Locus) -> &LocusBands {
        match locus {
            Locus::Locus1 => &self.locus1,
            Locus::Locus2 => &self.locus2,
        }
    }

    /// Loci whose bands are not strictly increasing.
    pub fn non_monotonic_loci(&self) -> Vec<Locus> {
        Locus::BOTH
            .into_iter()
            .filter(|l| !self.for_locus(*l).is_monotonic())
            .collect()
    }
}

/// Per-locus amount subtracted from every sample delta before it is
/// compared against the bands.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Correction {
    pub locus1: f64,
    pub locus2: f64,
}

impl Correction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn factor(&self, locus: Locus) -> f64 {
        match locus {
            Locus::Locus1 => self.locus1,
            Locus::Locus2 => self.locus2,
        }
    }
}

pub trait BandStrategy: Send + Sync {
    fn mode(&self) -> Mode;
    fn build(&self, calibration: &CalibrationDeltas) -> ThresholdBands;
    fn correction(&self) -> Correction {
        Correction::none()
    }
}

pub struct RelaxedBands;

impl BandStrategy for RelaxedBands {
    fn mode(&self) -> Mode {
        Mode::Relaxed
    }

    fn build(&self, calibration: &CalibrationDeltas) -> ThresholdBands {
        ThresholdBands {
            locus1: LocusBands::raw(&calibration.locus1),
            locus2: LocusBands::raw(&calibration.locus2),
        }
    }
}

pub struct RestrictedBands;

impl BandStrategy for RestrictedBands {
    fn mode(&self) -> Mode {
        Mode::Restricted
    }

    fn build(&self, calibration: &CalibrationDeltas) -> ThresholdBands {
        ThresholdBands {
            locus1: LocusBands::raw(&calibration.locus1),
            locus2: LocusBands::midpoints(&calibration.locus2),
        }
    }
}

pub struct CorrectedBands {
    correction: Correction,
}

impl CorrectedBands {
    pub fn new(correction: Correction) -> Self {
        Self { correction }
    }
}

impl BandStrategy for CorrectedBands {
    fn mode(&self) -> Mode {
        Mode::Corrected
    }

    fn build(&self, calibration: &CalibrationDeltas) -> ThresholdBands {
        ThresholdBands {
            locus1: LocusBands::midpoints(&calibration.locus1),
            locus2: LocusBands::midpoints(&calibration.locus2),
        }
    }

    fn correction(&self) -> Correction {
        self.correction
    }
}

pub struct CustomBandStrategy {
    bands: CustomBands,
    correction: Correction,
}

impl CustomBandStrategy {
    pub fn new(bands: CustomBands, correction: Correction) -> Self {
        Self { bands, correction }
    }
}

impl BandStrategy for CustomBandStrategy {
    fn mode(&self) -> Mode {
        Mode::Custom
    }

    fn build(&self, _calibration: &CalibrationDeltas) -> ThresholdBands {
        ThresholdBands {
            locus1: self.bands.locus1.into(),
            locus2: self.bands.locus2.into(),
        }
    }

    fn correction(&self) -> Correction {
        self.correction
    }
}

/// Selects the band strategy for a validated configuration.
pub fn strategy_for(config: &AnalysisConfig) -> Result<Box<dyn BandStrategy>, ConfigError> {
    config.validate()?;
    let correction = Correction {
        locus1: config.factor(Locus::Locus1),
        locus2: config.factor(Locus::Locus2),
    };
    let strategy: Box<dyn BandStrategy> = match config.mode {
        Mode::Relaxed => Box::new(RelaxedBands),
        Mode::Restricted => Box::new(RestrictedBands),
        Mode::Corrected => Box::new(CorrectedBands::new(correction)),
        Mode::Custom => {
            let bands = config.custom_bands.ok_or(ConfigError::MissingCustomBands)?;
            Box::new(CustomBandStrategy::new(bands, correction))
        }
    };
    Ok(strategy)
}
