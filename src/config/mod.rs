mod profile;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Locus;
use crate::qc::QcCriteria;

pub use profile::{CORRECTION_FACTORS, Instrument, InstrumentProfile};

/// Rejections for configurations that have no safe default semantics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported mode '{0}' (expected relaxed, restricted, corrected or custom)")]
    UnsupportedMode(String),

    #[error("unsupported instrument '{0}' (expected qs3, tower or z480)")]
    UnsupportedInstrument(String),

    #[error("custom mode requires customBands for both loci")]
    MissingCustomBands,

    #[error("customBands are only accepted in custom mode (mode is {mode})")]
    UnexpectedCustomBands { mode: Mode },

    #[error("custom band b{index} for {locus} is not a finite number")]
    NonFiniteBand { locus: Locus, index: usize },

    #[error("correction factors are not applied in {mode} mode")]
    UnexpectedFactor { mode: Mode },

    #[error("correction factor for {locus} is not a finite number")]
    NonFiniteFactor { locus: Locus },

    #[error("QC range for {locus} is invalid: [{min}, {max}]")]
    InvalidQcRange { locus: Locus, min: f64, max: f64 },

    #[error("layout well for {role} is empty")]
    EmptyLayoutWell { role: String },

    #[error("well {well} is assigned to both {first} and {second}")]
    DuplicateLayoutWell {
        well: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Relaxed,
    Restricted,
    Corrected,
    Custom,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxed => "relaxed",
            Self::Restricted => "restricted",
            Self::Corrected => "corrected",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(Self::Relaxed),
            "restricted" => Ok(Self::Restricted),
            "corrected" => Ok(Self::Corrected),
            "custom" => Ok(Self::Custom),
            other => Err(ConfigError::UnsupportedMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomBands {
    pub locus1: [f64; 3],
    pub locus2: [f64; 3],
}

impl CustomBands {
    pub fn for_locus(&self, locus: Locus) -> [f64; 3] {
        match locus {
            Locus::Locus1 => self.locus1,
            Locus::Locus2 => self.locus2,
        }
    }
}

/// Per-run analysis parameters. Passed explicitly into every stage; there
/// is no process-wide parameter state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisConfig {
    pub mode: Mode,
    #[serde(default)]
    pub run_label: Option<String>,
    #[serde(default)]
    pub instrument: Option<Instrument>,
    #[serde(default)]
    pub locus1_factor: Option<f64>,
    #[serde(default)]
    pub locus2_factor: Option<f64>,
    #[serde(default)]
    pub custom_bands: Option<CustomBands>,
    #[serde(default)]
    pub qc_range_locus1: Option<[f64; 2]>,
    #[serde(default)]
    pub qc_range_locus2: Option<[f64; 2]>,
    #[serde(default)]
    pub strict_band_order: bool,
}

impl AnalysisConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn custom(bands: CustomBands) -> Self {
        Self {
            mode: Mode::Custom,
            custom_bands: Some(bands),
            ..Self::default()
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(content).context("malformed analysis config")?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument.unwrap_or_default()
    }

    pub fn profile(&self) -> InstrumentProfile {
        InstrumentProfile::for_instrument(self.instrument())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mode {
            Mode::Custom => {
                let bands = self.custom_bands.ok_or(ConfigError::MissingCustomBands)?;
                for locus in Locus::BOTH {
                    for (i, b) in bands.for_locus(locus).iter().enumerate() {
                        if !b.is_finite() {
                            return Err(ConfigError::NonFiniteBand {
                                locus,
                                index: i + 1,
                            });
                        }
                    }
                }
            }
            mode => {
                if self.custom_bands.is_some() {
                    return Err(ConfigError::UnexpectedCustomBands { mode });
                }
            }
        }

        let has_factor = self.locus1_factor.is_some() || self.locus2_factor.is_some();
        if has_factor && matches!(self.mode, Mode::Relaxed | Mode::Restricted) {
            return Err(ConfigError::UnexpectedFactor { mode: self.mode });
        }
        for (locus, factor) in [
            (Locus::Locus1, self.locus1_factor),
            (Locus::Locus2, self.locus2_factor),
        ] {
            if let Some(f) = factor {
                if !f.is_finite() {
                    return Err(ConfigError::NonFiniteFactor { locus });
                }
            }
        }

        for (locus, range) in [
            (Locus::Locus1, self.qc_range_locus1),
            (Locus::Locus2, self.qc_range_locus2),
        ] {
            if let Some([min, max]) = range {
                let open_max = max == 0.0;
                if !min.is_finite() || !max.is_finite() || (!open_max && min > max) {
                    return Err(ConfigError::InvalidQcRange { locus, min, max });
                }
            }
        }

        Ok(())
    }

    /// Factor subtracted from every sample delta before classification.
    ///
    /// Corrected mode falls back to the instrument profile's factors; custom
    /// mode only uses caller-supplied ones.
    pub fn factor(&self, locus: Locus) -> f64 {
        let explicit = match locus {
            Locus::Locus1 => self.locus1_factor,
            Locus::Locus2 => self.locus2_factor,
        };
        match self.mode {
            Mode::Relaxed | Mode::Restricted => 0.0,
            Mode::Custom => explicit.unwrap_or(0.0),
            Mode::Corrected => explicit.unwrap_or_else(|| {
                let (f1, f2) = self.profile().default_factors.unwrap_or(CORRECTION_FACTORS);
                match locus {
                    Locus::Locus1 => f1,
                    Locus::Locus2 => f2,
                }
            }),
        }
    }

    /// QC criteria for this run: the profile's criteria, with caller ranges
    /// overriding. An explicit range also turns on the monotonic check.
    pub fn qc_criteria(&self) -> QcCriteria {
        let mut criteria = self.profile().qc;
        if let Some(range) = self.qc_range_locus1 {
            criteria.range_locus1 = Some(range);
            criteria.require_monotonic = true;
        }
        if let Some(range) = self.qc_range_locus2 {
            criteria.range_locus2 = Some(range);
            criteria.require_monotonic = true;
        }
        criteria.strict_band_order = self.strict_band_order;
        criteria
    }

    pub fn run_label(&self) -> Option<&str> {
        self.run_label.as_deref().filter(|s| !s.trim().is_empty())
    }
}
