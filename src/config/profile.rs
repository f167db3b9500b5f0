use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::model::{Channel, CtReading};
use crate::qc::QcCriteria;

/// Optical bleed-through correction for the Z480 channel set.
pub const CORRECTION_FACTORS: (f64, f64) = (0.47, 0.52);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    #[default]
    Qs3,
    Tower,
    Z480,
}

impl Instrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qs3 => "qs3",
            Self::Tower => "tower",
            Self::Z480 => "z480",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qs3" => Ok(Self::Qs3),
            "tower" => Ok(Self::Tower),
            "z480" => Ok(Self::Z480),
            other => Err(ConfigError::UnsupportedInstrument(other.to_string())),
        }
    }
}

/// Instrument-family presets: dye to channel mapping, the Ct window outside
/// of which a reading counts as undetermined, and the QC criteria the lab
/// validated for that family.
#[derive(Debug, Clone)]
pub struct InstrumentProfile {
    pub instrument: Instrument,
    pub dyes: &'static [(&'static str, Channel)],
    pub ct_lower: Option<f64>,
    pub ct_upper: Option<f64>,
    pub qc: QcCriteria,
    pub default_factors: Option<(f64, f64)>,
}

impl InstrumentProfile {
    pub fn for_instrument(instrument: Instrument) -> Self {
        match instrument {
            Instrument::Qs3 => Self::qs3(),
            Instrument::Tower => Self::tower(),
            Instrument::Z480 => Self::z480(),
        }
    }

    pub fn qs3() -> Self {
        Self {
            instrument: Instrument::Qs3,
            dyes: &[
                ("FAM", Channel::Locus1),
                ("VIC", Channel::Locus2),
                ("TAMRA", Channel::Reference),
                ("ROX", Channel::Reference),
            ],
            ct_lower: None,
            ct_upper: Some(30.0),
            qc: QcCriteria {
                range_locus1: Some([0.87, 1.46]),
                range_locus2: Some([0.75, 1.44]),
                require_monotonic: true,
                ..QcCriteria::default()
            },
            default_factors: None,
        }
    }

    pub fn tower() -> Self {
        Self {
            instrument: Instrument::Tower,
            dyes: &[
                ("FAM", Channel::Locus1),
                ("VIC", Channel::Locus2),
                ("ROX", Channel::Reference),
            ],
            ct_lower: Some(15.0),
            ct_upper: Some(30.0),
            qc: QcCriteria {
                require_positive_delta: true,
                ..QcCriteria::default()
            },
            default_factors: None,
        }
    }

    pub fn z480() -> Self {
        Self {
            instrument: Instrument::Z480,
            dyes: &[
                ("FAM", Channel::Locus1),
                ("VIC", Channel::Locus2),
                ("CY5", Channel::Reference),
            ],
            ct_lower: None,
            ct_upper: None,
            qc: QcCriteria::default(),
            default_factors: Some(CORRECTION_FACTORS),
        }
    }

    pub fn channel_for(&self, dye: &str) -> Option<Channel> {
        let dye = dye.trim();
        self.dyes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(dye))
            .map(|(_, ch)| *ch)
    }

    /// Normalizes a raw Ct cell. Empty, non-numeric ("Undetermined",
    /// "No Ct") and out-of-window values are undetermined.
    pub fn normalize_ct(&self, raw: &str) -> CtReading {
        let Ok(ct) = raw.trim().parse::<f64>() else {
            return CtReading::Undetermined;
        };
        if let Some(upper) = self.ct_upper {
            if ct >= upper {
                return CtReading::Undetermined;
            }
        }
        if let Some(lower) = self.ct_lower {
            if ct <= lower {
                return CtReading::Undetermined;
            }
        }
        CtReading::from_ct(ct)
    }
}
