mod plate;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use plate::{CalibrationSet, PlateLayout, PlatePartition, WellRole, partition_plate};

/// A single Ct reading on one channel of one well.
///
/// `Undetermined` is the instrument's "no amplification" outcome and is
/// distinct from `Missing`, which means the export carried no value at all
/// for that channel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CtReading {
    Measured(f64),
    Undetermined,
    #[default]
    Missing,
}

impl CtReading {
    /// Builds a reading from a numeric Ct. Zero and non-finite values are
    /// undetermined.
    pub fn from_ct(ct: f64) -> Self {
        if ct.is_finite() && ct != 0.0 {
            Self::Measured(ct)
        } else {
            Self::Undetermined
        }
    }

    /// Numeric view: undetermined reads as `0`, missing as `None`.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Measured(v) => Some(*v),
            Self::Undetermined => Some(0.0),
            Self::Missing => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Locus1,
    Locus2,
    Reference,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Locus1, Channel::Locus2, Channel::Reference];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locus1 => "locus1",
            Self::Locus2 => "locus2",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two genotyped loci (SMN1 and SMN2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locus {
    Locus1,
    Locus2,
}

impl Locus {
    pub const BOTH: [Locus; 2] = [Locus::Locus1, Locus::Locus2];

    pub fn channel(&self) -> Channel {
        match self {
            Self::Locus1 => Channel::Locus1,
            Self::Locus2 => Channel::Locus2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.channel().as_str()
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WellRecord {
    pub well: String,
    pub sample_name: String,
    pub locus1: CtReading,
    pub locus2: CtReading,
    pub reference: CtReading,
}

impl WellRecord {
    pub fn new(well: impl Into<String>, sample_name: impl Into<String>) -> Self {
        Self {
            well: well.into(),
            sample_name: sample_name.into(),
            ..Self::default()
        }
    }

    /// Builds a record from numeric Ct values: `0` is undetermined and
    /// `None` is an absent channel.
    pub fn from_cts(
        well: impl Into<String>,
        sample_name: impl Into<String>,
        locus1: Option<f64>,
        locus2: Option<f64>,
        reference: Option<f64>,
    ) -> Self {
        let to_reading = |v: Option<f64>| v.map(CtReading::from_ct).unwrap_or_default();
        Self {
            well: well.into(),
            sample_name: sample_name.into(),
            locus1: to_reading(locus1),
            locus2: to_reading(locus2),
            reference: to_reading(reference),
        }
    }

    pub fn reading(&self, channel: Channel) -> CtReading {
        match channel {
            Channel::Locus1 => self.locus1,
            Channel::Locus2 => self.locus2,
            Channel::Reference => self.reference,
        }
    }

    pub fn has_missing_channel(&self) -> bool {
        Channel::ALL.iter().any(|ch| self.reading(*ch).is_missing())
    }

    pub fn reading_mut(&mut self, channel: Channel) -> &mut CtReading {
        match channel {
            Channel::Locus1 => &mut self.locus1,
            Channel::Locus2 => &mut self.locus2,
            Channel::Reference => &mut self.reference,
        }
    }
}
