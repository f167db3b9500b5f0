use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Clinical category derived from the SMN1/SMN2 copy-number pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Diagnosis {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "carrier")]
    Carrier,
    #[serde(rename = "affected")]
    Affected,
    /// SMN2 = 2: Werdnig-Hoffmann disease.
    #[serde(rename = "affected-weho")]
    AffectedTypeA,
    /// SMN2 = 3: Dubowitz disease.
    #[serde(rename = "affected-dubo")]
    AffectedTypeB,
    /// SMN2 = 4: Kugelberg-Welander disease.
    #[serde(rename = "affected-kuwel")]
    AffectedTypeC,
    #[serde(rename = "invalid")]
    Invalid,
    #[serde(rename = "inconclusive")]
    Inconclusive,
}

impl Diagnosis {
    pub const ALL: [Diagnosis; 8] = [
        Diagnosis::Normal,
        Diagnosis::Carrier,
        Diagnosis::Affected,
        Diagnosis::AffectedTypeA,
        Diagnosis::AffectedTypeB,
        Diagnosis::AffectedTypeC,
        Diagnosis::Invalid,
        Diagnosis::Inconclusive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Carrier => "carrier",
            Self::Affected => "affected",
            Self::AffectedTypeA => "affected-weho",
            Self::AffectedTypeB => "affected-dubo",
            Self::AffectedTypeC => "affected-kuwel",
            Self::Invalid => "invalid",
            Self::Inconclusive => "inconclusive",
        }
    }

    /// Report wording of the category.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Carrier => "SMA carrier",
            Self::Affected => "SMA affected",
            Self::AffectedTypeA => "SMA affected (Werdnig-Hoffmann disease)",
            Self::AffectedTypeB => "SMA affected (Dubowitz disease)",
            Self::AffectedTypeC => "SMA affected (Kugelberg-Welander disease)",
            Self::Invalid => "Invalid",
            Self::Inconclusive => "Inconclusive",
        }
    }

    pub fn is_affected(&self) -> bool {
        matches!(
            self,
            Self::Affected | Self::AffectedTypeA | Self::AffectedTypeB | Self::AffectedTypeC
        )
    }

    /// False for the two non-calls.
    pub fn is_call(&self) -> bool {
        !matches!(self, Self::Invalid | Self::Inconclusive)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps raw classifier codes to a diagnosis. Must be applied before the
/// 4 -> 3 display relabel.
pub fn diagnose(locus1_code: u8, locus2_code: u8) -> Diagnosis {
    match (locus1_code, locus2_code) {
        (0, 0) => Diagnosis::Invalid,
        (1, 0..=4) => Diagnosis::Carrier,
        (2..=4, 0..=4) => Diagnosis::Normal,
        (0, 1) => Diagnosis::Affected,
        (0, 2) => Diagnosis::AffectedTypeA,
        (0, 3) => Diagnosis::AffectedTypeB,
        (0, 4) => Diagnosis::AffectedTypeC,
        (a, b) => {
            warn!(locus1_code = a, locus2_code = b, "unrecognized copy-number combination");
            Diagnosis::Invalid
        }
    }
}
