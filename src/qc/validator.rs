use tracing::{info, warn};

use crate::calling::delta::compute_delta;
use crate::model::{CalibrationSet, Channel, CtReading, Locus, WellRole};
use crate::qc::{
    CalibrationDeltas, CalibrationLevels, QcCriteria, QcIssue, QcIssueKind, QcResult, QcStatus,
};

/// Checks the calibration wells of one run and derives the reference
/// levels. Every issue is collected; a failing run still returns a result.
pub fn validate_calibration(
    calibration: &CalibrationSet,
    criteria: &QcCriteria,
    run_id: &str,
) -> QcResult {
    let mut issues = Vec::new();

    for role in [WellRole::Ref1, WellRole::Ref2] {
        let Some(record) = calibration.get(role) else {
            continue;
        };
        for channel in Channel::ALL {
            let kind = match record.reading(channel) {
                CtReading::Measured(_) => continue,
                CtReading::Missing => QcIssueKind::MissingChannel,
                CtReading::Undetermined => QcIssueKind::NoAmplification,
            };
            let message = match kind {
                QcIssueKind::MissingChannel => {
                    format!("{} well {} has no {} data", role, record.well, channel)
                }
                _ => format!("{} well {} has no {} Ct value", role, record.well, channel),
            };
            issues.push(well_issue(kind, role, &record.well, channel, message));
        }
    }

    let ntc = &calibration.ntc;
    for channel in Channel::ALL {
        match ntc.reading(channel) {
            CtReading::Undetermined => {}
            CtReading::Missing => issues.push(well_issue(
                QcIssueKind::MissingChannel,
                WellRole::Ntc,
                &ntc.well,
                channel,
                format!("ntc well {} has no {} data", ntc.well, channel),
            )),
            CtReading::Measured(ct) => issues.push(well_issue(
                QcIssueKind::NtcAmplified,
                WellRole::Ntc,
                &ntc.well,
                channel,
                format!("ntc well {} amplified on {} (Ct {})", ntc.well, channel, ct),
            )),
        }
    }

    let deltas = if issues.is_empty() {
        let levels = |locus: Locus| {
            CalibrationLevels::from_references(
                compute_delta(&calibration.ref1, locus).delta,
                compute_delta(&calibration.ref2, locus).delta,
            )
        };
        Some(CalibrationDeltas {
            locus1: levels(Locus::Locus1),
            locus2: levels(Locus::Locus2),
        })
    } else {
        None
    };

    if let Some(deltas) = &deltas {
        check_levels(deltas, criteria, &mut issues);
    }

    for issue in &issues {
        warn!(kind = issue.kind.as_str(), run_id, "qc issue: {}", issue.message);
    }
    let status = if issues.is_empty() {
        QcStatus::Pass
    } else {
        QcStatus::Fail
    };
    info!(run_id, status = %status, issues = issues.len(), "qc evaluated");

    QcResult {
        status,
        run_id: run_id.to_string(),
        calibration: deltas,
        issues,
    }
}

fn check_levels(deltas: &CalibrationDeltas, criteria: &QcCriteria, issues: &mut Vec<QcIssue>) {
    for locus in Locus::BOTH {
        let levels = deltas.for_locus(locus);

        if criteria.require_positive_delta {
            for (role, value) in [(WellRole::Ref1, levels.n1), (WellRole::Ref2, levels.n2)] {
                if !(value > 0.0) {
                    issues.push(QcIssue {
                        kind: QcIssueKind::NonPositiveDelta,
                        role: Some(role),
                        well: None,
                        channel: Some(locus.channel()),
                        message: format!("{} {} delta {} is not > 0", role, locus, value),
                    });
                }
            }
        }

        if let Some([min, max]) = criteria.range(locus) {
            let step = levels.step();
            let below = min != 0.0 && !(step >= min);
            let above = max != 0.0 && !(step <= max);
            if below || above {
                issues.push(QcIssue {
                    kind: QcIssueKind::StepOutOfRange,
                    role: None,
                    well: None,
                    channel: Some(locus.channel()),
                    message: format!(
                        "{} 2n-1n step {} outside [{}, {}]",
                        locus, step, min, max
                    ),
                });
            }
        }

        if criteria.require_monotonic && !(levels.n2 > levels.n1) {
            issues.push(QcIssue {
                kind: QcIssueKind::NonMonotonicCalibration,
                role: None,
                well: None,
                channel: Some(locus.channel()),
                message: format!(
                    "{} 2n delta {} does not exceed 1n delta {}",
                    locus, levels.n2, levels.n1
                ),
            });
        }
    }
}

fn well_issue(
    kind: QcIssueKind,
    role: WellRole,
    well: &str,
    channel: Channel,
    message: String,
) -> QcIssue {
    QcIssue {
        kind,
        role: Some(role),
        well: Some(well.to_string()),
        channel: Some(channel),
        message,
    }
}
