use std::fs;
use std::path::Path;

use kira_smacn::analyze_plate;
use kira_smacn::config::{AnalysisConfig, CustomBands, Instrument, InstrumentProfile, Mode};
use kira_smacn::ctx::Ctx;
use kira_smacn::io::plate_reader::parse_plate;
use kira_smacn::io::summary::format_summary;
use kira_smacn::model::{PlateLayout, WellRecord};
use kira_smacn::pipeline::Pipeline;
use serde_json::Value;
use tempfile::TempDir;

const PLATE: &str = "\
Well\tWell Position\tSample Name\tReporter\tCT
1\tA1\tStd 1\tFAM\t24.0
1\tA1\tStd 1\tVIC\t23.9
1\tA1\tStd 1\tROX\t25.0
2\tA2\tStd 2\tFAM\t23.0
2\tA2\tStd 2\tVIC\t22.9
2\tA2\tStd 2\tROX\t25.0
13\tB1\tPatient 1\tFAM\t23.0
13\tB1\tPatient 1\tVIC\t22.9
13\tB1\tPatient 1\tROX\t25.0
14\tB2\tPatient 2\tFAM\t24.0
14\tB2\tPatient 2\tVIC\t23.0
14\tB2\tPatient 2\tROX\t25.0
15\tB3\tPatient 3\tFAM\tUndetermined
15\tB3\tPatient 3\tVIC\t22.9
15\tB3\tPatient 3\tROX\t25.0
16\tB4\tPatient 4\tFAM\t21.5
16\tB4\tPatient 4\tVIC\t22.0
16\tB4\tPatient 4\tROX\t25.0
96\tH12\tNTC\tFAM\tUndetermined
96\tH12\tNTC\tVIC\tUndetermined
96\tH12\tNTC\tROX\tUndetermined
";

fn layout() -> PlateLayout {
    PlateLayout::new("H12", "A1", "A2")
}

fn write_plate(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run_file(dir: &Path, content: &str, config: AnalysisConfig) -> Ctx {
    let input = write_plate(dir, "run_07.tsv", content);
    let mut ctx = Ctx::new(
        Some(input),
        dir.join("out"),
        layout(),
        config,
        true,
        true,
    );
    Pipeline::standard().run(&mut ctx).unwrap();
    ctx
}

#[test]
fn relaxed_run_writes_json_and_tsv() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_file(tmp.path(), PLATE, AnalysisConfig::new(Mode::Relaxed));
    assert_eq!(ctx.run_id, "run_07");

    let json: Value =
        serde_json::from_str(&fs::read_to_string(&ctx.output.json_path).unwrap()).unwrap();
    assert_eq!(json["tool"], "kira-smacn");
    assert_eq!(json["schema_version"], "v1");
    assert_eq!(json["config"]["mode"], "relaxed");
    assert_eq!(json["config"]["instrument"], "qs3");
    assert_eq!(json["config"]["bands"]["locus1"][2].as_f64(), Some(3.0));
    assert_eq!(json["qc"]["status"], "pass");
    assert_eq!(json["qc"]["calibration"]["locus1"]["1n"].as_f64(), Some(1.0));
    assert_eq!(json["qc"]["calibration"]["locus1"]["4n"].as_f64(), Some(4.0));

    let samples = json["samples"].as_array().unwrap();
    let diagnoses: Vec<&str> = samples
        .iter()
        .map(|s| s["diagnosis"].as_str().unwrap())
        .collect();
    assert_eq!(diagnoses, ["normal", "carrier", "affected-weho", "normal"]);
    assert_eq!(samples[2]["locus1"]["code"], 0);
    assert_eq!(samples[3]["locus1"]["code"], 3);
    assert_eq!(samples[3]["locus1"]["raw_code"], 4);
    assert!(samples.iter().all(|s| s["valid"] == true));

    let tsv = fs::read_to_string(&ctx.output.tsv_path).unwrap();
    let lines: Vec<&str> = tsv.lines().collect();
    assert_eq!(
        lines[0],
        "well\tsample\tlocus1_delta\tlocus1_code\tlocus2_delta\tlocus2_code\tdiagnosis"
    );
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[2], "B2\tPatient 2\t1.000\t1\t2.000\t2\tcarrier");
}

#[test]
fn ntc_contamination_makes_every_sample_inconclusive() {
    let tmp = TempDir::new().unwrap();
    let contaminated = PLATE.replace("96\tH12\tNTC\tROX\tUndetermined", "96\tH12\tNTC\tROX\t28.4");
    let ctx = run_file(tmp.path(), &contaminated, AnalysisConfig::new(Mode::Relaxed));

    let report = ctx.report.as_ref().unwrap();
    assert_eq!(report.qc.status, "fail");
    assert_eq!(report.qc.issues[0].kind, "ntc_amplified");
    assert_eq!(report.qc.issues[0].channel.as_deref(), Some("reference"));
    assert!(report.config.bands.is_none());
    assert_eq!(report.samples.len(), 4);
    for s in &report.samples {
        assert_eq!(s.diagnosis.as_str(), "inconclusive");
        assert_eq!(s.locus1.code, None);
        assert_eq!(s.locus2.raw_code, None);
        assert!(!s.valid);
    }

    let tsv = fs::read_to_string(&ctx.output.tsv_path).unwrap();
    assert!(tsv.lines().skip(1).all(|l| l.ends_with("\tNA\tinconclusive")));
}

#[test]
fn missing_calibrator_well_fails_qc() {
    let tmp = TempDir::new().unwrap();
    let layout_elsewhere = PLATE.replace("\tA2\t", "\tG7\t");
    let ctx = run_file(tmp.path(), &layout_elsewhere, AnalysisConfig::new(Mode::Relaxed));
    assert!(!ctx.qc_passed());
    assert!(ctx.warnings.iter().any(|w| w.contains("ref2")));
    // G7 is now an ordinary sample
    assert_eq!(ctx.results.len(), 5);
}

#[test]
fn run_label_overrides_file_stem() {
    let tmp = TempDir::new().unwrap();
    let mut cfg = AnalysisConfig::new(Mode::Relaxed);
    cfg.run_label = Some("Plate 7/B".to_string());
    let ctx = run_file(tmp.path(), PLATE, cfg);
    assert_eq!(ctx.run_id, "Plate 7-B");
    assert_eq!(ctx.report.unwrap().qc.run_id, "Plate 7-B");
}

#[test]
fn corrected_mode_reports_factors() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_file(tmp.path(), PLATE, AnalysisConfig::new(Mode::Corrected));
    let report = ctx.report.unwrap();
    assert_eq!(report.config.locus1_factor, 0.47);
    assert_eq!(report.config.locus2_factor, 0.52);
    // 2.0 - 0.47 against midpoints [1.5, 2.5, 3.5]
    let first = &report.samples[0];
    assert!((first.locus1.delta - 1.53).abs() < 1e-9);
    assert_eq!(first.locus1.code, Some(2));
}

#[test]
fn invalid_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let input = write_plate(tmp.path(), "p.tsv", PLATE);
    let mut ctx = Ctx::new(
        Some(input),
        tmp.path().join("out"),
        layout(),
        AnalysisConfig::new(Mode::Custom),
        true,
        false,
    );
    assert!(Pipeline::standard().run(&mut ctx).is_err());
    assert!(!ctx.output.json_path.exists());
}

fn in_memory_wells() -> Vec<WellRecord> {
    vec![
        WellRecord::from_cts("A1", "Std 1", Some(24.0), Some(23.9), Some(25.0)),
        WellRecord::from_cts("A2", "Std 2", Some(23.0), Some(22.9), Some(25.0)),
        WellRecord::from_cts("H12", "NTC", Some(0.0), Some(0.0), Some(0.0)),
        WellRecord::from_cts("C1", "Kid", Some(22.0), Some(23.6), Some(25.0)),
        WellRecord::from_cts("C2", "", Some(22.0), Some(23.6), Some(25.0)),
    ]
}

#[test]
fn analysis_is_deterministic() {
    let a = analyze_plate(in_memory_wells(), layout(), AnalysisConfig::new(Mode::Restricted)).unwrap();
    let b = analyze_plate(in_memory_wells(), layout(), AnalysisConfig::new(Mode::Restricted)).unwrap();
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
    // unnamed well C2 is not a sample
    assert_eq!(a.samples.len(), 1);
    assert_eq!(a.samples[0].sample_name, "Kid");
}

#[test]
fn non_monotonic_custom_bands_warn_or_fail() {
    let bands = CustomBands {
        locus1: [2.0, 1.0, 3.0],
        locus2: [1.0, 2.0, 3.0],
    };
    let lenient = analyze_plate(in_memory_wells(), layout(), AnalysisConfig::custom(bands)).unwrap();
    assert_eq!(lenient.qc.status, "pass");
    assert!(lenient.warnings.iter().any(|w| w.contains("locus1")));
    assert_eq!(lenient.samples[0].diagnosis.as_str(), "normal");

    let mut strict = AnalysisConfig::custom(bands);
    strict.strict_band_order = true;
    let strict = analyze_plate(in_memory_wells(), layout(), strict).unwrap();
    assert_eq!(strict.qc.status, "fail");
    assert!(
        strict
            .qc
            .issues
            .iter()
            .any(|i| i.kind == "non_monotonic_bands")
    );
    assert_eq!(strict.samples[0].diagnosis.as_str(), "inconclusive");
}

#[test]
fn z480_profile_skips_range_checks() {
    let mut wells = in_memory_wells();
    // a 2.5 step would fail the qs3 range check
    wells[1] = WellRecord::from_cts("A2", "Std 2", Some(21.5), Some(22.9), Some(25.0));
    let mut cfg = AnalysisConfig::new(Mode::Relaxed);
    cfg.instrument = Some(Instrument::Z480);
    let report = analyze_plate(wells.clone(), layout(), cfg).unwrap();
    assert_eq!(report.qc.status, "pass");

    let report = analyze_plate(wells, layout(), AnalysisConfig::new(Mode::Relaxed)).unwrap();
    assert_eq!(report.qc.status, "fail");
}

#[test]
fn summary_counts_diagnoses() {
    let tmp = TempDir::new().unwrap();
    let ctx = run_file(tmp.path(), PLATE, AnalysisConfig::new(Mode::Relaxed));
    let summary = format_summary(&ctx).unwrap();
    assert!(summary.contains("QC: pass (0 issues)"));
    assert!(summary.contains("Samples: 4"));
    assert!(summary.contains("normal=2"));
    assert!(summary.contains("carrier=1"));
    assert!(summary.contains("B3 Patient 3: SMA affected (Werdnig-Hoffmann disease)"));
}

#[test]
fn sample_without_locus1_data_is_invalid() {
    let mut wells = in_memory_wells();
    wells.push(WellRecord::from_cts("C3", "No FAM", None, Some(23.0), Some(25.0)));
    let report = analyze_plate(wells, layout(), AnalysisConfig::new(Mode::Relaxed)).unwrap();
    let c3 = report.samples.iter().find(|s| s.well == "C3").unwrap();
    assert_eq!(c3.diagnosis.as_str(), "invalid");
    assert!(!c3.valid);
    assert_eq!(c3.locus1.code, Some(0));
    assert_eq!(c3.locus2.code, Some(0));
}

#[test]
fn conflicting_fam_rows_make_sample_invalid() {
    let content = PLATE.replace(
        "16\tB4\tPatient 4\tFAM\t21.5\n",
        "16\tB4\tPatient 4\tFAM\t24.0\n16\tB4\tPatient 4\tFAM\t23.1\n",
    );
    let plate = parse_plate(&content, "run_07.tsv", &InstrumentProfile::qs3()).unwrap();
    assert_eq!(plate.warnings.len(), 1);
    let report = analyze_plate(plate.wells, layout(), AnalysisConfig::new(Mode::Relaxed)).unwrap();
    assert_eq!(report.qc.status, "pass");
    let b4 = report.samples.iter().find(|s| s.well == "B4").unwrap();
    assert_eq!(b4.diagnosis.as_str(), "invalid");
    assert!(!b4.valid);
}

#[test]
fn repeated_well_keeps_first_record() {
    let mut wells = in_memory_wells();
    // a second A1 would break the 1n calibrator if it replaced the first
    wells.push(WellRecord::from_cts("a1", "Std 1", Some(22.0), Some(23.9), Some(25.0)));
    wells.push(WellRecord::from_cts("C1", "Kid again", Some(24.0), Some(23.6), Some(25.0)));
    let report = analyze_plate(wells, layout(), AnalysisConfig::new(Mode::Relaxed)).unwrap();

    assert_eq!(report.qc.status, "pass");
    let cal = report.qc.calibration.as_ref().unwrap();
    assert_eq!(cal.locus1.n1, 1.0);
    assert_eq!(report.samples.len(), 1);
    assert_eq!(report.samples[0].sample_name, "Kid");
    assert_eq!(
        report
            .warnings
            .iter()
            .filter(|w| w.contains("appears more than once"))
            .count(),
        2
    );
}
