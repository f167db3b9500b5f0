use std::fs;

use kira_smacn::batch::{BatchSettings, plate_out_dir, run_batch};
use kira_smacn::config::{AnalysisConfig, Mode};
use kira_smacn::model::PlateLayout;
use serde_json::Value;
use tempfile::TempDir;

const GOOD: &str = "\
Well Position,Sample Name,Reporter,Ct
A1,Std 1,FAM,24.0
A1,Std 1,VIC,23.9
A1,Std 1,ROX,25.0
A2,Std 2,FAM,23.0
A2,Std 2,VIC,22.9
A2,Std 2,ROX,25.0
H12,NTC,FAM,
H12,NTC,VIC,
H12,NTC,ROX,
C5,Sib,FAM,24.0
C5,Sib,VIC,22.9
C5,Sib,ROX,25.0
";

fn settings(out: &std::path::Path) -> BatchSettings {
    BatchSettings {
        out_dir: out.to_path_buf(),
        layout: PlateLayout::new("H12", "A1", "A2"),
        config: AnalysisConfig::new(Mode::Relaxed),
        write_json: true,
        write_tsv: false,
        threads: 2,
    }
}

#[test]
fn plates_are_independent_and_ordered() {
    let tmp = TempDir::new().unwrap();
    let bad = GOOD.replace("H12,NTC,VIC,", "H12,NTC,VIC,27.5");
    let inputs = vec![
        tmp.path().join("plate_b.csv"),
        tmp.path().join("plate_a.csv"),
    ];
    fs::write(&inputs[0], &bad).unwrap();
    fs::write(&inputs[1], GOOD).unwrap();

    let out = tmp.path().join("out");
    let runs = run_batch(&inputs, &settings(&out)).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].run_id, "plate_b");
    assert_eq!(runs[1].run_id, "plate_a");
    assert!(!runs[0].qc_passed());
    assert!(runs[1].qc_passed());

    let json_a: Value = serde_json::from_str(
        &fs::read_to_string(plate_out_dir(&out, &inputs[1]).join("smacn.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json_a["qc"]["run_id"], "plate_a");
    assert_eq!(json_a["samples"][0]["diagnosis"], "carrier");

    let json_b: Value = serde_json::from_str(
        &fs::read_to_string(out.join("plate_b").join("smacn.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json_b["samples"][0]["diagnosis"], "inconclusive");
}

#[test]
fn duplicate_run_ids_are_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("x")).unwrap();
    let inputs = vec![tmp.path().join("p.csv"), tmp.path().join("x").join("p.tsv")];
    for input in &inputs {
        fs::write(input, GOOD).unwrap();
    }
    let err = run_batch(&inputs, &settings(&tmp.path().join("out"))).unwrap_err();
    assert!(err.to_string().contains("share run id"));
}

#[test]
fn unreadable_plate_fails_batch() {
    let tmp = TempDir::new().unwrap();
    let inputs = vec![tmp.path().join("missing.tsv")];
    let err = run_batch(&inputs, &settings(&tmp.path().join("out"))).unwrap_err();
    assert!(format!("{:#}", err).contains("missing.tsv"));
}

#[test]
fn run_label_is_suffixed_per_plate() {
    let tmp = TempDir::new().unwrap();
    let inputs = vec![tmp.path().join("p1.csv"), tmp.path().join("p2.csv")];
    for input in &inputs {
        fs::write(input, GOOD).unwrap();
    }
    let mut s = settings(&tmp.path().join("out"));
    s.config.run_label = Some("June".to_string());
    let runs = run_batch(&inputs, &s).unwrap();
    assert_eq!(runs[0].run_id, "June-p1");
    assert_eq!(runs[1].run_id, "June-p2");
    assert_eq!(runs[1].report.as_ref().unwrap().qc.run_id, "June-p2");
}
