use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};

use crate::config::InstrumentProfile;
use crate::ctx::run_id_from_path;
use crate::io::open_maybe_gz;
use crate::model::{Channel, CtReading, WellRecord};

const WELL_ALIASES: &[&str] = &["well position", "well", "pos"];
const SAMPLE_ALIASES: &[&str] = &["sample name", "sample", "name"];
const REPORTER_ALIASES: &[&str] = &["reporter", "dye", "target dye"];
const CT_ALIASES: &[&str] = &["ct", "cq", "cp"];

const ILLEGAL_NAME_CHARS: &[char] = &['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>', '.'];

#[derive(Debug, Clone)]
pub struct PlateData {
    pub run_id: String,
    pub wells: Vec<WellRecord>,
    pub warnings: Vec<String>,
}

/// Replaces characters that are unsafe in file names with `-`.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if ILLEGAL_NAME_CHARS.contains(&c) { '-' } else { c })
        .collect()
}

/// Reads a long-format plate export (one row per well and dye).
pub fn read_plate(path: &Path, profile: &InstrumentProfile) -> Result<PlateData> {
    let mut reader = open_maybe_gz(path)
        .with_context(|| format!("failed to open plate export {}", path.display()))?;
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read plate export {}", path.display()))?;
    let mut plate = parse_plate(&content, &path.display().to_string(), profile)?;
    plate.run_id = run_id_from_path(path);
    info!(
        run_id = %plate.run_id,
        wells = plate.wells.len(),
        instrument = %profile.instrument,
        "plate loaded"
    );
    Ok(plate)
}

struct Columns {
    well: usize,
    sample: usize,
    reporter: usize,
    ct: usize,
}

impl Columns {
    fn max_index(&self) -> usize {
        self.well.max(self.sample).max(self.reporter).max(self.ct)
    }
}

pub fn parse_plate(content: &str, source: &str, profile: &InstrumentProfile) -> Result<PlateData> {
    let mut lines = content.lines().enumerate();

    let mut header = None;
    for (idx, line) in lines.by_ref() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let delim = if trimmed.contains('\t') { '\t' } else { ',' };
        let cells = split_row(trimmed, delim);
        if find_column(&cells, WELL_ALIASES).is_some() && find_column(&cells, CT_ALIASES).is_some()
        {
            header = Some((idx + 1, delim, cells));
            break;
        }
        debug!(source, line = idx + 1, "skipping preamble line");
    }
    let Some((header_line, delim, header_cells)) = header else {
        bail!("{}: no header row with well and Ct columns", source);
    };

    let mut missing = Vec::new();
    let mut resolve = |aliases: &[&str], name: &str| {
        let idx = find_column(&header_cells, aliases);
        if idx.is_none() {
            missing.push(name.to_string());
        }
        idx.unwrap_or(0)
    };
    let columns = Columns {
        well: resolve(WELL_ALIASES, "well"),
        sample: resolve(SAMPLE_ALIASES, "sample"),
        reporter: resolve(REPORTER_ALIASES, "reporter"),
        ct: resolve(CT_ALIASES, "ct"),
    };
    if !missing.is_empty() {
        bail!(
            "{}:{} missing required column(s): {}",
            source,
            header_line,
            missing.join(", ")
        );
    }

    let mut wells: Vec<WellRecord> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut conflicted: HashSet<(usize, Channel)> = HashSet::new();
    let mut warnings = Vec::new();

    for (idx, line) in lines {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let cells = split_row(trimmed, delim);
        if cells.len() <= columns.max_index() {
            let msg = format!("{}:{} row has too few columns, skipped", source, line_no);
            warn!("{}", msg);
            warnings.push(msg);
            continue;
        }
        let well = cells[columns.well].trim();
        if well.is_empty() {
            continue;
        }
        let reporter = cells[columns.reporter].trim();
        let Some(channel) = profile.channel_for(reporter) else {
            debug!(source, line = line_no, reporter, "reporter not mapped, row ignored");
            continue;
        };
        let reading = profile.normalize_ct(&cells[columns.ct]);
        let sample_name = sanitize_name(&cells[columns.sample]);

        let key = well.to_ascii_uppercase();
        let slot = *index.entry(key).or_insert_with(|| {
            wells.push(WellRecord::new(well, ""));
            wells.len() - 1
        });
        let record = &mut wells[slot];
        if record.sample_name.is_empty() && !sample_name.is_empty() {
            record.sample_name = sample_name;
        }

        if conflicted.contains(&(slot, channel)) {
            continue;
        }
        let well_name = record.well.clone();
        let current = record.reading_mut(channel);
        match *current {
            CtReading::Missing => *current = reading,
            existing if existing == reading => {}
            existing => {
                let msg = format!(
                    "{}:{} well {} has conflicting {} readings ({} vs {}); channel dropped",
                    source,
                    line_no,
                    well_name,
                    channel,
                    describe_ct(existing),
                    describe_ct(reading)
                );
                warn!("{}", msg);
                warnings.push(msg);
                *current = CtReading::Missing;
                conflicted.insert((slot, channel));
            }
        }
    }

    Ok(PlateData {
        run_id: sanitize_name(source),
        wells,
        warnings,
    })
}

fn describe_ct(reading: CtReading) -> String {
    match reading.value() {
        Some(ct) => format!("{:.2}", ct),
        None => "missing".to_string(),
    }
}

fn split_row(line: &str, delim: char) -> Vec<String> {
    line.split(delim)
        .map(|c| c.trim().trim_matches('"').trim().to_string())
        .collect()
}

// Aliases are tried in priority order, so "Well Position" wins over a
// plain numeric "Well" column when an export carries both.
fn find_column(cells: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|a| cells.iter().position(|c| c.eq_ignore_ascii_case(a)))
}
