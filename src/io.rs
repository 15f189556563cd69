use crate::config::FacilitySpec;
use crate::encode::{NamedRoster, RosterBundle};
use crate::model::{Assignment, RosterModel};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Import d'établissements depuis CSV: header `name,required[,excluded]`
///
/// `excluded` : jours (1..=D) séparés par `;`, ou plages `a-b`.
pub fn import_facilities_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<FacilitySpec>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let required = rec.get(1).context("missing required")?.trim();
        if name.is_empty() {
            bail!("invalid facility row (empty name)");
        }
        let required: u32 = required
            .parse()
            .with_context(|| format!("invalid required count for facility {name}"))?;
        let excluded_days = match rec.get(2).map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_excluded(raw)
                .with_context(|| format!("invalid excluded days for facility {name}"))?,
            _ => BTreeSet::new(),
        };
        out.push(FacilitySpec {
            name: name.to_string(),
            required,
            excluded_days,
        });
    }
    Ok(out)
}

const MAX_MONTH_DAYS: u32 = 31;

fn parse_day(raw: &str) -> anyhow::Result<u32> {
    let raw = raw.trim();
    let day: u32 = raw.parse().with_context(|| format!("invalid day: {raw}"))?;
    if !(1..=MAX_MONTH_DAYS).contains(&day) {
        bail!("day {day} is outside 1..={MAX_MONTH_DAYS}");
    }
    Ok(day)
}

fn parse_excluded(raw: &str) -> anyhow::Result<BTreeSet<u32>> {
    let mut days = BTreeSet::new();
    for chunk in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((from, to)) = chunk.split_once('-') {
            let (from, to) = (parse_day(from)?, parse_day(to)?);
            if to < from {
                bail!("invalid day range: {chunk}");
            }
            days.extend(from..=to);
        } else {
            days.insert(parse_day(chunk)?);
        }
    }
    Ok(days)
}

/// CSV d'un roster: header `date,facility`
pub fn roster_csv_bytes(roster: &NamedRoster) -> anyhow::Result<Vec<u8>> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    w.write_record(["date", "facility"])?;
    for entry in &roster.entries {
        let label = entry.label();
        w.write_record([label.as_str(), entry.facility.as_str()])?;
    }
    w.into_inner()
        .map_err(|err| anyhow::anyhow!("flushing roster csv: {}", err.error()))
}

pub fn export_roster_csv<P: AsRef<Path>>(path: P, roster: &NamedRoster) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), &roster_csv_bytes(roster)?)
}

#[derive(Serialize)]
struct Manifest<'a> {
    name: &'a str,
    termination: &'a str,
    patterns: usize,
    files: Vec<String>,
}

/// Écrit `dir/<bundle>/<roster>.csv` pour chaque roster, plus un `manifest.json`.
/// Retourne les chemins des CSV dans l'ordre des motifs.
pub fn export_bundle_dir<P: AsRef<Path>>(dir: P, bundle: &RosterBundle) -> anyhow::Result<Vec<PathBuf>> {
    let target = dir.as_ref().join(&bundle.name);
    fs::create_dir_all(&target)
        .with_context(|| format!("creating bundle directory {}", target.display()))?;

    let mut written = Vec::with_capacity(bundle.len());
    let mut files = Vec::with_capacity(bundle.len());
    for roster in &bundle.rosters {
        let file_name = format!("{}.csv", roster.name);
        let path = target.join(&file_name);
        export_roster_csv(&path, roster)?;
        files.push(file_name);
        written.push(path);
    }

    let manifest = Manifest {
        name: &bundle.name,
        termination: &bundle.termination,
        patterns: bundle.len(),
        files,
    };
    write_atomic(&target.join("manifest.json"), &serde_json::to_vec_pretty(&manifest)?)?;
    Ok(written)
}

/// Archive deflate contenant un `<roster>.csv` par motif, dans l'ordre des motifs.
pub fn bundle_zip_bytes(bundle: &RosterBundle) -> anyhow::Result<Vec<u8>> {
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for roster in &bundle.rosters {
        archive
            .start_file(format!("{}.csv", roster.name), options)
            .with_context(|| format!("adding {} to archive", roster.name))?;
        archive.write_all(&roster_csv_bytes(roster)?)?;
    }
    let cursor = archive.finish().context("finishing archive")?;
    Ok(cursor.into_inner())
}

/// Écrit `dir/<bundle>.zip` de manière atomique et retourne son chemin.
pub fn export_bundle_zip<P: AsRef<Path>>(dir: P, bundle: &RosterBundle) -> anyhow::Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    let path = dir.join(format!("{}.zip", bundle.name));
    write_atomic(&path, &bundle_zip_bytes(bundle)?)?;
    Ok(path)
}

/// Export JSON du bundle (jolie mise en forme)
pub fn export_bundle_json<P: AsRef<Path>>(path: P, bundle: &RosterBundle) -> anyhow::Result<()> {
    write_atomic(path.as_ref(), &serde_json::to_vec_pretty(bundle)?)
}

/// Relit un roster CSV (`date,facility`) en affectation sur `model`.
///
/// Les jours absents du fichier restent non couverts et remontent comme violations.
pub fn import_roster_csv<P: AsRef<Path>>(path: P, model: &RosterModel) -> anyhow::Result<Assignment> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut picks = vec![usize::MAX; model.days()];
    let mut seen = BTreeSet::new();
    for rec in rdr.records() {
        let rec = rec?;
        let raw_date = rec.get(0).context("missing date")?.trim();
        let name = rec.get(1).context("missing facility")?.trim();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .with_context(|| format!("invalid date: {raw_date}"))?;
        let offset = date.signed_duration_since(model.start()).num_days();
        let day = usize::try_from(offset)
            .ok()
            .filter(|&d| d < model.days())
            .with_context(|| format!("date {raw_date} is outside the roster period"))?;
        if !seen.insert(day) {
            bail!("date {raw_date} listed twice");
        }
        picks[day] = model
            .facility_index(name)
            .with_context(|| format!("unknown facility: {name}"))?;
    }
    Ok(Assignment::from_indices(picks))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(parent).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
