// Flat-file persistence: one comma-separated record per line.
//
// A missing file is created empty (along with its parent directories) and
// loads as zero records. Students and teachers follow the same rule.

use crate::error::Result;
use crate::record::FlatRecord;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Make sure `path` exists, creating parent directories and an empty file
/// when it does not.
pub fn ensure_file(path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    if !path.exists() {
        log::info!("Creating empty roster file {}", path.display());
        OpenOptions::new().create(true).append(true).open(path)?;
    }
    Ok(())
}

/// Create the directory `path` will live in, if missing.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Load every well-formed record from a roster file.
pub fn load_records<R: FlatRecord>(path: &Path) -> Result<Vec<R>> {
    ensure_file(path)?;
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().collect::<std::io::Result<Vec<String>>>()?;
    let records = parse_lines(lines);
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Overwrite a roster file with the given records, in order.
///
/// The records go to a sibling temp file that is then renamed over `path`,
/// so an interrupted save leaves either the old file or the new one.
pub fn save_records<R: FlatRecord>(path: &Path, records: &[R]) -> Result<()> {
    ensure_parent_dir(path)?;
    let tmp_path = temp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        for record in records {
            writer.write_all(record.to_line().as_bytes())?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    log::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

fn parse_lines<R, I>(lines: I) -> Vec<R>
where
    R: FlatRecord,
    I: IntoIterator<Item = String>,
{
    let mut records = Vec::new();
    for (number, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match R::from_line(&line) {
            Some(record) => records.push(record),
            None => log::debug!(
                "Skipping line {}: expected {} fields",
                number + 1,
                R::FIELD_COUNT
            ),
        }
    }
    records
}
