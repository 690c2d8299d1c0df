// JSON and XML snapshots of the roster

use crate::error::Result;
use crate::record::{FlatRecord, Student, Teacher};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::path::Path;

/// Timestamp format for `export_time` (ISO-8601, local time, microseconds)
const EXPORT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// The exported document shape
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub students: &'a [Student],
    pub teachers: &'a [Teacher],
    pub export_time: String,
}

impl<'a> Snapshot<'a> {
    /// Snapshot stamped with the current local time
    pub fn now(students: &'a [Student], teachers: &'a [Teacher]) -> Self {
        Self::at(students, teachers, Local::now().naive_local())
    }

    pub fn at(students: &'a [Student], teachers: &'a [Teacher], time: NaiveDateTime) -> Self {
        Snapshot {
            students,
            teachers,
            export_time: time.format(EXPORT_TIME_FORMAT).to_string(),
        }
    }

    /// Pretty-printed JSON. Non-ASCII text is written as-is.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// XML document rooted at `<school>`
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<school>\n");
        write_records(&mut out, "students", self.students);
        write_records(&mut out, "teachers", self.teachers);
        out.push_str(&format!(
            "  <export_time>{}</export_time>\n",
            escape_text(&self.export_time)
        ));
        out.push_str("</school>\n");
        out
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Exported JSON snapshot to {}", path.display());
        Ok(())
    }

    pub fn write_xml(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_xml())?;
        log::info!("Exported XML snapshot to {}", path.display());
        Ok(())
    }
}

fn write_records<R: FlatRecord>(out: &mut String, group: &str, records: &[R]) {
    if records.is_empty() {
        out.push_str(&format!("  <{group} />\n"));
        return;
    }
    out.push_str(&format!("  <{group}>\n"));
    for record in records {
        out.push_str(&format!("    <{}>\n", R::TAG));
        for (name, value) in record.fields() {
            out.push_str(&format!("      <{name}>{}</{name}>\n", escape_text(value)));
        }
        out.push_str(&format!("    </{}>\n", R::TAG));
    }
    out.push_str(&format!("  </{group}>\n"));
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
