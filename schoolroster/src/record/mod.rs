// Roster records and their flat-file line form

use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator written between fields when a record is saved.
pub const FIELD_SEPARATOR: &str = ", ";

/// A record that round-trips through one comma-separated line.
pub trait FlatRecord: Sized {
    /// Number of fields a well-formed line must carry
    const FIELD_COUNT: usize;

    /// Element name used for this record in XML exports
    const TAG: &'static str;

    /// Build a record from exactly `FIELD_COUNT` raw fields.
    /// Returns `None` on any other count.
    fn from_fields(fields: &[&str]) -> Option<Self>;

    /// Field names paired with their current values, in line order.
    fn fields(&self) -> Vec<(&'static str, &str)>;

    /// Parse one line of a roster file. Blank lines and lines with the
    /// wrong number of fields yield `None`.
    fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        Self::from_fields(&parts)
    }

    /// Fail if any field could not survive a save and reload.
    fn check_fields(&self) -> Result<()> {
        self.fields()
            .into_iter()
            .try_for_each(|(name, value)| check_field(name, value))
    }

    /// Serialize to a single newline-terminated line.
    fn to_line(&self) -> String {
        let values: Vec<&str> = self.fields().into_iter().map(|(_, v)| v).collect();
        let mut line = values.join(FIELD_SEPARATOR);
        line.push('\n');
        line
    }
}

/// Reject a value the line format cannot carry: a comma would split it
/// into extra fields and a line break would split the record.
pub fn check_field(name: &'static str, value: &str) -> Result<()> {
    if value.contains(|c: char| matches!(c, ',' | '\n' | '\r')) {
        return Err(RosterError::InvalidField {
            field: name,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// A student as stored in the roster. Every field is free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub last: String,
    pub first: String,
    pub grade: String,
    pub classroom: String,
    pub bus: String,
}

impl Student {
    pub fn new(last: &str, first: &str, grade: &str, classroom: &str, bus: &str) -> Self {
        Student {
            last: last.trim().to_string(),
            first: first.trim().to_string(),
            grade: grade.trim().to_string(),
            classroom: classroom.trim().to_string(),
            bus: bus.trim().to_string(),
        }
    }

    /// Case-insensitive surname match, optionally narrowed by first name.
    /// An empty first name counts as not supplied.
    pub fn matches_name(&self, surname: &str, first: Option<&str>) -> bool {
        if self.last.to_uppercase() != surname.to_uppercase() {
            return false;
        }
        match first.filter(|f| !f.is_empty()) {
            Some(first) => self.first.to_uppercase() == first.to_uppercase(),
            None => true,
        }
    }
}

impl FlatRecord for Student {
    const FIELD_COUNT: usize = 5;
    const TAG: &'static str = "student";

    fn from_fields(fields: &[&str]) -> Option<Self> {
        match fields {
            [last, first, grade, classroom, bus] => {
                Some(Student::new(last, first, grade, classroom, bus))
            }
            _ => None,
        }
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("last", self.last.as_str()),
            ("first", self.first.as_str()),
            ("grade", self.grade.as_str()),
            ("classroom", self.classroom.as_str()),
            ("bus", self.bus.as_str()),
        ]
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}",
            self.last, self.first, self.grade, self.classroom, self.bus
        )
    }
}

/// A teacher assigned to a classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub last: String,
    pub first: String,
    pub classroom: String,
}

impl Teacher {
    pub fn new(last: &str, first: &str, classroom: &str) -> Self {
        Teacher {
            last: last.trim().to_string(),
            first: first.trim().to_string(),
            classroom: classroom.trim().to_string(),
        }
    }
}

impl FlatRecord for Teacher {
    const FIELD_COUNT: usize = 3;
    const TAG: &'static str = "teacher";

    fn from_fields(fields: &[&str]) -> Option<Self> {
        match fields {
            [last, first, classroom] => Some(Teacher::new(last, first, classroom)),
            _ => None,
        }
    }

    fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("last", self.last.as_str()),
            ("first", self.first.as_str()),
            ("classroom", self.classroom.as_str()),
        ]
    }
}

impl fmt::Display for Teacher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.last, self.first, self.classroom)
    }
}

/// Replacement values for an update. An empty (or all-whitespace) value
/// keeps the student's current field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub last: String,
    pub first: String,
    pub grade: String,
    pub classroom: String,
    pub bus: String,
}

impl StudentPatch {
    pub fn apply(&self, student: &mut Student) {
        replace_if_present(&mut student.last, &self.last);
        replace_if_present(&mut student.first, &self.first);
        replace_if_present(&mut student.grade, &self.grade);
        replace_if_present(&mut student.classroom, &self.classroom);
        replace_if_present(&mut student.bus, &self.bus);
    }

    /// Fail if any replacement value could not be saved.
    pub fn check(&self) -> Result<()> {
        check_field("last", &self.last)?;
        check_field("first", &self.first)?;
        check_field("grade", &self.grade)?;
        check_field("classroom", &self.classroom)?;
        check_field("bus", &self.bus)
    }
}

fn replace_if_present(field: &mut String, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *field = value.to_string();
    }
}
