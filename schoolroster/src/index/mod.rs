use crate::record::{Student, Teacher};
use std::collections::HashMap;

/// Normalize a surname into its `by_last` key.
pub fn surname_key(surname: &str) -> String {
    surname.to_uppercase()
}

/// A multimap from a field value to record positions.
/// Positions keep insertion order per key, and keys keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Postings {
    keys: Vec<String>,
    entries: HashMap<String, Vec<usize>>,
}

impl Postings {
    pub fn push(&mut self, key: &str, position: usize) {
        match self.entries.get_mut(key) {
            Some(positions) => positions.push(position),
            None => {
                self.keys.push(key.to_string());
                self.entries.insert(key.to_string(), vec![position]);
            }
        }
    }

    /// Positions stored under `key`, empty when the key is absent
    pub fn get(&self, key: &str) -> &[usize] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate keys in first-seen order with their positions
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> + Clone + '_ {
        self.keys.iter().map(move |key| (key.as_str(), self.get(key)))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// The five lookup mappings derived from the record lists.
///
/// Student mappings hold positions into the student list, the teacher
/// mapping holds positions into the teacher list. Appending a record keeps
/// every existing position valid, so adds insert incrementally; any removal
/// or field change requires [`IndexSet::build`] again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexSet {
    /// Upper-cased surname
    pub by_last: Postings,
    pub by_bus: Postings,
    pub by_classroom: Postings,
    pub by_grade: Postings,
    pub teachers_by_classroom: Postings,
}

impl IndexSet {
    /// Build every mapping in one pass over both lists
    pub fn build(students: &[Student], teachers: &[Teacher]) -> Self {
        let mut index = IndexSet::default();
        for (position, student) in students.iter().enumerate() {
            index.insert_student(position, student);
        }
        for (position, teacher) in teachers.iter().enumerate() {
            index.insert_teacher(position, teacher);
        }
        log::debug!(
            "Built indexes: {} surnames, {} buses, {} classrooms, {} grades, {} teacher classrooms",
            index.by_last.len(),
            index.by_bus.len(),
            index.by_classroom.len(),
            index.by_grade.len(),
            index.teachers_by_classroom.len()
        );
        index
    }

    pub fn insert_student(&mut self, position: usize, student: &Student) {
        self.by_last.push(&surname_key(&student.last), position);
        self.by_bus.push(&student.bus, position);
        self.by_classroom.push(&student.classroom, position);
        self.by_grade.push(&student.grade, position);
    }

    pub fn insert_teacher(&mut self, position: usize, teacher: &Teacher) {
        self.teachers_by_classroom.push(&teacher.classroom, position);
    }
}
