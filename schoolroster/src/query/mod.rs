// Read-only lookups over the roster indexes.
//
// Every lookup returns a lazy iterator that is `Clone`: cloning it before
// consumption gives an independent pass over the same rows.

use crate::index::{surname_key, IndexSet};
use crate::record::{Student, Teacher};
use std::collections::BTreeSet;
use std::fmt;

/// One formatted result line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Row(fields.into_iter().map(Into::into).collect())
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// A borrowed view over the record lists and their indexes.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    students: &'a [Student],
    teachers: &'a [Teacher],
    index: &'a IndexSet,
}

impl<'a> Query<'a> {
    pub fn new(students: &'a [Student], teachers: &'a [Teacher], index: &'a IndexSet) -> Self {
        Query {
            students,
            teachers,
            index,
        }
    }

    /// Students with the given surname, each joined with the teachers of
    /// their classroom (one row per teacher, or a bare student row).
    pub fn find_student(self, surname: &str) -> impl Iterator<Item = Row> + Clone + 'a {
        self.students_by_surname(surname).flat_map(move |s| {
            let teachers: Vec<&Teacher> = self.teachers_in(&s.classroom).collect();
            if teachers.is_empty() {
                vec![Row::new([
                    &s.last,
                    &s.first,
                    &s.grade,
                    &s.classroom,
                    &s.bus,
                ])]
            } else {
                teachers
                    .into_iter()
                    .map(|t| {
                        Row::new([
                            &s.last,
                            &s.first,
                            &s.grade,
                            &s.classroom,
                            &s.bus,
                            &t.last,
                            &t.first,
                        ])
                    })
                    .collect()
            }
        })
    }

    pub fn find_student_bus(self, surname: &str) -> impl Iterator<Item = Row> + Clone + 'a {
        self.students_by_surname(surname)
            .map(|s| Row::new([s.last.clone(), s.first.clone(), format!("Bus: {}", s.bus)]))
    }

    /// Students of every classroom taught by a teacher with this surname.
    /// Classrooms are scanned in first-seen order; a classroom contributes
    /// its students once per matching teacher entry.
    pub fn find_teacher_students(
        self,
        teacher_surname: &str,
    ) -> impl Iterator<Item = Row> + Clone + 'a {
        let target = surname_key(teacher_surname);
        let teachers = self.teachers;
        self.index
            .teachers_by_classroom
            .iter()
            .flat_map(move |(classroom, positions)| {
                let target = target.clone();
                positions
                    .iter()
                    .filter(move |&&p| surname_key(&teachers[p].last) == target)
                    .map(move |_| classroom)
            })
            .flat_map(move |classroom| self.students_in(classroom).map(name_row))
    }

    pub fn find_bus(self, bus: &str) -> impl Iterator<Item = Row> + Clone + 'a {
        self.resolve_students(self.index.by_bus.get(bus))
            .map(|s| Row::new([&s.last, &s.first, &s.grade, &s.classroom]))
    }

    pub fn find_grade(self, grade: &str) -> impl Iterator<Item = Row> + Clone + 'a {
        self.resolve_students(self.index.by_grade.get(grade))
            .map(name_row)
    }

    pub fn find_classroom_students(
        self,
        classroom: &str,
    ) -> impl Iterator<Item = Row> + Clone + 'a {
        self.students_in(classroom).map(name_row)
    }

    pub fn find_classroom_teachers(
        self,
        classroom: &str,
    ) -> impl Iterator<Item = Row> + Clone + 'a {
        self.teachers_in(classroom)
            .map(|t| Row::new([&t.last, &t.first, &t.classroom]))
    }

    /// Distinct teachers of every classroom that holds a student of the
    /// grade, ordered by (surname, first, classroom).
    pub fn find_grade_teachers(self, grade: &str) -> impl Iterator<Item = Row> + Clone + 'a {
        let found: BTreeSet<(&'a str, &'a str, &'a str)> = self
            .resolve_students(self.index.by_grade.get(grade))
            .flat_map(|s| self.teachers_in(&s.classroom))
            .map(|t| (t.last.as_str(), t.first.as_str(), t.classroom.as_str()))
            .collect();
        found
            .into_iter()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(last, first, classroom)| Row::new([last, first, classroom]))
    }

    fn students_by_surname(self, surname: &str) -> impl Iterator<Item = &'a Student> + Clone {
        self.resolve_students(self.index.by_last.get(&surname_key(surname)))
    }

    fn students_in(self, classroom: &str) -> impl Iterator<Item = &'a Student> + Clone {
        self.resolve_students(self.index.by_classroom.get(classroom))
    }

    fn teachers_in(self, classroom: &str) -> impl Iterator<Item = &'a Teacher> + Clone {
        let teachers = self.teachers;
        self.index
            .teachers_by_classroom
            .get(classroom)
            .iter()
            .map(move |&p| &teachers[p])
    }

    fn resolve_students(
        self,
        positions: &'a [usize],
    ) -> impl Iterator<Item = &'a Student> + Clone {
        let students = self.students;
        positions.iter().map(move |&p| &students[p])
    }
}

fn name_row(s: &Student) -> Row {
    Row::new([&s.last, &s.first])
}
