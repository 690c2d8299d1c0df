use crate::config::{DataFiles, RosterConfig};
use crate::error::Result;
use crate::export::Snapshot;
use crate::index::IndexSet;
use crate::persist;
use crate::query::Query;
use crate::record::{FlatRecord, Student, StudentPatch, Teacher};
use crate::stats::Statistics;
use crate::store::RecordStore;
use std::path::{Path, PathBuf};

/// A roster session: the record store, its indexes, and where to persist.
///
/// Every mutation leaves the indexes matching the store exactly. Adds
/// extend the indexes in place; deletes and updates rebuild them.
pub struct Roster {
    store: RecordStore,
    index: IndexSet,
    files: Option<DataFiles>,
}

impl Roster {
    /// Open the roster files under `data_dir` using the given file layout.
    /// Missing files are created empty.
    pub fn open(data_dir: &Path, config: &RosterConfig) -> Result<Self> {
        let files = config.resolve(data_dir);
        let students: Vec<Student> = persist::load_records(&files.students)?;
        let teachers: Vec<Teacher> = persist::load_records(&files.teachers)?;
        let mut roster = Roster::in_memory(students, teachers);
        roster.files = Some(files);
        Ok(roster)
    }

    /// A roster that never touches the filesystem
    pub fn in_memory(students: Vec<Student>, teachers: Vec<Teacher>) -> Self {
        let index = IndexSet::build(&students, &teachers);
        Roster {
            store: RecordStore::new(students, teachers),
            index,
            files: None,
        }
    }

    pub fn students(&self) -> &[Student] {
        self.store.students()
    }

    pub fn teachers(&self) -> &[Teacher] {
        self.store.teachers()
    }

    pub fn index(&self) -> &IndexSet {
        &self.index
    }

    pub fn files(&self) -> Option<&DataFiles> {
        self.files.as_ref()
    }

    pub fn query(&self) -> Query<'_> {
        Query::new(self.store.students(), self.store.teachers(), &self.index)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(self.store.students())
    }

    // ── Mutations ──────────────────────────────────────────────

    /// Append a student. Values the flat file cannot hold are rejected
    /// before anything changes.
    pub fn add_student(&mut self, student: Student) -> Result<()> {
        student.check_fields()?;
        let position = self.store.push_student(student);
        self.index
            .insert_student(position, &self.store.students()[position]);
        self.save_students()
    }

    pub fn add_teacher(&mut self, teacher: Teacher) -> Result<()> {
        teacher.check_fields()?;
        let position = self.store.push_teacher(teacher);
        self.index
            .insert_teacher(position, &self.store.teachers()[position]);
        self.save_teachers()
    }

    /// Remove every student with this surname (and first name, when given).
    /// Returns the number removed; nothing is rebuilt or saved for zero.
    pub fn delete_student(&mut self, surname: &str, first: Option<&str>) -> Result<usize> {
        let removed = self
            .store
            .remove_students_where(|s| s.matches_name(surname, first));
        if removed == 0 {
            return Ok(0);
        }
        self.rebuild();
        self.save_students()?;
        Ok(removed)
    }

    /// The student an update with the same arguments would change
    pub fn find_update_target(&self, surname: &str, first: Option<&str>) -> Option<&Student> {
        self.store
            .students()
            .iter()
            .find(|s| s.matches_name(surname, first))
    }

    /// Apply `patch` to the first matching student. Returns `false` when
    /// no student matched.
    pub fn update_student(
        &mut self,
        surname: &str,
        first: Option<&str>,
        patch: &StudentPatch,
    ) -> Result<bool> {
        patch.check()?;
        match self
            .store
            .first_student_mut(|s| s.matches_name(surname, first))
        {
            Some(student) => patch.apply(student),
            None => return Ok(false),
        }
        self.rebuild();
        self.save_students()?;
        Ok(true)
    }

    // ── Persistence ────────────────────────────────────────────

    /// Write the JSON snapshot to the configured export path
    pub fn export_json(&self) -> Result<Option<PathBuf>> {
        let Some(files) = &self.files else {
            return Ok(None);
        };
        persist::ensure_parent_dir(&files.json_export)?;
        self.snapshot().write_json(&files.json_export)?;
        Ok(Some(files.json_export.clone()))
    }

    /// Write the XML snapshot to the configured export path
    pub fn export_xml(&self) -> Result<Option<PathBuf>> {
        let Some(files) = &self.files else {
            return Ok(None);
        };
        persist::ensure_parent_dir(&files.xml_export)?;
        self.snapshot().write_xml(&files.xml_export)?;
        Ok(Some(files.xml_export.clone()))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::now(self.store.students(), self.store.teachers())
    }

    pub fn save_students(&self) -> Result<()> {
        match &self.files {
            Some(files) => persist::save_records(&files.students, self.store.students()),
            None => Ok(()),
        }
    }

    pub fn save_teachers(&self) -> Result<()> {
        match &self.files {
            Some(files) => persist::save_records(&files.teachers, self.store.teachers()),
            None => Ok(()),
        }
    }

    fn rebuild(&mut self) {
        self.index = IndexSet::build(self.store.students(), self.store.teachers());
    }
}
