use crate::record::{Student, Teacher};

/// The authoritative, ordered record lists for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    students: Vec<Student>,
    teachers: Vec<Teacher>,
}

impl RecordStore {
    pub fn new(students: Vec<Student>, teachers: Vec<Teacher>) -> Self {
        RecordStore { students, teachers }
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// Append a student, returning its position
    pub fn push_student(&mut self, student: Student) -> usize {
        self.students.push(student);
        self.students.len() - 1
    }

    /// Append a teacher, returning its position
    pub fn push_teacher(&mut self, teacher: Teacher) -> usize {
        self.teachers.push(teacher);
        self.teachers.len() - 1
    }

    /// Remove every student matching the predicate, keeping the order of
    /// the rest. Returns how many were removed.
    pub fn remove_students_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Student) -> bool,
    {
        let before = self.students.len();
        self.students.retain(|s| !predicate(s));
        before - self.students.len()
    }

    /// First student (in store order) matching the predicate
    pub fn first_student_mut<F>(&mut self, mut predicate: F) -> Option<&mut Student>
    where
        F: FnMut(&Student) -> bool,
    {
        self.students.iter_mut().find(|s| predicate(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_returns_positions() {
        let mut store = RecordStore::default();
        assert_eq!(store.push_student(Student::new("A", "a", "1", "1", "1")), 0);
        assert_eq!(store.push_student(Student::new("B", "b", "1", "1", "1")), 1);
        assert_eq!(store.push_teacher(Teacher::new("T", "t", "1")), 0);
        assert_eq!(store.students().len(), 2);
        assert_eq!(store.teachers().len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = RecordStore::new(
            vec![
                Student::new("A", "a", "1", "1", "1"),
                Student::new("B", "b", "1", "1", "1"),
                Student::new("A", "c", "1", "1", "1"),
                Student::new("C", "d", "1", "1", "1"),
            ],
            vec![],
        );
        assert_eq!(store.remove_students_where(|s| s.last == "A"), 2);
        let firsts: Vec<&str> = store.students().iter().map(|s| s.first.as_str()).collect();
        assert_eq!(firsts, vec!["b", "d"]);
        assert_eq!(store.remove_students_where(|s| s.last == "Z"), 0);
    }

    #[test]
    fn test_first_student_mut_picks_earliest() {
        let mut store = RecordStore::new(
            vec![
                Student::new("A", "a", "1", "1", "1"),
                Student::new("A", "b", "1", "1", "1"),
            ],
            vec![],
        );
        let target = store.first_student_mut(|s| s.last == "A").unwrap();
        target.grade = "9".to_string();
        assert_eq!(store.students()[0].grade, "9");
        assert_eq!(store.students()[1].grade, "1");
        assert!(store.first_student_mut(|s| s.last == "Q").is_none());
    }
}
