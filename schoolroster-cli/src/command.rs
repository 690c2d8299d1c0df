use schoolroster::{Query, Row};

/// A read-only roster lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Student { surname: String },
    StudentBus { surname: String },
    TeacherStudents { surname: String },
    Bus { id: String },
    Grade { id: String },
    GradeTeachers { id: String },
    ClassroomStudents { id: String },
    ClassroomTeachers { id: String },
}

impl Lookup {
    pub fn run(&self, query: Query<'_>) -> Vec<Row> {
        match self {
            Lookup::Student { surname } => query.find_student(surname).collect(),
            Lookup::StudentBus { surname } => query.find_student_bus(surname).collect(),
            Lookup::TeacherStudents { surname } => query.find_teacher_students(surname).collect(),
            Lookup::Bus { id } => query.find_bus(id).collect(),
            Lookup::Grade { id } => query.find_grade(id).collect(),
            Lookup::GradeTeachers { id } => query.find_grade_teachers(id).collect(),
            Lookup::ClassroomStudents { id } => query.find_classroom_students(id).collect(),
            Lookup::ClassroomTeachers { id } => query.find_classroom_teachers(id).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Xml,
}

/// One parsed line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    Stats,
    Save(ExportFormat),
    Lookup(Lookup),
    AddStudent,
    AddTeacher,
    DeleteStudent { surname: String, first: Option<String> },
    UpdateStudent { surname: String, first: Option<String> },
    /// A known command with missing or unusable arguments
    Usage(&'static str),
    Unknown,
}

impl Command {
    /// Parse a line of input. Blank lines yield `None`.
    ///
    /// The command word is case-insensitive. Query commands match on their
    /// first letter (`S`, `Student:`), the rest on their short or full name.
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let word = parts.first()?.to_uppercase();
        let arg = |i: usize| parts.get(i).map(|s| s.to_string());
        let flag = |i: usize, letter: char| {
            parts
                .get(i)
                .map_or(false, |s| s.to_uppercase().starts_with(letter))
        };

        let command = match word.as_str() {
            "Q" | "QUIT" => Command::Quit,
            "H" | "HELP" => Command::Help,
            "SAVE" => match parts.get(1).map(|s| s.to_uppercase()).as_deref() {
                Some("J" | "JSON") => Command::Save(ExportFormat::Json),
                Some("X" | "XML") => Command::Save(ExportFormat::Xml),
                Some(_) => Command::Usage("Specify the format J[SON] or X[ML]."),
                None => Command::Usage("SAVE J[SON] or SAVE X[ML]."),
            },
            "STAT" | "STATS" => Command::Stats,
            w if w.starts_with('S') => match arg(1) {
                Some(surname) if flag(2, 'B') => Command::Lookup(Lookup::StudentBus { surname }),
                Some(surname) => Command::Lookup(Lookup::Student { surname }),
                None => Command::Usage("Specify the student's surname."),
            },
            w if w.starts_with('T') => match arg(1) {
                Some(surname) => Command::Lookup(Lookup::TeacherStudents { surname }),
                None => Command::Usage("Specify the teacher's surname."),
            },
            w if w.starts_with('B') => match arg(1) {
                Some(id) => Command::Lookup(Lookup::Bus { id }),
                None => Command::Usage("Specify the bus number."),
            },
            w if w.starts_with('G') => match arg(1) {
                Some(id) if flag(2, 'T') => Command::Lookup(Lookup::GradeTeachers { id }),
                Some(id) => Command::Lookup(Lookup::Grade { id }),
                None => Command::Usage("Specify the grade."),
            },
            w if w.starts_with('C') => match arg(1) {
                Some(id) if flag(2, 'T') => Command::Lookup(Lookup::ClassroomTeachers { id }),
                Some(id) => Command::Lookup(Lookup::ClassroomStudents { id }),
                None => Command::Usage("Specify the classroom."),
            },
            "A" | "ADD" => {
                if flag(1, 'S') {
                    Command::AddStudent
                } else if flag(1, 'T') {
                    Command::AddTeacher
                } else {
                    Command::Usage("ADD S[tudent] or ADD T[eacher]")
                }
            }
            "D" | "DELETE" => match (flag(1, 'S'), arg(2)) {
                (true, Some(surname)) => Command::DeleteStudent {
                    surname,
                    first: arg(3),
                },
                _ => Command::Usage("DELETE S[tudent] <lastname> [first]"),
            },
            "U" | "UPDATE" => match (flag(1, 'S'), arg(2)) {
                (true, Some(surname)) => Command::UpdateStudent {
                    surname,
                    first: arg(3),
                },
                _ => Command::Usage("UPDATE S[tudent] <lastname> [first]"),
            },
            _ => Command::Unknown,
        };
        Some(command)
    }
}
