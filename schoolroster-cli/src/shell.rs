use crate::command::{Command, ExportFormat, Lookup};
use crate::help::HELP;
use schoolroster::config::display_name;
use schoolroster::{Roster, RosterError, Student, StudentPatch, Teacher};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub const FAREWELL: &str = "Goodbye!";
pub const INTERRUPTED: &str = "Interrupted. Goodbye!";

/// Whether the loop should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Ctrl-C state shared between the signal handler and the shell. A request
/// that lands while a command is writing files waits for that command.
#[derive(Debug, Default)]
pub struct Interrupt {
    requested: AtomicBool,
    busy: AtomicBool,
}

impl Interrupt {
    /// Record a Ctrl-C. Returns `true` when no write is in progress and the
    /// process may exit right away.
    pub fn request(&self) -> bool {
        self.requested.store(true, Ordering::SeqCst);
        !self.busy.load(Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Run `f` with exits deferred.
    fn hold<T>(&self, f: impl FnOnce() -> T) -> T {
        self.busy.store(true, Ordering::SeqCst);
        let result = f();
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}

/// The interactive command loop. Owns the roster session and threads it
/// through every command.
pub struct Shell<R, W> {
    roster: Roster,
    input: R,
    out: W,
    interrupt: Arc<Interrupt>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(roster: Roster, input: R, out: W) -> Self {
        Shell {
            roster,
            input,
            out,
            interrupt: Arc::default(),
        }
    }

    /// Handle for the Ctrl-C handler
    pub fn interrupt(&self) -> Arc<Interrupt> {
        Arc::clone(&self.interrupt)
    }

    pub fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP}")
    }

    /// Read and execute commands until QUIT or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "\n> ")?;
            self.out.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    writeln!(self.out, "\n{FAREWELL}")?;
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    writeln!(self.out, "Error: {e}")?;
                    continue;
                }
                Err(e) => return Err(e),
            }

            if self.execute_line(&line)? == Flow::Quit {
                return Ok(());
            }
            if self.interrupt.is_requested() {
                writeln!(self.out, "\n{INTERRUPTED}")?;
                return Ok(());
            }
        }
    }

    /// Execute one line of input. Command failures are reported to the
    /// output and do not stop the shell.
    pub fn execute_line(&mut self, line: &str) -> io::Result<Flow> {
        let Some(command) = Command::parse(line) else {
            return Ok(Flow::Continue);
        };
        log::debug!("Executing {command:?}");
        match self.dispatch(command) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                log::error!("Command failed: {e}");
                writeln!(self.out, "Error: {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow, RosterError> {
        match command {
            Command::Quit => {
                writeln!(self.out, "{FAREWELL}")?;
                return Ok(Flow::Quit);
            }
            Command::Help => self.print_help()?,
            Command::Stats => self.show_statistics()?,
            Command::Save(format) => self.export(format)?,
            Command::Lookup(lookup) => self.lookup(&lookup)?,
            Command::AddStudent => self.add_student()?,
            Command::AddTeacher => self.add_teacher()?,
            Command::DeleteStudent { surname, first } => {
                self.delete_student(&surname, first.as_deref())?
            }
            Command::UpdateStudent { surname, first } => {
                self.update_student(&surname, first.as_deref())?
            }
            Command::Usage(hint) => writeln!(self.out, "{hint}")?,
            Command::Unknown => writeln!(self.out, "Unknown command. (HELP for the list)")?,
        }
        Ok(Flow::Continue)
    }

    fn lookup(&mut self, lookup: &Lookup) -> io::Result<()> {
        let start = Instant::now();
        let rows = lookup.run(self.roster.query());
        let elapsed = start.elapsed().as_millis();

        if rows.is_empty() {
            writeln!(self.out, "Nothing found.")?;
        }
        for row in &rows {
            writeln!(self.out, "{row}")?;
        }
        writeln!(self.out, "{elapsed}ms")
    }

    fn show_statistics(&mut self) -> io::Result<()> {
        let stats = self.roster.statistics();
        writeln!(self.out, "Total students: {}", stats.total)?;
        for grade in &stats.grades {
            writeln!(self.out, "Grade {}: {} students", grade.grade, grade.count)?;
        }
        Ok(())
    }

    fn export(&mut self, format: ExportFormat) -> Result<(), RosterError> {
        let roster = &self.roster;
        let written = self.interrupt.hold(|| match format {
            ExportFormat::Json => roster.export_json(),
            ExportFormat::Xml => roster.export_xml(),
        })?;
        match written {
            Some(path) => writeln!(self.out, "Data saved to {}", display_name(&path))?,
            None => writeln!(self.out, "Nothing exported: this roster has no data directory.")?,
        }
        Ok(())
    }

    fn add_student(&mut self) -> Result<(), RosterError> {
        let last = self.prompt("Surname: ")?;
        let first = self.prompt("First name: ")?;
        let grade = self.prompt("Grade: ")?;
        let classroom = self.prompt("Classroom: ")?;
        let bus = self.prompt("Bus: ")?;

        let student = Student::new(&last, &first, &grade, &classroom, &bus);
        let roster = &mut self.roster;
        self.interrupt.hold(|| roster.add_student(student))?;
        self.report_saved_students()?;
        writeln!(self.out, "Student added.")?;
        Ok(())
    }

    fn add_teacher(&mut self) -> Result<(), RosterError> {
        let last = self.prompt("Surname: ")?;
        let first = self.prompt("First name: ")?;
        let classroom = self.prompt("Classroom: ")?;

        let teacher = Teacher::new(&last, &first, &classroom);
        let roster = &mut self.roster;
        self.interrupt.hold(|| roster.add_teacher(teacher))?;
        self.report_saved_teachers()?;
        writeln!(self.out, "Teacher added.")?;
        Ok(())
    }

    fn delete_student(&mut self, surname: &str, first: Option<&str>) -> Result<(), RosterError> {
        let roster = &mut self.roster;
        let removed = self
            .interrupt
            .hold(|| roster.delete_student(surname, first))?;
        if removed == 0 {
            writeln!(self.out, "Student not found.")?;
            return Ok(());
        }
        self.report_saved_students()?;
        writeln!(self.out, "Deleted {removed} student(s).")?;
        Ok(())
    }

    fn update_student(&mut self, surname: &str, first: Option<&str>) -> Result<(), RosterError> {
        let Some(current) = self.roster.find_update_target(surname, first).cloned() else {
            writeln!(self.out, "No student found to update.")?;
            return Ok(());
        };

        writeln!(self.out, "Leave a field empty to keep its current value.")?;
        let patch = StudentPatch {
            last: self.prompt(&format!("Surname [{}]: ", current.last))?,
            first: self.prompt(&format!("First name [{}]: ", current.first))?,
            grade: self.prompt(&format!("Grade [{}]: ", current.grade))?,
            classroom: self.prompt(&format!("Classroom [{}]: ", current.classroom))?,
            bus: self.prompt(&format!("Bus [{}]: ", current.bus))?,
        };

        let roster = &mut self.roster;
        let updated = self
            .interrupt
            .hold(|| roster.update_student(surname, first, &patch))?;
        if !updated {
            writeln!(self.out, "No student found to update.")?;
            return Ok(());
        }
        self.report_saved_students()?;
        writeln!(self.out, "Student updated.")?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<String, RosterError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(RosterError::Other(
                "input closed before the command finished".to_string(),
            ));
        }
        Ok(line.trim().to_string())
    }

    fn report_saved_students(&mut self) -> io::Result<()> {
        let count = self.roster.students().len();
        match self.roster.files().map(|f| f.students.clone()) {
            Some(path) => self.report_saved(count, "students", &path),
            None => Ok(()),
        }
    }

    fn report_saved_teachers(&mut self) -> io::Result<()> {
        let count = self.roster.teachers().len();
        match self.roster.files().map(|f| f.teachers.clone()) {
            Some(path) => self.report_saved(count, "teachers", &path),
            None => Ok(()),
        }
    }

    fn report_saved(&mut self, count: usize, what: &str, path: &Path) -> io::Result<()> {
        writeln!(self.out, "Saved {count} {what} to {}", display_name(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolroster::RosterConfig;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn sample_roster() -> Roster {
        Roster::in_memory(
            vec![
                Student::new("Smith", "Anna", "3", "101", "52"),
                Student::new("Lee", "Bob", "5", "105", "7"),
                Student::new("Lee", "Cy", "5", "105", "7"),
            ],
            vec![Teacher::new("Doe", "John", "105")],
        )
    }

    /// Feed `input` to a fresh shell and return everything it printed
    fn session(roster: Roster, input: &str) -> (String, Roster) {
        let mut out = Vec::new();
        let roster = {
            let mut shell = Shell::new(roster, Cursor::new(input.as_bytes()), &mut out);
            shell.run().unwrap();
            shell.roster
        };
        (String::from_utf8(out).unwrap(), roster)
    }

    #[test]
    fn test_query_prints_rows_and_timing() {
        let (out, _) = session(sample_roster(), "S lee\nQ\n");
        assert!(out.contains("Lee, Bob, 5, 105, 7, Doe, John\n"));
        assert!(out.contains("Lee, Cy, 5, 105, 7, Doe, John\n"));
        assert!(out.lines().any(|l| l.ends_with("ms") && l.trim_end_matches("ms").parse::<u128>().is_ok()));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_empty_result_says_nothing_found() {
        let (out, _) = session(sample_roster(), "B 999\n");
        assert!(out.contains("Nothing found.\n"));
        // End of input also says goodbye
        assert!(out.ends_with("\nGoodbye!\n"));
    }

    #[test]
    fn test_unknown_and_usage_leave_state_alone() {
        let (out, roster) = session(sample_roster(), "frobnicate\nDELETE S\nG\n");
        assert!(out.contains("Unknown command. (HELP for the list)"));
        assert!(out.contains("DELETE S[tudent] <lastname> [first]"));
        assert!(out.contains("Specify the grade."));
        assert_eq!(roster.students().len(), 3);
    }

    #[test]
    fn test_add_student_prompts_for_fields() {
        let (out, roster) = session(
            sample_roster(),
            "ADD S\n Kim \nDana\n5\n105\n9\nC 105\n",
        );
        assert!(out.contains("Surname: First name: Grade: Classroom: Bus: Student added."));
        assert_eq!(
            roster.students().last(),
            Some(&Student::new("Kim", "Dana", "5", "105", "9"))
        );
        assert!(out.contains("Kim, Dana\n"));
    }

    #[test]
    fn test_add_teacher() {
        let (out, roster) = session(sample_roster(), "A T\nRoe\nJane\n101\nS Smith\n");
        assert!(out.contains("Teacher added."));
        assert_eq!(roster.teachers().len(), 2);
        assert!(out.contains("Smith, Anna, 3, 101, 52, Roe, Jane"));
    }

    #[test]
    fn test_delete_reports_count() {
        let (out, roster) = session(sample_roster(), "D S lee\nD S lee\n");
        assert!(out.contains("Deleted 2 student(s)."));
        assert!(out.contains("Student not found."));
        assert_eq!(roster.students().len(), 1);
    }

    #[test]
    fn test_update_keeps_blank_answers() {
        let (out, roster) = session(sample_roster(), "UPDATE S Lee Cy\n\n\n6\n\n8\n");
        assert!(out.contains("Surname [Lee]: "));
        assert!(out.contains("Bus [7]: "));
        assert!(out.contains("Student updated."));
        assert_eq!(roster.students()[2], Student::new("Lee", "Cy", "6", "105", "8"));
        assert_eq!(roster.students()[1], Student::new("Lee", "Bob", "5", "105", "7"));
    }

    #[test]
    fn test_update_missing_student() {
        let (out, _) = session(sample_roster(), "U S Nobody\n");
        assert!(out.contains("No student found to update."));
    }

    #[test]
    fn test_input_closed_mid_prompt_is_reported() {
        let (out, roster) = session(sample_roster(), "ADD S\nKim\n");
        assert!(out.contains("Error: input closed before the command finished"));
        assert_eq!(roster.students().len(), 3);
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_comma_in_answer_is_rejected() {
        let (out, roster) = session(
            sample_roster(),
            "ADD S\nSmith, Jr\nAl\n1\n1\n1\nU S Lee Bob\n\n\n\n\n7,8\n",
        );
        assert!(out.contains("Error: Invalid last \"Smith, Jr\""));
        assert!(out.contains("Error: Invalid bus \"7,8\""));
        assert!(!out.contains("Student added."));
        assert_eq!(roster.students().len(), 3);
        assert_eq!(roster.students()[1].bus, "7");
    }

    #[test]
    fn test_interrupt_is_held_during_writes() {
        let interrupt = Interrupt::default();
        assert!(!interrupt.hold(|| interrupt.request()));
        assert!(interrupt.is_requested());
        assert!(interrupt.request());
    }

    #[test]
    fn test_pending_interrupt_stops_after_command() {
        let mut out = Vec::new();
        let mut shell = Shell::new(
            sample_roster(),
            Cursor::new("D S lee\nS Smith\n".as_bytes()),
            &mut out,
        );
        shell.interrupt().request();
        shell.run().unwrap();
        assert_eq!(shell.roster.students().len(), 1);
        drop(shell);

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Deleted 2 student(s)."));
        assert!(!out.contains("Smith, Anna"));
        assert!(out.ends_with("Interrupted. Goodbye!\n"));
    }

    #[test]
    fn test_statistics_output() {
        let (out, _) = session(sample_roster(), "STATS\n");
        assert!(out.contains("Total students: 3\nGrade 3: 1 students\nGrade 5: 2 students\n"));
    }

    #[test]
    fn test_commands_persist_and_export() {
        let tmp = TempDir::new().unwrap();
        let roster = Roster::open(tmp.path(), &RosterConfig::default()).unwrap();
        let (out, _) = session(
            roster,
            "ADD S\nLee\nAnn\n2\n7\n1\nSAVE JSON\nSAVE X\nQUIT\n",
        );
        assert!(out.contains("Saved 1 students to list.txt"));
        assert!(out.contains("Data saved to school_data.json"));
        assert!(out.contains("Data saved to school_data.xml"));
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("list.txt")).unwrap(),
            "Lee, Ann, 2, 7, 1\n"
        );
        assert!(tmp.path().join("school_data.xml").exists());
    }

    #[test]
    fn test_save_failure_keeps_shell_running() {
        let tmp = TempDir::new().unwrap();
        // A directory squatting on the export path makes the write fail
        std::fs::create_dir(tmp.path().join("school_data.json")).unwrap();
        let roster = Roster::open(tmp.path(), &RosterConfig::default()).unwrap();
        let (out, _) = session(roster, "SAVE J\nSTATS\n");
        assert!(out.contains("Error: IO error"));
        assert!(out.contains("Total students: 0"));
    }
}
