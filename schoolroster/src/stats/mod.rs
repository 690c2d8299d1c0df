use crate::record::Student;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Student head count per grade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    /// Numeric grades first in numeric order, then the rest lexicographically
    pub grades: Vec<GradeCount>,
}

impl Statistics {
    pub fn compute(students: &[Student]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for student in students {
            *counts.entry(student.grade.as_str()).or_insert(0) += 1;
        }

        let mut grades: Vec<GradeCount> = counts
            .into_iter()
            .map(|(grade, count)| GradeCount {
                grade: grade.to_string(),
                count,
            })
            .collect();
        grades.sort_by(|a, b| compare_grades(&a.grade, &b.grade));

        Statistics {
            total: students.len(),
            grades,
        }
    }
}

fn is_numeric(grade: &str) -> bool {
    !grade.is_empty() && grade.bytes().all(|b| b.is_ascii_digit())
}

/// Order numeric grades by value (arbitrary length, leading zeros ignored)
/// ahead of every non-numeric grade.
pub fn compare_grades(a: &str, b: &str) -> Ordering {
    match (is_numeric(a), is_numeric(b)) {
        (true, true) => {
            let (da, db) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
            da.len()
                .cmp(&db.len())
                .then_with(|| da.cmp(db))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn student(grade: &str) -> Student {
        Student::new("X", "Y", grade, "1", "1")
    }

    fn order(grades: &[&str]) -> Vec<String> {
        let students: Vec<Student> = grades.iter().map(|g| student(g)).collect();
        Statistics::compute(&students)
            .grades
            .into_iter()
            .map(|g| g.grade)
            .collect()
    }

    #[test]
    fn test_numeric_before_text() {
        assert_eq!(order(&["K", "10", "3"]), vec!["3", "10", "K"]);
    }

    #[test]
    fn test_text_grades_sort_lexicographically() {
        assert_eq!(order(&["PK", "K", "2", "Adult"]), vec!["2", "Adult", "K", "PK"]);
    }

    #[test]
    fn test_leading_zeros_and_long_numbers() {
        assert_eq!(
            order(&["100000000000000000000000", "07", "7", "12"]),
            vec!["07", "7", "12", "100000000000000000000000"]
        );
    }

    #[test]
    fn test_counts_and_total() {
        let students = vec![student("3"), student("K"), student("3"), student("10")];
        let stats = Statistics::compute(&students);
        assert_eq!(stats.total, 4);
        assert_eq!(
            stats.grades,
            vec![
                GradeCount { grade: "3".into(), count: 2 },
                GradeCount { grade: "10".into(), count: 1 },
                GradeCount { grade: "K".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_roster() {
        let stats = Statistics::compute(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.grades.is_empty());
    }
}
