//! Query catalog
//!
//! Every statement the reporting engine runs, one constructor per query.
//! Each statement touches exactly one store; cross-store joins happen in
//! [`crate::core::normalize::left_join`]. Numeric columns are cast to
//! `float8` so the driver can map them without a decimal type.

use crate::adapters::source::{Query, QueryParam};
use crate::domain::{ClassId, StudentId, Store, TeacherId};
use chrono::NaiveDate;

pub const TEACHER_ACCOUNT: &str = "teacher_account";
pub const STUDENTS_BY_IDS: &str = "students_by_ids";
pub const TEACHER_CLASSES: &str = "teacher_classes";
pub const CLASS_ROSTER: &str = "class_roster";
pub const ROSTER_WITH_MARKS: &str = "roster_with_marks";
pub const ATTENDANCE_RANGE: &str = "attendance_range";
pub const DAY_STATUSES: &str = "day_statuses";
pub const GRADES_RANGE: &str = "grades_range";
pub const ASSIGNMENT_SUBMISSIONS: &str = "assignment_submissions";

fn class_param(class_id: Option<&ClassId>) -> QueryParam {
    QueryParam::OptText(class_id.map(|c| c.as_str().to_string()))
}

/// Login account for a teacher id
pub fn teacher_account(teacher_id: &TeacherId) -> Query {
    Query::new(
        TEACHER_ACCOUNT,
        Store::Login,
        "SELECT user_id::text AS user_id, username, role, status \
         FROM users WHERE user_id::text = $1",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
}

/// Registrar identity rows for the given students, ordered by name
pub fn students_by_ids(ids: &[StudentId]) -> Query {
    Query::new(
        STUDENTS_BY_IDS,
        Store::Registrar,
        "SELECT * FROM students \
         WHERE student_id::text = ANY($1::text[]) \
         ORDER BY last_name, first_name, student_id",
    )
    .bind(QueryParam::TextList(
        ids.iter().map(|id| id.as_str().to_string()).collect(),
    ))
}

/// Classes owned by a teacher, optionally a single one
pub fn teacher_classes(teacher_id: &TeacherId, class_id: Option<&ClassId>) -> Query {
    Query::new(
        TEACHER_CLASSES,
        Store::Teacher,
        "SELECT class_id::text AS class_id, subject, grade_level, section, schedule, room, \
                teacher_id::text AS teacher_id \
         FROM classes \
         WHERE teacher_id::text = $1 AND ($2::text IS NULL OR class_id::text = $2) \
         ORDER BY subject, grade_level, section, class_id",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
}

/// Enrollments in a teacher's classes, with class metadata
pub fn class_roster(teacher_id: &TeacherId, class_id: Option<&ClassId>) -> Query {
    Query::new(
        CLASS_ROSTER,
        Store::Teacher,
        "SELECT e.student_id::text AS student_id, c.class_id::text AS class_id, c.subject, \
                c.grade_level AS class_grade_level, c.section AS class_section, \
                c.schedule, c.room, e.status AS enrollment_status \
         FROM enrollments e \
         JOIN classes c ON c.class_id = e.class_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR c.class_id::text = $2) \
           AND e.status = 'active' \
         ORDER BY c.subject, c.section, e.student_id",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
}

/// Roster left-joined to the marks and grade averages for one date
///
/// A student enrolled in a class yields one row per matching mark, or one
/// row with null mark columns when none was recorded.
pub fn roster_with_marks(
    teacher_id: &TeacherId,
    class_id: Option<&ClassId>,
    date: NaiveDate,
) -> Query {
    Query::new(
        ROSTER_WITH_MARKS,
        Store::Teacher,
        "SELECT e.student_id::text AS student_id, c.class_id::text AS class_id, c.subject, \
                c.grade_level AS class_grade_level, c.section AS class_section, \
                c.schedule, c.room, e.status AS enrollment_status, \
                a.status AS attendance_status, a.notes AS attendance_notes, \
                g.grade_percentage \
         FROM enrollments e \
         JOIN classes c ON c.class_id = e.class_id \
         LEFT JOIN attendance a ON a.student_id = e.student_id AND a.class_id = e.class_id \
              AND a.attendance_date = $3 \
         LEFT JOIN ( \
              SELECT student_id, class_id, \
                     (AVG(score::float8 / NULLIF(max_score::float8, 0)) * 100)::float8 AS grade_percentage \
              FROM grades GROUP BY student_id, class_id \
         ) g ON g.student_id = e.student_id AND g.class_id = e.class_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR c.class_id::text = $2) \
           AND e.status = 'active' \
         ORDER BY e.student_id, c.subject, c.section",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
    .bind(QueryParam::Date(date))
}

/// Attendance marks in a date range for a teacher's classes
pub fn attendance_range(
    teacher_id: &TeacherId,
    class_id: Option<&ClassId>,
    start: NaiveDate,
    end: NaiveDate,
) -> Query {
    Query::new(
        ATTENDANCE_RANGE,
        Store::Teacher,
        "SELECT a.student_id::text AS student_id, a.class_id::text AS class_id, \
                a.attendance_date, a.status, a.notes, \
                a.recorded_by::text AS recorded_by, a.recorded_at \
         FROM attendance a \
         JOIN classes c ON c.class_id = a.class_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR a.class_id::text = $2) \
           AND a.attendance_date BETWEEN $3 AND $4 \
         ORDER BY a.attendance_date, c.subject, c.section, a.student_id",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
    .bind(QueryParam::Date(start))
    .bind(QueryParam::Date(end))
}

/// Mark statuses recorded on one day, scoped to a teacher and optional subject
pub fn day_statuses(teacher_id: &TeacherId, subject: Option<&str>, date: NaiveDate) -> Query {
    Query::new(
        DAY_STATUSES,
        Store::Teacher,
        "SELECT a.status \
         FROM attendance a \
         JOIN classes c ON c.class_id = a.class_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR c.subject = $2) \
           AND a.attendance_date = $3",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(QueryParam::OptText(subject.map(str::to_string)))
    .bind(QueryParam::Date(date))
}

/// Grade entries recorded in a date range for a teacher's classes
pub fn grades_range(
    teacher_id: &TeacherId,
    class_id: Option<&ClassId>,
    start: NaiveDate,
    end: NaiveDate,
) -> Query {
    Query::new(
        GRADES_RANGE,
        Store::Teacher,
        "SELECT g.student_id::text AS student_id, g.class_id::text AS class_id, \
                g.assessment, g.grading_period, g.score::float8 AS score, \
                g.max_score::float8 AS max_score, g.notes, g.recorded_by::text AS recorded_by \
         FROM grades g \
         JOIN classes c ON c.class_id = g.class_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR g.class_id::text = $2) \
           AND g.recorded_on BETWEEN $3 AND $4 \
         ORDER BY c.subject, c.section, g.student_id, g.grading_period, g.assessment",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
    .bind(QueryParam::Date(start))
    .bind(QueryParam::Date(end))
}

/// Assignments due in a date range, left-joined to their submissions
pub fn assignment_submissions(
    teacher_id: &TeacherId,
    class_id: Option<&ClassId>,
    start: NaiveDate,
    end: NaiveDate,
) -> Query {
    Query::new(
        ASSIGNMENT_SUBMISSIONS,
        Store::Teacher,
        "SELECT a.assignment_id::text AS assignment_id, a.title, a.class_id::text AS class_id, \
                a.due_date, s.student_id::text AS student_id, s.status, s.submitted_at, \
                s.score::float8 AS score \
         FROM assignments a \
         JOIN classes c ON c.class_id = a.class_id \
         LEFT JOIN submissions s ON s.assignment_id = a.assignment_id \
         WHERE c.teacher_id::text = $1 AND ($2::text IS NULL OR a.class_id::text = $2) \
           AND a.due_date BETWEEN $3 AND $4 \
         ORDER BY a.due_date, a.assignment_id, s.student_id",
    )
    .bind(QueryParam::Text(teacher_id.as_str().to_string()))
    .bind(class_param(class_id))
    .bind(QueryParam::Date(start))
    .bind(QueryParam::Date(end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_target_the_owning_store() {
        let teacher = TeacherId::new("T1").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();

        assert_eq!(teacher_account(&teacher).store, Store::Login);
        assert_eq!(students_by_ids(&[]).store, Store::Registrar);
        assert_eq!(roster_with_marks(&teacher, None, day).store, Store::Teacher);
        assert_eq!(
            attendance_range(&teacher, None, day, day).store,
            Store::Teacher
        );
    }

    #[test]
    fn test_grade_average_divides_as_float() {
        let teacher = TeacherId::new("T1").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let sql = roster_with_marks(&teacher, None, day).sql;
        // Integer columns would truncate each ratio to 0 or 1
        assert!(sql.contains("AVG(score::float8 / NULLIF(max_score::float8, 0))"));
    }

    #[test]
    fn test_class_filter_binds_null_for_all() {
        let teacher = TeacherId::new("T1").unwrap();
        let all = teacher_classes(&teacher, None);
        assert_eq!(all.params[1], QueryParam::OptText(None));

        let class = ClassId::new("C7").unwrap();
        let one = teacher_classes(&teacher, Some(&class));
        assert_eq!(one.params[1], QueryParam::OptText(Some("C7".to_string())));
    }

    #[test]
    fn test_placeholders_match_bound_params() {
        let teacher = TeacherId::new("T1").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let queries = [
            teacher_account(&teacher),
            students_by_ids(&[StudentId::new("S1").unwrap()]),
            teacher_classes(&teacher, None),
            class_roster(&teacher, None),
            roster_with_marks(&teacher, None, day),
            attendance_range(&teacher, None, day, day),
            day_statuses(&teacher, Some("Math"), day),
            grades_range(&teacher, None, day, day),
            assignment_submissions(&teacher, None, day, day),
        ];
        for query in queries {
            let highest = (1..=9)
                .rev()
                .find(|n| query.sql.contains(&format!("${n}")))
                .unwrap_or(0);
            assert_eq!(highest, query.params.len(), "query {}", query.name);
        }
    }
}
