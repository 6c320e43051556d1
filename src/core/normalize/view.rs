//! Normalized student views
//!
//! Request-scoped, never persisted. Rebuilt from the stores on every read.

use crate::domain::{format_class_label, AttendanceStatus, ClassId, StudentRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// One enrolled class inside a student's view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassEntry {
    pub class_id: ClassId,
    pub subject: String,
    pub grade_level: String,
    pub section: String,
    pub schedule: String,
    pub room: String,
    pub enrollment_status: Option<String>,
    /// Attendance for the queried period; `None` when no mark was found
    pub attendance: Option<AttendanceStatus>,
    pub attendance_notes: Option<String>,
    /// Grade percentage for the queried period
    pub grade: Option<f64>,
}

impl ClassEntry {
    pub fn new(class_id: ClassId) -> Self {
        Self {
            class_id,
            subject: String::new(),
            grade_level: String::new(),
            section: String::new(),
            schedule: String::new(),
            room: String::new(),
            enrollment_status: None,
            attendance: None,
            attendance_notes: None,
            grade: None,
        }
    }

    /// "Mathematics 7-A" style label, falling back to the class id
    pub fn label(&self) -> String {
        let label = format_class_label(&self.subject, &self.grade_level, &self.section);
        if label.is_empty() {
            self.class_id.to_string()
        } else {
            label
        }
    }
}

/// Insertion-ordered map of class id → [`ClassEntry`]
///
/// Serializes as a JSON object in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassMap {
    entries: Vec<ClassEntry>,
    index: HashMap<String, usize>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, class_id: &str) -> Option<&ClassEntry> {
        self.index.get(class_id).map(|&i| &self.entries[i])
    }

    /// Entry for `class_id`, created with `init` on first sight
    ///
    /// Returns the entry and whether it was just created.
    pub fn upsert_with<F>(&mut self, class_id: &ClassId, init: F) -> (&mut ClassEntry, bool)
    where
        F: FnOnce() -> ClassEntry,
    {
        match self.index.get(class_id.as_str()) {
            Some(&i) => (&mut self.entries[i], false),
            None => {
                let i = self.entries.len();
                self.entries.push(init());
                self.index.insert(class_id.as_str().to_string(), i);
                (&mut self.entries[i], true)
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassEntry> {
        self.entries.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ClassId> {
        self.entries.iter().map(|e| &e.class_id)
    }
}

impl Serialize for ClassMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.class_id.as_str(), entry)?;
        }
        map.end()
    }
}

/// One student and the classes found for them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedStudentView {
    pub student: StudentRecord,
    pub display_name: String,
    pub classes: ClassMap,
}

impl NormalizedStudentView {
    pub fn new(student: StudentRecord) -> Self {
        let display_name = student.display_name();
        Self {
            student,
            display_name,
            classes: ClassMap::new(),
        }
    }

    pub fn student_id(&self) -> &str {
        self.student.student_id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class_id(id: &str) -> ClassId {
        ClassId::new(id).unwrap()
    }

    #[test]
    fn test_upsert_creates_once() {
        let mut map = ClassMap::new();
        let (_, created) = map.upsert_with(&class_id("C1"), || ClassEntry::new(class_id("C1")));
        assert!(created);
        let (entry, created) = map.upsert_with(&class_id("C1"), || ClassEntry::new(class_id("C1")));
        assert!(!created);
        entry.attendance = Some(AttendanceStatus::Late);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("C1").unwrap().attendance, Some(AttendanceStatus::Late));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let mut map = ClassMap::new();
        for id in ["C9", "C1", "C5"] {
            map.upsert_with(&class_id(id), || ClassEntry::new(class_id(id)));
        }
        let json = serde_json::to_string(&map).unwrap();
        let c9 = json.find("\"C9\"").unwrap();
        let c1 = json.find("\"C1\"").unwrap();
        let c5 = json.find("\"C5\"").unwrap();
        assert!(c9 < c1 && c1 < c5);
    }
}
