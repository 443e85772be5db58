use serde::{Deserialize, Serialize};

use super::lenient;

/// A row of the `courses` collection. Read-only here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Join key for applications (`course_name`).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool")]
    pub featured: Option<bool>,
    /// Seat capacity.
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub students_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub training_date: Option<String>,
}

impl Course {
    pub fn new(title: &str, students_count: Option<i64>) -> Self {
        Self {
            title: Some(title.to_string()),
            students_count,
            ..Default::default()
        }
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_full_row() {
        let course: Course = serde_json::from_value(json!({
            "id": 4,
            "title": "Intro to Python",
            "description": "Basics",
            "featured": true,
            "students_count": 25,
            "duration": "6 weeks",
            "training_date": "2025-03-01"
        }))
        .expect("decode");
        assert_eq!(course.title.as_deref(), Some("Intro to Python"));
        assert_eq!(course.students_count, Some(25));
        assert!(course.is_featured());
    }

    #[test]
    fn test_capacity_accepts_numeric_string_and_null() {
        let course: Course =
            serde_json::from_value(json!({"title": "A", "students_count": "30"})).expect("decode");
        assert_eq!(course.students_count, Some(30));

        let course: Course =
            serde_json::from_value(json!({"title": "A", "students_count": null})).expect("decode");
        assert_eq!(course.students_count, None);
    }

    #[test]
    fn test_numeric_duration_is_stringified() {
        let course: Course =
            serde_json::from_value(json!({"title": "A", "duration": 12})).expect("decode");
        assert_eq!(course.duration.as_deref(), Some("12"));
    }

    #[test]
    fn test_non_numeric_capacity_is_rejected() {
        let result: Result<Course, _> =
            serde_json::from_value(json!({"title": "A", "students_count": "lots"}));
        assert!(result.is_err());
    }
}
