use std::collections::{BTreeSet, HashMap};

use crate::models::{Application, Course};

/// One application augmented with the capacity of the course it names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedRecord<'a> {
    pub application: &'a Application,
    /// `true` when some course carries the application's `course_name` as title.
    pub matched: bool,
    /// Capacity of the matched course; `None` when unmatched or not set.
    pub students_count: Option<i64>,
}

impl<'a> JoinedRecord<'a> {
    pub fn course_name(&self) -> Option<&'a str> {
        self.application.course_name.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Joined<'a> {
    /// Exactly one record per application, in application order.
    pub records: Vec<JoinedRecord<'a>>,
    /// Titles carried by more than one course. The first course wins.
    pub duplicate_titles: Vec<String>,
}

/// Left outer join of applications to courses on `course_name == title`.
///
/// Never drops or duplicates an application. Titles are expected to be
/// unique; when they are not, the first course in backend order is used and
/// the title is listed in [`Joined::duplicate_titles`].
pub fn left_join<'a>(applications: &'a [Application], courses: &[Course]) -> Joined<'a> {
    let mut by_title: HashMap<&str, &Course> = HashMap::with_capacity(courses.len());
    let mut duplicates: BTreeSet<String> = BTreeSet::new();

    for course in courses {
        let Some(title) = course.title.as_deref() else {
            continue;
        };
        if by_title.contains_key(title) {
            duplicates.insert(title.to_string());
        } else {
            by_title.insert(title, course);
        }
    }

    if !duplicates.is_empty() {
        log::warn!("Duplicate course titles, first row used: {:?}", duplicates);
    }

    let records = applications
        .iter()
        .map(|application| {
            let course = application
                .course_name
                .as_deref()
                .and_then(|name| by_title.get(name));
            JoinedRecord {
                application,
                matched: course.is_some(),
                students_count: course.and_then(|c| c.students_count),
            }
        })
        .collect();

    Joined {
        records,
        duplicate_titles: duplicates.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_application_keeps_null_capacity() {
        let courses = vec![Course::new("A", Some(10))];
        let apps = vec![
            Application::new("x@x", "A", "F"),
            Application::new("y@y", "Nope", "M"),
        ];

        let joined = left_join(&apps, &courses);
        assert_eq!(joined.records.len(), 2);
        assert_eq!(joined.records[0].students_count, Some(10));
        assert!(joined.records[0].matched);
        assert_eq!(joined.records[1].students_count, None);
        assert!(!joined.records[1].matched);
    }

    #[test]
    fn test_matched_course_without_capacity_is_still_matched() {
        let courses = vec![Course::new("A", None)];
        let apps = vec![Application::new("x@x", "A", "F")];

        let joined = left_join(&apps, &courses);
        assert!(joined.records[0].matched);
        assert_eq!(joined.records[0].students_count, None);
    }

    #[test]
    fn test_duplicate_titles_pick_first_and_do_not_multiply_rows() {
        let courses = vec![Course::new("A", Some(10)), Course::new("A", Some(99))];
        let apps = vec![Application::new("x@x", "A", "F")];

        let joined = left_join(&apps, &courses);
        assert_eq!(joined.records.len(), 1);
        assert_eq!(joined.records[0].students_count, Some(10));
        assert_eq!(joined.duplicate_titles, vec!["A".to_string()]);
    }

    #[test]
    fn test_application_without_course_name_survives() {
        let courses = vec![Course::new("A", Some(10))];
        let apps = vec![Application {
            email: Some("x@x".to_string()),
            ..Default::default()
        }];

        let joined = left_join(&apps, &courses);
        assert_eq!(joined.records.len(), 1);
        assert_eq!(joined.records[0].course_name(), None);
        assert!(!joined.records[0].matched);
    }
}
