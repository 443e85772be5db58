use chrono::{DateTime, NaiveDateTime};

use super::aggregate::{CourseCapacity, unique_applicants};
use super::join::JoinedRecord;
use crate::models::{Application, Course};

/// Headline numbers for the summary statistics tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStats {
    pub total_courses: usize,
    pub featured_courses: usize,
    /// Sum of known capacities; `None` if it does not fit an `i64`.
    pub total_capacity: Option<i64>,
    pub total_applications: usize,
    pub unique_applicants: usize,
    /// Applications whose course title matches no course.
    pub unmatched_applications: usize,
    pub mean_applications_per_course: Option<f64>,
    pub over_enrolled_courses: usize,
    pub earliest_application: Option<NaiveDateTime>,
    pub latest_application: Option<NaiveDateTime>,
}

impl SummaryStats {
    pub fn compute(
        courses: &[Course],
        applications: &[Application],
        records: &[JoinedRecord<'_>],
        capacity: &[CourseCapacity],
    ) -> Self {
        let timestamps: Vec<NaiveDateTime> = applications
            .iter()
            .filter_map(|a| a.created_at.as_deref())
            .filter_map(parse_timestamp)
            .collect();

        let mean_applications_per_course = if capacity.is_empty() {
            None
        } else {
            Some(records.len() as f64 / capacity.len() as f64)
        };

        Self {
            total_courses: courses.len(),
            featured_courses: courses.iter().filter(|c| c.is_featured()).count(),
            total_capacity: courses
                .iter()
                .filter_map(|c| c.students_count)
                .try_fold(0i64, i64::checked_add),
            total_applications: applications.len(),
            unique_applicants: unique_applicants(applications),
            unmatched_applications: records.iter().filter(|r| !r.matched).count(),
            mean_applications_per_course,
            over_enrolled_courses: capacity
                .iter()
                .filter(|c| c.remaining_slots.is_some_and(|r| r < 0))
                .count(),
            earliest_application: timestamps.iter().min().copied(),
            latest_application: timestamps.iter().max().copied(),
        }
    }

    /// (label, value) pairs in display order.
    pub fn rows(&self) -> Vec<(String, String)> {
        let stamp = |t: Option<NaiveDateTime>| {
            t.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "n/a".to_string())
        };
        vec![
            ("Courses".to_string(), self.total_courses.to_string()),
            ("Featured courses".to_string(), self.featured_courses.to_string()),
            (
                "Total capacity".to_string(),
                self.total_capacity
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            ("Applications".to_string(), self.total_applications.to_string()),
            ("Unique applicants".to_string(), self.unique_applicants.to_string()),
            (
                "Applications without a matching course".to_string(),
                self.unmatched_applications.to_string(),
            ),
            (
                "Mean applications per course".to_string(),
                self.mean_applications_per_course
                    .map(|m| format!("{m:.1}"))
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            ("Over-enrolled courses".to_string(), self.over_enrolled_courses.to_string()),
            ("First application".to_string(), stamp(self.earliest_application)),
            ("Latest application".to_string(), stamp(self.latest_application)),
        ]
    }
}

/// Parse a backend timestamp. Offsets are normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDateTime::parse_from_str("2025-05-23 10:11:12", "%Y-%m-%d %H:%M:%S")
            .expect("fixture");
        assert_eq!(parse_timestamp("2025-05-23T10:11:12+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-05-23T12:11:12+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-05-23T10:11:12"), Some(expected));
        assert_eq!(parse_timestamp("2025-05-23 10:11:12"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
