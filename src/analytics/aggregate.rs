use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

use super::join::JoinedRecord;
use crate::models::Application;

/// Label shown for a null/absent group key or category value.
pub const MISSING_LABEL: &str = "(missing)";

/// Display label for an optional key.
pub fn key_label(key: Option<&str>) -> &str {
    key.unwrap_or(MISSING_LABEL)
}

/// Per-course application count. `course == None` collects applications
/// without a course name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCount {
    pub course: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseGenderCount {
    pub course: Option<String>,
    pub gender: Option<String>,
    pub count: usize,
}

/// Seat utilization of a course. Undefined for zero, negative or unknown
/// capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Utilization {
    /// Percentage rounded to one decimal.
    Rate(f64),
    NotApplicable,
}

impl Utilization {
    pub fn compute(applicants: usize, capacity: Option<i64>) -> Self {
        match capacity {
            Some(cap) if cap > 0 => {
                let pct = applicants as f64 / cap as f64 * 100.0;
                // `{:.1}` rounds the exact binary value, ties to even
                Utilization::Rate(format!("{pct:.1}").parse().unwrap_or(pct))
            }
            _ => Utilization::NotApplicable,
        }
    }
}

impl fmt::Display for Utilization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Utilization::Rate(r) => write!(f, "{r:.1}%"),
            Utilization::NotApplicable => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseCapacity {
    pub course: Option<String>,
    pub applicants: usize,
    /// First non-null `students_count` seen for the course.
    pub capacity: Option<i64>,
    /// `capacity - applicants`; negative when over-enrolled, `None` when the
    /// difference does not fit an `i64`.
    pub remaining_slots: Option<i64>,
    pub utilization: Utilization,
}

/// Application fields that are charted as categorical distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CategoryField {
    Gender,
    EducationLevel,
    ExperienceLevel,
    ParticipationPreference,
    ReferralSource,
}

impl CategoryField {
    pub const ALL: [CategoryField; 5] = [
        CategoryField::Gender,
        CategoryField::EducationLevel,
        CategoryField::ExperienceLevel,
        CategoryField::ParticipationPreference,
        CategoryField::ReferralSource,
    ];

    /// Backend column name.
    pub fn column(&self) -> &'static str {
        match self {
            CategoryField::Gender => "gender",
            CategoryField::EducationLevel => "education_level",
            CategoryField::ExperienceLevel => "python_experience_level",
            CategoryField::ParticipationPreference => "participation_preference",
            CategoryField::ReferralSource => "how_did_you_know_dataplus",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Gender => "Gender",
            CategoryField::EducationLevel => "Education level",
            CategoryField::ExperienceLevel => "Python experience level",
            CategoryField::ParticipationPreference => "Participation preference",
            CategoryField::ReferralSource => "Referral source",
        }
    }

    pub fn value<'a>(&self, application: &'a Application) -> Option<&'a str> {
        match self {
            CategoryField::Gender => application.gender.as_deref(),
            CategoryField::EducationLevel => application.education_level.as_deref(),
            CategoryField::ExperienceLevel => application.python_experience_level.as_deref(),
            CategoryField::ParticipationPreference => {
                application.participation_preference.as_deref()
            }
            CategoryField::ReferralSource => application.how_did_you_know_dataplus.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    /// `None` is the explicit missing bucket.
    pub value: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub field: CategoryField,
    /// Ordered by count descending, then value; the missing bucket sorts last
    /// among equal counts.
    pub buckets: Vec<Bucket>,
    pub total: usize,
}

/// Group keys sorted by name with the missing key last.
fn ordered<V>(groups: BTreeMap<Option<String>, V>) -> Vec<(Option<String>, V)> {
    let (mut present, missing): (Vec<_>, Vec<_>) =
        groups.into_iter().partition(|(k, _)| k.is_some());
    present.extend(missing);
    present
}

/// Applications per course, counted by row (not by distinct email).
pub fn applicants_per_course(records: &[JoinedRecord<'_>]) -> Vec<CourseCount> {
    let mut groups: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for record in records {
        *groups.entry(record.course_name().map(str::to_string)).or_default() += 1;
    }
    ordered(groups)
        .into_iter()
        .map(|(course, count)| CourseCount { course, count })
        .collect()
}

/// Distinct emails per course. Null emails are not counted.
pub fn distinct_applicants_per_course(records: &[JoinedRecord<'_>]) -> Vec<CourseCount> {
    let mut groups: BTreeMap<Option<String>, HashSet<&str>> = BTreeMap::new();
    for record in records {
        let emails = groups
            .entry(record.course_name().map(str::to_string))
            .or_default();
        if let Some(email) = record.application.email.as_deref() {
            emails.insert(email);
        }
    }
    ordered(groups)
        .into_iter()
        .map(|(course, emails)| CourseCount {
            course,
            count: emails.len(),
        })
        .collect()
}

/// Counts per (course, gender). A null gender is its own group.
pub fn gender_per_course(records: &[JoinedRecord<'_>]) -> Vec<CourseGenderCount> {
    let mut groups: BTreeMap<Option<String>, BTreeMap<Option<String>, usize>> = BTreeMap::new();
    for record in records {
        let genders = groups
            .entry(record.course_name().map(str::to_string))
            .or_default();
        *genders
            .entry(record.application.gender.clone())
            .or_default() += 1;
    }
    ordered(groups)
        .into_iter()
        .flat_map(|(course, genders)| {
            ordered(genders)
                .into_iter()
                .map(move |(gender, count)| CourseGenderCount {
                    course: course.clone(),
                    gender,
                    count,
                })
        })
        .collect()
}

/// Capacity, remaining slots and utilization per course.
pub fn capacity_per_course(records: &[JoinedRecord<'_>]) -> Vec<CourseCapacity> {
    let mut groups: BTreeMap<Option<String>, (usize, Option<i64>)> = BTreeMap::new();
    for record in records {
        let (applicants, capacity) = groups
            .entry(record.course_name().map(str::to_string))
            .or_default();
        *applicants += 1;
        if capacity.is_none() {
            *capacity = record.students_count;
        }
    }
    ordered(groups)
        .into_iter()
        .map(|(course, (applicants, capacity))| CourseCapacity {
            course,
            applicants,
            capacity,
            remaining_slots: capacity.and_then(|cap| remaining_slots(cap, applicants)),
            utilization: Utilization::compute(applicants, capacity),
        })
        .collect()
}

fn remaining_slots(capacity: i64, applicants: usize) -> Option<i64> {
    i64::try_from(applicants)
        .ok()
        .and_then(|applicants| capacity.checked_sub(applicants))
}

/// Occurrences of each distinct value of `field`, nulls included.
pub fn distribution(records: &[JoinedRecord<'_>], field: CategoryField) -> Distribution {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for record in records {
        *counts.entry(field.value(record.application)).or_default() += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(value, count)| Bucket {
            value: value.map(str::to_string),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.value.is_none().cmp(&b.value.is_none()))
            .then_with(|| a.value.cmp(&b.value))
    });

    Distribution {
        field,
        buckets,
        total: records.len(),
    }
}

/// Distinct non-null emails across all applications.
pub fn unique_applicants(applications: &[Application]) -> usize {
    applications
        .iter()
        .filter_map(|a| a.email.as_deref())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::join::left_join;
    use crate::models::Course;

    #[test]
    fn test_utilization_rounds_to_one_decimal() {
        assert_eq!(Utilization::compute(1, Some(3)), Utilization::Rate(33.3));
        assert_eq!(Utilization::compute(2, Some(3)), Utilization::Rate(66.7));
        assert_eq!(Utilization::compute(12, Some(10)), Utilization::Rate(120.0));
    }

    #[test]
    fn test_utilization_ties_round_to_even() {
        // 1/16 is exactly 6.25%
        assert_eq!(Utilization::compute(1, Some(16)), Utilization::Rate(6.2));
        // 3/16 is exactly 18.75%
        assert_eq!(Utilization::compute(3, Some(16)), Utilization::Rate(18.8));
    }

    #[test]
    fn test_extreme_capacity_does_not_overflow() {
        let courses = vec![Course::new("A", Some(i64::MIN)), Course::new("B", Some(i64::MAX))];
        let apps = vec![Application::new("x@x", "A", "F"), Application::new("y@y", "B", "F")];
        let joined = left_join(&apps, &courses);
        let capacity = capacity_per_course(&joined.records);

        assert_eq!(capacity[0].remaining_slots, None);
        assert_eq!(capacity[0].utilization, Utilization::NotApplicable);
        assert_eq!(capacity[1].remaining_slots, Some(i64::MAX - 1));
        assert!(matches!(capacity[1].utilization, Utilization::Rate(r) if r == 0.0));
    }

    #[test]
    fn test_utilization_undefined_without_positive_capacity() {
        assert_eq!(Utilization::compute(3, Some(0)), Utilization::NotApplicable);
        assert_eq!(Utilization::compute(3, None), Utilization::NotApplicable);
        assert_eq!(Utilization::compute(3, Some(-5)), Utilization::NotApplicable);
        assert_eq!(Utilization::NotApplicable.to_string(), "n/a");
        assert_eq!(Utilization::Rate(20.0).to_string(), "20.0%");
    }

    #[test]
    fn test_capacity_null_or_over_enrolled() {
        let courses = vec![Course::new("A", None), Course::new("B", Some(1))];
        let apps = vec![
            Application::new("x@x", "A", "F"),
            Application::new("y@y", "B", "F"),
            Application::new("z@z", "B", "M"),
        ];
        let joined = left_join(&apps, &courses);
        let capacity = capacity_per_course(&joined.records);

        assert_eq!(capacity.len(), 2);
        assert_eq!(capacity[0].capacity, None);
        assert_eq!(capacity[0].remaining_slots, None);
        assert_eq!(capacity[0].utilization, Utilization::NotApplicable);
        assert_eq!(capacity[1].remaining_slots, Some(-1));
        assert_eq!(capacity[1].utilization, Utilization::Rate(200.0));
    }

    #[test]
    fn test_missing_course_group_sorts_last() {
        let apps = vec![
            Application {
                email: Some("a@a".to_string()),
                ..Default::default()
            },
            Application::new("b@b", "Z", "F"),
        ];
        let joined = left_join(&apps, &[]);
        let counts = applicants_per_course(&joined.records);
        assert_eq!(counts[0].course.as_deref(), Some("Z"));
        assert_eq!(counts[1].course, None);
    }

    #[test]
    fn test_distribution_orders_by_count_then_value() {
        let mut apps = vec![
            Application::new("a@a", "A", "F"),
            Application::new("b@b", "A", "M"),
            Application::new("c@c", "A", "M"),
        ];
        apps[0].education_level = Some("BSc".to_string());
        apps[1].education_level = Some("MSc".to_string());
        let joined = left_join(&apps, &[]);
        let dist = distribution(&joined.records, CategoryField::EducationLevel);

        let values: Vec<Option<&str>> = dist.buckets.iter().map(|b| b.value.as_deref()).collect();
        assert_eq!(values, vec![Some("BSc"), Some("MSc"), None]);
        assert_eq!(dist.total, 3);
        assert_eq!(dist.buckets[2].count, 1);
    }

    #[test]
    fn test_distinct_applicants_per_course_dedupes_email() {
        let apps = vec![
            Application::new("x@x", "A", "F"),
            Application::new("x@x", "A", "F"),
        ];
        let joined = left_join(&apps, &[]);
        assert_eq!(applicants_per_course(&joined.records)[0].count, 2);
        assert_eq!(distinct_applicants_per_course(&joined.records)[0].count, 1);
    }
}
