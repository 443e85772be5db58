use std::collections::HashSet;

use proptest::prelude::*;

use course_insights::analytics::{CategoryField, Utilization, aggregate, left_join};
use course_insights::models::{Application, Course};

fn opt_value(values: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(values).prop_map(str::to_string))
}

fn course_strategy() -> impl Strategy<Value = Course> {
    (
        prop::sample::select(&["A", "B", "C", "D"][..]),
        prop::option::of(prop_oneof![4 => 0i64..50, 1 => any::<i64>()]),
    )
        .prop_map(|(title, students_count)| Course::new(title, students_count))
}

fn application_strategy() -> impl Strategy<Value = Application> {
    (
        opt_value(&["a@x", "b@x", "c@x", "d@x", "e@x"]),
        opt_value(&["A", "B", "C", "Z"]),
        opt_value(&["F", "M", "Other"]),
        opt_value(&["BSc", "MSc", "PhD"]),
        opt_value(&["Beginner", "Intermediate", "Advanced"]),
        opt_value(&["Online", "In-Person", "Hybrid"]),
    )
        .prop_map(|(email, course_name, gender, education, experience, preference)| Application {
            email,
            course_name,
            gender,
            education_level: education,
            python_experience_level: experience,
            participation_preference: preference,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn join_preserves_left_cardinality(
        courses in prop::collection::vec(course_strategy(), 0..8),
        apps in prop::collection::vec(application_strategy(), 0..40),
    ) {
        let joined = left_join(&apps, &courses);
        prop_assert_eq!(joined.records.len(), apps.len());
        for (record, app) in joined.records.iter().zip(&apps) {
            prop_assert!(std::ptr::eq(record.application, app));
            if !record.matched {
                prop_assert_eq!(record.students_count, None);
            }
        }
    }

    #[test]
    fn per_course_counts_sum_to_total(
        courses in prop::collection::vec(course_strategy(), 0..8),
        apps in prop::collection::vec(application_strategy(), 0..40),
    ) {
        let joined = left_join(&apps, &courses);
        let counts = aggregate::applicants_per_course(&joined.records);
        prop_assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), apps.len());

        let genders = aggregate::gender_per_course(&joined.records);
        prop_assert_eq!(genders.iter().map(|g| g.count).sum::<usize>(), apps.len());
    }

    #[test]
    fn distributions_sum_to_total_including_missing(
        apps in prop::collection::vec(application_strategy(), 0..40),
    ) {
        let joined = left_join(&apps, &[]);
        for field in CategoryField::ALL {
            let dist = aggregate::distribution(&joined.records, field);
            prop_assert_eq!(dist.total, apps.len());
            prop_assert_eq!(dist.buckets.iter().map(|b| b.count).sum::<usize>(), apps.len());
        }
    }

    #[test]
    fn remaining_slots_is_exact_difference(
        courses in prop::collection::vec(course_strategy(), 0..8),
        apps in prop::collection::vec(application_strategy(), 0..40),
    ) {
        let joined = left_join(&apps, &courses);
        for row in aggregate::capacity_per_course(&joined.records) {
            match row.capacity {
                Some(cap) => {
                    prop_assert_eq!(row.remaining_slots, cap.checked_sub(row.applicants as i64));
                    match row.utilization {
                        Utilization::Rate(rate) => {
                            prop_assert!(cap > 0);
                            prop_assert!(rate.is_finite());
                        }
                        Utilization::NotApplicable => prop_assert!(cap <= 0),
                    }
                }
                None => {
                    prop_assert_eq!(row.remaining_slots, None);
                    prop_assert_eq!(row.utilization, Utilization::NotApplicable);
                }
            }
        }
    }

    #[test]
    fn unique_applicants_bounded_by_rows(
        emails in prop::collection::vec("[a-e]@x", 0..30),
    ) {
        let apps: Vec<Application> = emails
            .iter()
            .map(|e| Application::new(e, "A", "F"))
            .collect();
        let unique = aggregate::unique_applicants(&apps);
        let distinct: HashSet<&String> = emails.iter().collect();

        prop_assert!(unique <= apps.len());
        prop_assert_eq!(unique == apps.len(), distinct.len() == emails.len());
    }
}
