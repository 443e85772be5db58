//! Join & aggregation engine.
//!
//! Everything here is a pure function of the fetched snapshot: no I/O, no
//! shared state. [`Analysis::compute`] runs the whole pipeline once per page
//! load.

pub mod aggregate;
pub mod join;
pub mod summary;

pub use aggregate::{
    Bucket, CategoryField, CourseCapacity, CourseCount, CourseGenderCount, Distribution,
    MISSING_LABEL, Utilization, key_label,
};
pub use join::{Joined, JoinedRecord, left_join};
pub use summary::SummaryStats;

use crate::source::{APPLICATIONS, Snapshot};

/// All aggregate views derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub total_applications: usize,
    pub unique_applicants: usize,
    pub applicants_per_course: Vec<CourseCount>,
    pub distinct_applicants_per_course: Vec<CourseCount>,
    pub gender_per_course: Vec<CourseGenderCount>,
    pub capacity: Vec<CourseCapacity>,
    pub education: Distribution,
    pub experience: Distribution,
    pub participation: Distribution,
    /// `None` when the backend does not return the referral column at all.
    pub referral: Option<Distribution>,
    /// Charted application columns absent from a non-empty applications
    /// table.
    pub missing_columns: Vec<CategoryField>,
    pub duplicate_titles: Vec<String>,
    pub summary: SummaryStats,
}

impl Analysis {
    pub fn compute(snapshot: &Snapshot) -> Self {
        let joined = left_join(&snapshot.applications, &snapshot.courses);
        let records = &joined.records;

        let capacity = aggregate::capacity_per_course(records);
        let summary = SummaryStats::compute(
            &snapshot.courses,
            &snapshot.applications,
            records,
            &capacity,
        );

        let missing_columns: Vec<CategoryField> = CategoryField::ALL
            .into_iter()
            .filter(|field| snapshot.applications_table.lacks_column(field.column()))
            .collect();
        for field in &missing_columns {
            log::warn!("Column '{}' missing from {}", field.column(), APPLICATIONS);
        }

        let referral = (!missing_columns.contains(&CategoryField::ReferralSource))
            .then(|| aggregate::distribution(records, CategoryField::ReferralSource));

        Self {
            total_applications: records.len(),
            unique_applicants: aggregate::unique_applicants(&snapshot.applications),
            applicants_per_course: aggregate::applicants_per_course(records),
            distinct_applicants_per_course: aggregate::distinct_applicants_per_course(records),
            gender_per_course: aggregate::gender_per_course(records),
            capacity,
            education: aggregate::distribution(records, CategoryField::EducationLevel),
            experience: aggregate::distribution(records, CategoryField::ExperienceLevel),
            participation: aggregate::distribution(records, CategoryField::ParticipationPreference),
            referral,
            missing_columns,
            duplicate_titles: joined.duplicate_titles.clone(),
            summary,
        }
    }

    /// Whether the backend returned the column behind `field`.
    pub fn column_present(&self, field: CategoryField) -> bool {
        !self.missing_columns.contains(&field)
    }

    /// Applications over known capacity across all courses, if any capacity
    /// is known. Not applicable when the total capacity overflows.
    pub fn overall_utilization(&self) -> Utilization {
        let totals = self
            .capacity
            .iter()
            .filter_map(|c| c.capacity.filter(|cap| *cap > 0).map(|cap| (c.applicants, cap)))
            .try_fold((0usize, 0i64), |(a, c), (applicants, cap)| {
                Some((a + applicants, c.checked_add(cap)?))
            });
        match totals {
            Some((applicants, capacity)) if capacity > 0 => {
                Utilization::compute(applicants, Some(capacity))
            }
            _ => Utilization::NotApplicable,
        }
    }
}
