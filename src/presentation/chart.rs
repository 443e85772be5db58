use std::collections::BTreeSet;

use serde::Serialize;

use super::table::TableView;
use crate::analytics::{Analysis, Distribution, key_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    StackedBar,
    Pie,
    Donut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// One value per label; `None` is drawn as a gap.
    pub values: Vec<Option<i64>>,
}

/// A chart description handed to the client-side renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// The chart's data as a table, shown when the chart cannot be drawn.
    pub fn data_table(&self) -> TableView {
        let mut columns = vec![self.x_label.clone()];
        columns.extend(self.series.iter().map(|s| s.name.clone()));
        let rows = self
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mut row = vec![label.clone()];
                row.extend(self.series.iter().map(|s| {
                    s.values
                        .get(i)
                        .copied()
                        .flatten()
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                }));
                row
            })
            .collect();
        TableView { columns, rows }
    }
}

fn course_labels<'a, I>(courses: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Option<String>>,
{
    courses
        .into_iter()
        .map(|c| key_label(c.as_deref()).to_string())
        .collect()
}

pub fn applicants_per_course(analysis: &Analysis) -> ChartSpec {
    ChartSpec {
        id: "applicants-per-course".to_string(),
        title: "Applicants per Course".to_string(),
        kind: ChartKind::Bar,
        x_label: "Course".to_string(),
        y_label: "Applicants".to_string(),
        labels: course_labels(analysis.applicants_per_course.iter().map(|c| &c.course)),
        series: vec![Series {
            name: "Applicants".to_string(),
            values: analysis
                .applicants_per_course
                .iter()
                .map(|c| Some(c.count as i64))
                .collect(),
        }],
    }
}

/// One bar group per course, one bar per gender value.
pub fn gender_per_course(analysis: &Analysis) -> ChartSpec {
    let mut courses: Vec<&Option<String>> = Vec::new();
    for row in &analysis.gender_per_course {
        if courses.last() != Some(&&row.course) {
            courses.push(&row.course);
        }
    }

    let present: BTreeSet<&str> = analysis
        .gender_per_course
        .iter()
        .filter_map(|row| row.gender.as_deref())
        .collect();
    let mut genders: Vec<Option<&str>> = present.into_iter().map(Some).collect();
    if analysis.gender_per_course.iter().any(|row| row.gender.is_none()) {
        genders.push(None);
    }

    let series = genders
        .iter()
        .map(|gender| Series {
            name: key_label(*gender).to_string(),
            values: courses
                .iter()
                .map(|course| {
                    let count = analysis
                        .gender_per_course
                        .iter()
                        .find(|row| &row.course == *course && row.gender.as_deref() == *gender)
                        .map(|row| row.count)
                        .unwrap_or(0);
                    Some(count as i64)
                })
                .collect(),
        })
        .collect();

    ChartSpec {
        id: "gender-per-course".to_string(),
        title: "Gender Distribution".to_string(),
        kind: ChartKind::GroupedBar,
        x_label: "Course".to_string(),
        y_label: "Count".to_string(),
        labels: course_labels(courses),
        series,
    }
}

/// Pie, donut or bar chart of a categorical distribution.
pub fn distribution(id: &str, title: &str, kind: ChartKind, dist: &Distribution) -> ChartSpec {
    ChartSpec {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        x_label: dist.field.label().to_string(),
        y_label: "Number of Applicants".to_string(),
        labels: dist
            .buckets
            .iter()
            .map(|b| key_label(b.value.as_deref()).to_string())
            .collect(),
        series: vec![Series {
            name: "Applicants".to_string(),
            values: dist.buckets.iter().map(|b| Some(b.count as i64)).collect(),
        }],
    }
}

/// Registered applicants stacked with the remaining slots per course.
pub fn capacity_vs_registered(analysis: &Analysis) -> ChartSpec {
    ChartSpec {
        id: "capacity-vs-registered".to_string(),
        title: "Course Capacity vs Registered Applicants".to_string(),
        kind: ChartKind::StackedBar,
        x_label: "Course".to_string(),
        y_label: "Number of Students".to_string(),
        labels: course_labels(analysis.capacity.iter().map(|c| &c.course)),
        series: vec![
            Series {
                name: "Registered".to_string(),
                values: analysis
                    .capacity
                    .iter()
                    .map(|c| Some(c.applicants as i64))
                    .collect(),
            },
            Series {
                name: "Remaining slots".to_string(),
                values: analysis.capacity.iter().map(|c| c.remaining_slots).collect(),
            },
        ],
    }
}
