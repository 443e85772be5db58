//! Maps aggregate views onto display shapes: metrics, tables, charts and
//! notices. No computation beyond choosing the shape happens here.

pub mod chart;
pub mod table;

pub use chart::{ChartKind, ChartSpec, Series};
pub use table::TableView;

use crate::analytics::{Analysis, CategoryField, key_label};
use crate::source::{APPLICATIONS, COURSES, Snapshot};

/// Columns of the courses overview tab.
pub const COURSE_COLUMNS: [&str; 6] = [
    "title",
    "description",
    "featured",
    "students_count",
    "duration",
    "training_date",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
}

/// A visible message replacing content that could not be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, message: message.into() }
    }

    pub fn css_class(&self) -> &'static str {
        match self.level {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Warning => "notice-warning",
        }
    }
}

/// A chart together with its data table fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPanel {
    pub spec: ChartSpec,
    pub table: TableView,
}

impl From<ChartSpec> for ChartPanel {
    fn from(spec: ChartSpec) -> Self {
        let table = spec.data_table();
        Self { spec, table }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSection {
    pub caption: String,
    pub table: TableView,
}

/// One of the tabbed detail views below the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub sections: Vec<TableSection>,
}

impl Tab {
    fn new(id: &str, title: &str, sections: Vec<(&str, TableView)>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            sections: sections
                .into_iter()
                .map(|(caption, table)| TableSection {
                    caption: caption.to_string(),
                    table,
                })
                .collect(),
        }
    }
}

/// Everything the dashboard page shows once unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub metrics: Vec<Metric>,
    pub charts: Vec<ChartPanel>,
    pub notices: Vec<Notice>,
    pub tabs: Vec<Tab>,
}

impl DashboardView {
    pub fn build(snapshot: &Snapshot, analysis: &Analysis) -> Self {
        let mut notices = Vec::new();

        let metrics = vec![
            Metric {
                label: "Courses".to_string(),
                value: analysis.summary.total_courses.to_string(),
            },
            Metric {
                label: "Applications".to_string(),
                value: analysis.total_applications.to_string(),
            },
            Metric {
                label: "Unique applicants".to_string(),
                value: analysis.unique_applicants.to_string(),
            },
            Metric {
                label: "Seat utilization".to_string(),
                value: analysis.overall_utilization().to_string(),
            },
        ];

        let mut charts = vec![chart::applicants_per_course(analysis)];
        if analysis.column_present(CategoryField::Gender) {
            charts.push(chart::gender_per_course(analysis));
        }

        let categorical = [
            (
                CategoryField::EducationLevel,
                "education-level",
                "Education Levels of Applicants",
                ChartKind::Pie,
                &analysis.education,
            ),
            (
                CategoryField::ExperienceLevel,
                "python-experience",
                "Python Experience Levels",
                ChartKind::Donut,
                &analysis.experience,
            ),
            (
                CategoryField::ParticipationPreference,
                "participation-preference",
                "Participation Preference",
                ChartKind::Pie,
                &analysis.participation,
            ),
        ];
        for (field, id, title, kind, dist) in categorical {
            if analysis.column_present(field) {
                charts.push(chart::distribution(id, title, kind, dist));
            }
        }

        charts.push(chart::capacity_vs_registered(analysis));

        if let Some(referral) = &analysis.referral {
            charts.push(chart::distribution(
                "referral-source",
                "Where Applicants Heard About DataPlus",
                ChartKind::Bar,
                referral,
            ));
        }

        for field in &analysis.missing_columns {
            notices.push(Notice::warning(format!(
                "Column '{}' not found in {} table.",
                field.column(),
                APPLICATIONS
            )));
        }

        for issue in &snapshot.issues {
            notices.push(Notice::warning(format!(
                "Unreadable value in {issue}; it is treated as empty."
            )));
        }

        let (courses_table, missing) = TableView::select(&snapshot.courses_table, &COURSE_COLUMNS);
        if !missing.is_empty() && !snapshot.courses_table.is_empty() {
            notices.push(Notice::warning(format!(
                "Column(s) {} not found in {} table.",
                missing.join(", "),
                COURSES
            )));
        }

        if !analysis.duplicate_titles.is_empty() {
            notices.push(Notice::warning(format!(
                "Course titles are not unique: {}. Applications were matched to the first course with each title.",
                analysis.duplicate_titles.join(", ")
            )));
        }

        if analysis.summary.unmatched_applications > 0 {
            notices.push(Notice::info(format!(
                "{} application(s) name a course that is not in the catalog; they have no capacity.",
                analysis.summary.unmatched_applications
            )));
        }

        let tabs = vec![
            Tab::new("courses", "Courses", vec![("Courses Overview", courses_table)]),
            Tab::new(
                "applications",
                "Applications",
                vec![(
                    "Applications Preview",
                    TableView::from_table(&snapshot.applications_table),
                )],
            ),
            Tab::new(
                "summary",
                "Summary Statistics",
                vec![
                    ("Overview", summary_table(analysis)),
                    ("Per course", course_stats_table(analysis)),
                ],
            ),
        ];

        Self {
            metrics,
            charts: charts.into_iter().map(ChartPanel::from).collect(),
            notices,
            tabs,
        }
    }

    /// Chart specs as JSON, safe to embed in a `<script>` element.
    pub fn charts_json(&self) -> String {
        let specs: Vec<&ChartSpec> = self.charts.iter().map(|c| &c.spec).collect();
        match serde_json::to_string(&specs) {
            Ok(json) => json.replace('<', "\\u003c"),
            Err(e) => {
                log::error!("Failed to serialise chart specs: {e}");
                "[]".to_string()
            }
        }
    }
}

fn summary_table(analysis: &Analysis) -> TableView {
    TableView {
        columns: vec!["Statistic".to_string(), "Value".to_string()],
        rows: analysis
            .summary
            .rows()
            .into_iter()
            .map(|(label, value)| vec![label, value])
            .collect(),
    }
}

fn course_stats_table(analysis: &Analysis) -> TableView {
    let rows = analysis
        .capacity
        .iter()
        .map(|c| {
            let distinct = analysis
                .distinct_applicants_per_course
                .iter()
                .find(|d| d.course == c.course)
                .map(|d| d.count)
                .unwrap_or(0);
            vec![
                key_label(c.course.as_deref()).to_string(),
                c.applicants.to_string(),
                distinct.to_string(),
                c.capacity.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string()),
                c.remaining_slots
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "n/a".to_string()),
                c.utilization.to_string(),
            ]
        })
        .collect();

    TableView {
        columns: [
            "Course",
            "Applications",
            "Distinct applicants",
            "Capacity",
            "Remaining slots",
            "Utilization",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows,
    }
}
