//! Read-only access to the hosted backend tables.
//!
//! The dashboard only ever issues "select all rows" reads against two
//! collections. [`DataSource`] abstracts the backend so the analytics and the
//! HTTP handlers can be exercised against [`MemorySource`] in tests.

mod memory;
mod postgrest;
mod table;

pub use memory::MemorySource;
pub use postgrest::PostgrestSource;
pub use table::{DecodeIssue, Table};

use async_trait::async_trait;

use crate::models::{Application, Course};

pub const COURSES: &str = "courses";
pub const APPLICATIONS: &str = "course_applications";

/// Errors from the data source layer. All of them are fatal for the
/// current render; nothing is retried. Unreadable cells are not errors, see
/// [`DecodeIssue`].
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("backend returned {status} for '{collection}': {body}")]
    Api {
        collection: String,
        status: u16,
        body: String,
    },

    /// The payload was not an array of JSON objects.
    #[error("unexpected payload for '{collection}': {message}")]
    Shape { collection: String, message: String },

    #[error("unknown collection '{0}'")]
    UnknownCollection(String),
}

/// A tabular data source reachable by a "select all" query.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch every row of `collection`, in backend order.
    async fn fetch_all(&self, collection: &str) -> Result<Table, SourceError>;
}

/// Both tables, fetched once per page load and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub courses_table: Table,
    pub applications_table: Table,
    pub courses: Vec<Course>,
    pub applications: Vec<Application>,
    /// Cells of either table that were left empty because they could not
    /// be read.
    pub issues: Vec<DecodeIssue>,
}

impl Snapshot {
    /// Issue the two reads and decode the rows into typed records.
    pub async fn load(source: &dyn DataSource) -> Result<Self, SourceError> {
        let courses_table = source.fetch_all(COURSES).await?;
        let applications_table = source.fetch_all(APPLICATIONS).await?;
        log::debug!(
            "Fetched {} courses and {} applications",
            courses_table.len(),
            applications_table.len()
        );
        Ok(Self::from_tables(courses_table, applications_table))
    }

    pub fn from_tables(courses_table: Table, applications_table: Table) -> Self {
        let (courses, mut issues) = courses_table.decode::<Course>(COURSES);
        let (applications, application_issues) = applications_table.decode::<Application>(APPLICATIONS);
        issues.extend(application_issues);
        Self {
            courses_table,
            applications_table,
            courses,
            applications,
            issues,
        }
    }
}
