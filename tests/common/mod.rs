//! Shared test infrastructure.
//!
//! - `scenario_source()` - the two-application catalog used across tests
//! - `snapshot_of()` - build a snapshot straight from JSON rows
//! - `count_of()` - bucket size lookup on a distribution
//! - `app_data()` / `session_middleware()` - pieces for an in-process app

#![allow(dead_code)]

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{cookie::Key, web};
use serde_json::{Value, json};

use course_insights::analytics::Distribution;
use course_insights::auth::AccessGate;
use course_insights::source::{APPLICATIONS, COURSES, DataSource, MemorySource, Snapshot, Table};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const DASHBOARD_PASS: &str = "open-sesame";

// ============================================================================
// FIXTURES
// ============================================================================

pub fn scenario_courses() -> Vec<Value> {
    vec![json!({
        "title": "A",
        "description": "Intro course",
        "featured": true,
        "students_count": 10,
        "duration": "4 weeks",
        "training_date": "2025-06-01"
    })]
}

pub fn scenario_applications() -> Vec<Value> {
    vec![
        json!({
            "email": "x@x",
            "course_name": "A",
            "gender": "F",
            "education_level": "Bachelor",
            "python_experience_level": "Beginner",
            "participation_preference": "Online",
            "how_did_you_know_dataplus": "LinkedIn",
            "created_at": "2025-05-01T09:00:00+00:00"
        }),
        json!({
            "email": "y@y",
            "course_name": "A",
            "gender": "M",
            "education_level": "Master",
            "python_experience_level": null,
            "participation_preference": "Hybrid",
            "how_did_you_know_dataplus": null,
            "created_at": "2025-05-03T18:30:00+00:00"
        }),
    ]
}

pub fn scenario_source() -> MemorySource {
    MemorySource::new()
        .with_rows(COURSES, scenario_courses())
        .with_rows(APPLICATIONS, scenario_applications())
}

pub fn snapshot_of(courses: Vec<Value>, applications: Vec<Value>) -> Snapshot {
    Snapshot::from_tables(
        Table::from_json(COURSES, Value::Array(courses)).expect("courses table"),
        Table::from_json(APPLICATIONS, Value::Array(applications)).expect("applications table"),
    )
}

/// Size of the bucket holding `value` (`None` is the missing bucket).
pub fn count_of(dist: &Distribution, value: Option<&str>) -> usize {
    dist.buckets
        .iter()
        .find(|b| b.value.as_deref() == value)
        .map(|b| b.count)
        .unwrap_or(0)
}

// ============================================================================
// APP SETUP
// ============================================================================

pub fn app_data(source: MemorySource) -> (web::Data<AccessGate>, web::Data<dyn DataSource>) {
    let gate = AccessGate::new(DASHBOARD_PASS).expect("Failed to build gate");
    let source: Arc<dyn DataSource> = Arc::new(source);
    (web::Data::new(gate), web::Data::from(source))
}

pub fn session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_secure(false)
        .build()
}
