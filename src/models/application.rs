use serde::{Deserialize, Serialize};

use super::lenient;

/// A row of the `course_applications` collection. Read-only here.
///
/// Every field is optional: the backend does not enforce them and a null
/// must be counted, not dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    /// Course title this application refers to. Not enforced as a foreign key.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub course_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub education_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub python_experience_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub participation_preference: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub how_did_you_know_dataplus: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_at: Option<String>,
}

impl Application {
    pub fn new(email: &str, course_name: &str, gender: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            course_name: Some(course_name.to_string()),
            gender: Some(gender.to_string()),
            ..Default::default()
        }
    }
}
