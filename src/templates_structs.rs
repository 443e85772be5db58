// Template context structures for Askama templates.

use askama::Template;

use crate::presentation::DashboardView;

pub const APP_NAME: &str = "Courses & Applications Analysis";

#[derive(Template)]
#[template(path = "unlock.html")]
pub struct UnlockTemplate {
    pub app_name: String,
    pub error: Option<String>,
    pub flash: Option<String>,
    pub csrf_token: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub view: DashboardView,
    /// Chart specs for the client-side renderer, already script-safe.
    pub charts_json: String,
}

impl DashboardTemplate {
    pub fn new(view: DashboardView, csrf_token: String) -> Self {
        let charts_json = view.charts_json();
        Self {
            app_name: APP_NAME.to_string(),
            csrf_token,
            view,
            charts_json,
        }
    }
}
