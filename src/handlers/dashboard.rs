use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::analytics::Analysis;
use crate::auth::csrf;
use crate::errors::{AppError, render};
use crate::presentation::DashboardView;
use crate::source::{DataSource, Snapshot};
use crate::templates_structs::DashboardTemplate;

/// GET /dashboard: fetch, join, aggregate and render in one pass.
pub async fn index(
    source: web::Data<dyn DataSource>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let snapshot = Snapshot::load(source.get_ref()).await?;
    let analysis = Analysis::compute(&snapshot);
    let view = DashboardView::build(&snapshot, &analysis);

    let csrf_token = csrf::get_or_create_token(&session);
    render(DashboardTemplate::new(view, csrf_token))
}

/// GET /healthz
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}
