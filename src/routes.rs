use actix_web::{HttpResponse, middleware::from_fn, web};

use crate::auth::middleware::require_unlocked;
use crate::handlers::{auth_handlers, dashboard};

/// Register every route. Expects `AccessGate` and `dyn DataSource` app data
/// and a session middleware around the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/healthz", web::get().to(dashboard::health))
        .route("/unlock", web::get().to(auth_handlers::unlock_page))
        .route("/unlock", web::post().to(auth_handlers::unlock_submit))
        .route("/", web::get().to(|| async {
            HttpResponse::SeeOther()
                .insert_header(("Location", "/dashboard"))
                .finish()
        }))
        // Unlocked routes
        .service(
            web::scope("")
                .wrap(from_fn(require_unlocked))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/lock", web::post().to(auth_handlers::lock)),
        );
}

/// Fallback for unknown paths; register last.
pub async fn not_found() -> HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
