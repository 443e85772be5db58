use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use course_insights::auth::AccessGate;
use course_insights::config::DashboardConfig;
use course_insights::routes;
use course_insights::source::{DataSource, PostgrestSource};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    // Fail closed: without credentials there is nothing to serve
    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };
    log::info!("Loaded configuration: {config:?}");

    let gate = match AccessGate::new(&config.dashboard_password) {
        Ok(gate) => web::Data::new(gate),
        Err(e) => {
            log::error!("Could not initialise access gate: {e}");
            std::process::exit(1);
        }
    };

    let source: Arc<dyn DataSource> =
        Arc::new(PostgrestSource::new(&config.supabase_url, &config.supabase_key));
    let source = web::Data::from(source);

    // Session encryption key: load from SESSION_KEY for sessions that survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let bind_addr = config.bind_addr.clone();
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(gate.clone())
            .app_data(source.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            .configure(routes::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(routes::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
