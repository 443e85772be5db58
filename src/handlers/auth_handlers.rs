use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::session::{access_state, set_flash, store_access_state, take_flash};
use crate::auth::{AccessGate, csrf};
use crate::errors::{AppError, render};
use crate::templates_structs::{APP_NAME, UnlockTemplate};

#[derive(Deserialize)]
pub struct UnlockForm {
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

fn unlock_form(session: &Session, error: Option<String>) -> Result<HttpResponse, AppError> {
    let tmpl = UnlockTemplate {
        app_name: APP_NAME.to_string(),
        error,
        flash: take_flash(session),
        csrf_token: csrf::get_or_create_token(session),
    };
    render(tmpl)
}

/// GET /unlock: password prompt
pub async fn unlock_page(session: Session) -> Result<HttpResponse, AppError> {
    // Already unlocked: skip the prompt
    if access_state(&session).is_unlocked() {
        return Ok(see_other("/dashboard"));
    }
    unlock_form(&session, None)
}

/// POST /unlock: check the shared password
pub async fn unlock_submit(
    session: Session,
    gate: web::Data<AccessGate>,
    form: web::Form<UnlockForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let state = access_state(&session).submit(&gate, &form.password);
    if state.is_unlocked() {
        store_access_state(&session, state)?;
        log::info!("Dashboard unlocked");
        return Ok(see_other("/dashboard"));
    }

    log::warn!("Rejected dashboard password attempt");
    unlock_form(&session, Some("Incorrect password".to_string()))
}

/// POST /lock: end the unlocked session
pub async fn lock(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.clear();
    set_flash(&session, "Dashboard locked.");
    Ok(see_other("/unlock"))
}
