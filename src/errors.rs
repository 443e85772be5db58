use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use std::fmt;

use crate::source::SourceError;

#[derive(Debug)]
pub enum AppError {
    Source(SourceError),
    Template(askama::Error),
    Session(String),
    Csrf(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Source(e) => write!(f, "Data source error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf(e) => write!(f, "CSRF error: {e}"),
        }
    }
}

#[derive(Template)]
#[template(path = "errors/unavailable.html")]
struct UnavailableTemplate<'a> {
    detail: &'a str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Source(_) => StatusCode::BAD_GATEWAY,
            AppError::Csrf(_) => StatusCode::FORBIDDEN,
            AppError::Template(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Source(e) => {
                log::error!("{self}");
                let detail = e.to_string();
                match (UnavailableTemplate { detail: &detail }).render() {
                    Ok(html) => HttpResponse::BadGateway()
                        .content_type("text/html; charset=utf-8")
                        .body(html),
                    Err(_) => HttpResponse::BadGateway().body("Could not load dashboard data"),
                }
            }
            AppError::Csrf(_) => {
                log::warn!("{self}");
                HttpResponse::Forbidden().body("Invalid or missing CSRF token")
            }
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError().body("Internal Server Error")
            }
        }
    }
}

impl From<SourceError> for AppError {
    fn from(e: SourceError) -> Self {
        AppError::Source(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}
