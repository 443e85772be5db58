use actix_session::Session;

use super::gate::AccessState;
use crate::errors::AppError;

const UNLOCKED_KEY: &str = "unlocked";
const FLASH_KEY: &str = "flash";

/// Read the access state carried by the session cookie.
pub fn access_state(session: &Session) -> AccessState {
    match session.get::<bool>(UNLOCKED_KEY) {
        Ok(Some(true)) => AccessState::Unlocked,
        Ok(_) => AccessState::Locked,
        Err(e) => {
            log::warn!("Unreadable session state, treating as locked: {e}");
            AccessState::Locked
        }
    }
}

/// Persist `state`. Unlocking renews the session id.
pub fn store_access_state(session: &Session, state: AccessState) -> Result<(), AppError> {
    match state {
        AccessState::Unlocked => {
            session.renew();
            session
                .insert(UNLOCKED_KEY, true)
                .map_err(|e| AppError::Session(format!("Failed to store access state: {e}")))
        }
        AccessState::Locked => {
            session.remove(UNLOCKED_KEY);
            Ok(())
        }
    }
}

pub fn set_flash(session: &Session, message: &str) {
    if let Err(e) = session.insert(FLASH_KEY, message) {
        log::warn!("Could not store flash message: {e}");
    }
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}
