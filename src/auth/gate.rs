use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHashString, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Whether the dashboard may be shown in the current session.
///
/// `Locked` moves to `Unlocked` only on the correct password; `Unlocked` is
/// terminal for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    #[default]
    Locked,
    Unlocked,
}

impl AccessState {
    /// Apply a password attempt.
    pub fn submit(self, gate: &AccessGate, attempt: &str) -> Self {
        match self {
            AccessState::Unlocked => AccessState::Unlocked,
            AccessState::Locked if gate.check(attempt) => AccessState::Unlocked,
            AccessState::Locked => AccessState::Locked,
        }
    }

    pub fn is_unlocked(self) -> bool {
        self == AccessState::Unlocked
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("dashboard password must not be empty")]
    EmptyPassword,

    #[error("could not hash dashboard password: {0}")]
    Hash(password_hash::Error),
}

/// The shared dashboard password, kept only as an argon2 hash parsed once
/// at startup.
#[derive(Clone)]
pub struct AccessGate {
    argon2: Argon2<'static>,
    hash: PasswordHashString,
}

impl AccessGate {
    /// Hash the configured password. An empty password is refused so the
    /// gate can never be opened by an empty submission.
    pub fn new(password: &str) -> Result<Self, GateError> {
        if password.is_empty() {
            return Err(GateError::EmptyPassword);
        }
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(GateError::Hash)?
            .serialize();
        Ok(Self { argon2, hash })
    }

    pub fn check(&self, attempt: &str) -> bool {
        if attempt.is_empty() {
            return false;
        }
        match self
            .argon2
            .verify_password(attempt.as_bytes(), &self.hash.password_hash())
        {
            Ok(()) => true,
            Err(password_hash::Error::Password) => false,
            Err(e) => {
                log::error!("Password verification failed: {e}");
                false
            }
        }
    }
}

impl std::fmt::Debug for AccessGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGate").finish_non_exhaustive()
    }
}
