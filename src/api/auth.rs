use log::{info, warn};

use super::{config::Settings, err::CustomError};

const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin";
const DEFAULT_HINT: &str = " (Gunakan: admin/admin)";

/// The single administrator account of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGate {
    username: String,
    password: String,
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

impl LoginGate {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.admin_username, &settings.admin_password)
    }

    /// The default account is only advertised while it is the one in use.
    fn hint(&self) -> &'static str {
        if self.username == DEFAULT_USERNAME && self.password == DEFAULT_PASSWORD {
            DEFAULT_HINT
        } else {
            ""
        }
    }

    pub fn check(&self, username: &str, password: &str) -> Result<(), CustomError> {
        if username == self.username && password == self.password {
            info!("administrator {username} logged in");
            Ok(())
        } else {
            warn!("rejected login for {username:?}");
            Err(CustomError::InvalidCredentials { hint: self.hint() })
        }
    }
}
