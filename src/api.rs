use std::sync::Arc;

use config::Settings;
use dashboard::Dashboard;
use err::CustomError;
use gemini::{Collaborator, GeminiClient};

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod err;
pub mod filter;
pub mod gemini;
pub mod logging;
pub mod roster;
pub mod search;
pub mod stats;
pub mod store;
pub mod student;

#[cfg(feature = "desktop")]
pub mod commands;

/// Builds a logged-out dashboard seeded with the sample students, plus the
/// Gemini collaborator described by `settings`.
pub fn build_session(
    settings: &Settings,
) -> Result<(Dashboard, Arc<dyn Collaborator>), CustomError> {
    let dashboard = Dashboard::new(
        auth::LoginGate::from_settings(settings),
        store::RecordStore::with_samples(),
    );
    let client = GeminiClient::new(settings.gemini.clone())
        .map_err(|err| CustomError::Config(err.to_string()))?;
    if !client.is_configured() {
        log::warn!("API_KEY is not set, AI search and summary are disabled");
    }
    Ok((dashboard, Arc::new(client)))
}
