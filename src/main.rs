// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use siarsip::api::{
    commands,
    config::{self, Settings},
    logging,
};

fn main() {
    let env_file_error = config::load_env_file();
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    if let Err(err) = logging::init_logger(&settings) {
        eprintln!("{err}");
    }
    if let Some(err) = env_file_error {
        log::warn!("ignoring .env: {err}");
    }

    let state = match commands::AppState::build(&settings) {
        Ok(state) => state,
        Err(err) => {
            log::error!("failed to prepare the dashboard: {err}");
            std::process::exit(1);
        }
    };

    let result = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .manage(state)
        .invoke_handler(tauri::generate_handler![
            commands::login,
            commands::logout,
            commands::table_view,
            commands::get_student,
            commands::blank_draft,
            commands::create_student,
            commands::update_student,
            commands::delete_student,
            commands::set_query,
            commands::ai_search,
            commands::clear_filter,
            commands::dashboard_stats,
            commands::dashboard_summary,
            commands::extract_document,
            commands::import_roster,
            commands::export_roster,
        ])
        .run(tauri::generate_context!());

    if let Err(err) = result {
        log::error!("SiArsip stopped: {err}");
        std::process::exit(1);
    }
}
