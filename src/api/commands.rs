//! Tauri commands of the desktop shell.
//!
//! The dashboard lock is never held while the AI service is being awaited.

use std::{path::PathBuf, sync::Arc};

use tauri::AppHandle;
use tauri_plugin_dialog::DialogExt;
use tokio::sync::Mutex;

use super::{
    build_session,
    config::Settings,
    dashboard::{Dashboard, TableView},
    err::CustomError,
    gemini::{extract_or_empty, summary_or_fallback, Collaborator, ExtractedFields},
    roster,
    stats::DashboardStats,
    student::{Student, StudentDraft},
};

pub struct AppState {
    pub dashboard: Mutex<Dashboard>,
    pub collaborator: Arc<dyn Collaborator>,
}

impl AppState {
    pub fn build(settings: &Settings) -> Result<Self, CustomError> {
        let (dashboard, collaborator) = build_session(settings)?;
        Ok(Self {
            dashboard: Mutex::new(dashboard),
            collaborator,
        })
    }
}

type CommandResult<T> = Result<T, String>;

fn to_message(err: CustomError) -> String {
    err.to_string()
}

#[tauri::command]
pub async fn login(
    state: tauri::State<'_, AppState>,
    username: String,
    password: String,
) -> CommandResult<()> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.login(&username, &password).map_err(to_message)
}

#[tauri::command]
pub async fn logout(state: tauri::State<'_, AppState>) -> CommandResult<()> {
    state.dashboard.lock().await.logout();
    Ok(())
}

#[tauri::command]
pub async fn table_view(state: tauri::State<'_, AppState>) -> CommandResult<TableView> {
    state.dashboard.lock().await.table_view().map_err(to_message)
}

#[tauri::command]
pub async fn get_student(state: tauri::State<'_, AppState>, id: String) -> CommandResult<Student> {
    let dashboard = state.dashboard.lock().await;
    dashboard.student(&id).cloned().map_err(to_message)
}

#[tauri::command]
pub fn blank_draft() -> StudentDraft {
    StudentDraft::blank()
}

#[tauri::command]
pub async fn create_student(
    state: tauri::State<'_, AppState>,
    draft: StudentDraft,
) -> CommandResult<Student> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.create_student(draft).map_err(to_message)
}

#[tauri::command]
pub async fn update_student(
    state: tauri::State<'_, AppState>,
    id: String,
    draft: StudentDraft,
) -> CommandResult<Student> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.update_student(&id, draft).map_err(to_message)
}

#[tauri::command]
pub async fn delete_student(state: tauri::State<'_, AppState>, id: String) -> CommandResult<()> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.delete_student(&id).map(|_| ()).map_err(to_message)
}

#[tauri::command]
pub async fn set_query(
    state: tauri::State<'_, AppState>,
    query: String,
) -> CommandResult<TableView> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.set_query(&query).map_err(to_message)?;
    dashboard.table_view().map_err(to_message)
}

#[tauri::command]
pub async fn ai_search(state: tauri::State<'_, AppState>) -> CommandResult<TableView> {
    let ticket = {
        let mut dashboard = state.dashboard.lock().await;
        match dashboard.begin_ai_search().map_err(to_message)? {
            Some(ticket) => ticket,
            None => return dashboard.table_view().map_err(to_message),
        }
    };

    let result = state.collaborator.translate_query(ticket.query()).await;

    let mut dashboard = state.dashboard.lock().await;
    let outcome = dashboard.finish_ai_search(ticket, result);
    log::debug!("ai search finished: {outcome:?}");
    dashboard.table_view().map_err(to_message)
}

#[tauri::command]
pub async fn clear_filter(state: tauri::State<'_, AppState>) -> CommandResult<TableView> {
    let mut dashboard = state.dashboard.lock().await;
    dashboard.clear_filter().map_err(to_message)?;
    dashboard.table_view().map_err(to_message)
}

#[tauri::command]
pub async fn dashboard_stats(state: tauri::State<'_, AppState>) -> CommandResult<DashboardStats> {
    state.dashboard.lock().await.stats().map_err(to_message)
}

/// The AI summary of the current list; asks the service only when stale.
#[tauri::command]
pub async fn dashboard_summary(state: tauri::State<'_, AppState>) -> CommandResult<String> {
    let ticket = {
        let mut dashboard = state.dashboard.lock().await;
        if dashboard.summary_is_fresh() {
            return Ok(dashboard.summary().to_string());
        }
        dashboard.begin_summary().map_err(to_message)?
    };

    let text = summary_or_fallback(state.collaborator.as_ref(), ticket.composition()).await;

    let mut dashboard = state.dashboard.lock().await;
    dashboard.finish_summary(ticket, text);
    Ok(dashboard.summary().to_string())
}

#[tauri::command]
pub async fn extract_document(
    state: tauri::State<'_, AppState>,
    description: String,
) -> CommandResult<ExtractedFields> {
    if !state.dashboard.lock().await.is_logged_in() {
        return Err(to_message(CustomError::NotLoggedIn));
    }
    Ok(extract_or_empty(state.collaborator.as_ref(), &description).await)
}

async fn pick_roster_file(app: AppHandle) -> Option<PathBuf> {
    let picked = tokio::task::spawn_blocking(move || {
        app.dialog()
            .file()
            .add_filter("CSV", &["csv"])
            .blocking_pick_file()
    })
    .await;

    match picked {
        Ok(Some(path)) => Some(PathBuf::from(path.to_string())),
        Ok(None) => None,
        Err(err) => {
            log::error!("file dialog task failed: {err}");
            None
        }
    }
}

/// Lets the user pick a roster csv and adds its students.
#[tauri::command]
pub async fn import_roster(
    state: tauri::State<'_, AppState>,
    app: AppHandle,
) -> CommandResult<usize> {
    let path = match pick_roster_file(app).await {
        Some(path) => path,
        None => return Ok(0),
    };
    let drafts = roster::import_file(&path).map_err(to_message)?;
    let mut dashboard = state.dashboard.lock().await;
    dashboard.import_students(drafts).map_err(to_message)
}

/// Writes the whole list to a csv file chosen by the user.
#[tauri::command]
pub async fn export_roster(
    state: tauri::State<'_, AppState>,
    app: AppHandle,
) -> CommandResult<Option<String>> {
    let picked = tokio::task::spawn_blocking(move || {
        app.dialog()
            .file()
            .add_filter("CSV", &["csv"])
            .set_file_name("mahasiswa.csv")
            .blocking_save_file()
    })
    .await
    .map_err(|err| err.to_string())?;

    let Some(path) = picked else {
        return Ok(None);
    };
    let path = PathBuf::from(path.to_string());

    let dashboard = state.dashboard.lock().await;
    let students = dashboard.students().map_err(to_message)?;
    let file = std::fs::File::create(&path).map_err(|err| to_message(err.into()))?;
    roster::export_csv(students, file).map_err(to_message)?;
    Ok(Some(path.to_string_lossy().to_string()))
}
