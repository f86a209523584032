use super::QuickLinkExt;
use crate::models::User;
use crate::session::AuthState;
use tauri::AppHandle;

#[tauri::command]
pub fn get_auth_state(app: AppHandle) -> Result<AuthState, String> {
    let ql = app.quicklink()?;
    Ok(ql.session.state().clone())
}

#[tauri::command]
pub fn login(app: AppHandle, email: String, password: String) -> Result<User, String> {
    let mut ql = app.quicklink()?;
    ql.login(&email, &password).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn logout(app: AppHandle) -> Result<(), String> {
    let mut ql = app.quicklink()?;
    ql.logout().map_err(|e| e.to_string())
}
