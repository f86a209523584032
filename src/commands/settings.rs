use super::QuickLinkExt;
use crate::models::Settings;
use crate::settings::SettingsUpdate;
use tauri::AppHandle;

#[tauri::command]
pub fn get_settings(app: AppHandle) -> Result<Settings, String> {
    let ql = app.quicklink()?;
    Ok(ql.admin.settings.get().clone())
}

#[tauri::command]
pub fn update_settings(app: AppHandle, update: SettingsUpdate) -> Result<Settings, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.settings.apply(update, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn reset_settings(app: AppHandle) -> Result<Settings, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.settings.reset(trail))
        .map_err(|e| e.to_string())
}
