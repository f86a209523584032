use super::QuickLinkExt;
use crate::app::QuickLink;
use crate::reports::DashboardSummary;
use tauri::AppHandle;

#[tauri::command]
pub fn get_dashboard(app: AppHandle) -> Result<DashboardSummary, String> {
    let ql = app.quicklink()?;
    ql.admin_view(QuickLink::dashboard).map_err(|e| e.to_string())
}
