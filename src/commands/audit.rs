use super::{today, QuickLinkExt};
use crate::audit::AuditQuery;
use crate::export::{export, ExportFile, ExportFormat};
use crate::models::AuditLog;
use chrono::Utc;
use serde::Serialize;
use tauri::AppHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditFilterOptions {
    pub actions: Vec<String>,
    pub entity_types: Vec<String>,
    pub default_window_days: i64,
}

#[tauri::command]
pub fn get_audit_logs(app: AppHandle, query: AuditQuery) -> Result<Vec<AuditLog>, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| ql.audit_view(&query, Utc::now()))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_audit_filter_options(app: AppHandle) -> Result<AuditFilterOptions, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| AuditFilterOptions {
        actions: ql.audit.actions(),
        entity_types: ql.audit.entity_types(),
        default_window_days: ql.config().audit_window_days,
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn export_audit_logs(
    app: AppHandle,
    query: AuditQuery,
    format: ExportFormat,
) -> Result<ExportFile, String> {
    let ql = app.quicklink()?;
    let rows = ql
        .admin_view(|ql| ql.audit_view(&query, Utc::now()))
        .map_err(|e| e.to_string())?;
    export("audit-logs", &rows, format, today()).map_err(|e| e.to_string())
}
