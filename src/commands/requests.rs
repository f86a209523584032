use super::{today, QuickLinkExt};
use crate::export::{export, ExportFile, ExportFormat};
use crate::models::{NewServiceRequest, RequestStatus, ServiceRequest};
use crate::requests::RequestQuery;
use chrono::Utc;
use tauri::AppHandle;

#[tauri::command]
pub fn get_service_requests(
    app: AppHandle,
    query: RequestQuery,
) -> Result<Vec<ServiceRequest>, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| ql.admin.requests.filter(&query, Utc::now()))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn request_service(app: AppHandle, request: NewServiceRequest) -> Result<ServiceRequest, String> {
    let mut ql = app.quicklink()?;
    ql.request_service(request).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn assign_service_request(
    app: AppHandle,
    id: String,
    employee_id: String,
) -> Result<ServiceRequest, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| {
        let employee = admin.employees.available(&employee_id)?.clone();
        admin.requests.assign(&id, &employee, trail)
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_service_request_status(
    app: AppHandle,
    id: String,
    status: RequestStatus,
) -> Result<ServiceRequest, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.requests.advance(&id, status, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cancel_service_request(app: AppHandle, id: String) -> Result<ServiceRequest, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.requests.cancel(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn export_service_requests(
    app: AppHandle,
    query: RequestQuery,
    format: ExportFormat,
) -> Result<ExportFile, String> {
    let ql = app.quicklink()?;
    let rows = ql
        .admin_view(|ql| ql.admin.requests.filter(&query, Utc::now()))
        .map_err(|e| e.to_string())?;
    export("service-requests", &rows, format, today()).map_err(|e| e.to_string())
}
