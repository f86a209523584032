use super::QuickLinkExt;
use crate::employees::EmployeeQuery;
use crate::models::{Employee, EmployeePatch, NewEmployee};
use tauri::AppHandle;

#[tauri::command]
pub fn get_employees(app: AppHandle, query: EmployeeQuery) -> Result<Vec<Employee>, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| ql.admin.employees.filter(&query))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_employee(app: AppHandle, employee: NewEmployee) -> Result<Employee, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.employees.create(employee, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_employee(app: AppHandle, id: String, patch: EmployeePatch) -> Result<Employee, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.employees.update(&id, patch, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn toggle_employee(app: AppHandle, id: String) -> Result<Employee, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.employees.toggle_active(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_employee(app: AppHandle, id: String) -> Result<(), String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.employees.remove(&id, trail))
        .map(|_| ())
        .map_err(|e| e.to_string())
}
