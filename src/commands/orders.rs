use super::{today, QuickLinkExt};
use crate::export::{export, ExportFile, ExportFormat};
use crate::models::{CheckoutDetails, Order, OrderStatus, PaymentStatus};
use crate::orders::OrderQuery;
use chrono::Utc;
use tauri::AppHandle;

#[tauri::command]
pub fn get_orders(app: AppHandle, query: OrderQuery) -> Result<Vec<Order>, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| ql.admin.orders.filter(&query, Utc::now()))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn checkout(app: AppHandle, details: CheckoutDetails) -> Result<Order, String> {
    let mut ql = app.quicklink()?;
    ql.checkout(details).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_order_status(app: AppHandle, id: String, status: OrderStatus) -> Result<Order, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.orders.advance(&id, status, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn cancel_order(app: AppHandle, id: String) -> Result<Order, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.orders.cancel(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn assign_order(app: AppHandle, id: String, employee_id: String) -> Result<Order, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| {
        let employee = admin.employees.available(&employee_id)?.clone();
        admin.orders.assign(&id, &employee, trail)
    })
    .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_order_payment_status(
    app: AppHandle,
    id: String,
    status: PaymentStatus,
) -> Result<Order, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.orders.set_payment_status(&id, status, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn export_orders(
    app: AppHandle,
    query: OrderQuery,
    format: ExportFormat,
) -> Result<ExportFile, String> {
    let ql = app.quicklink()?;
    let rows = ql
        .admin_view(|ql| ql.admin.orders.filter(&query, Utc::now()))
        .map_err(|e| e.to_string())?;
    export("orders", &rows, format, today()).map_err(|e| e.to_string())
}
