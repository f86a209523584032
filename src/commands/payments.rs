use super::{today, QuickLinkExt};
use crate::export::{export, ExportFile, ExportFormat};
use crate::models::{GatewaySettings, NewPayment, Payment};
use crate::payments::{totals, PaymentQuery, PaymentTotals};
use serde::Serialize;
use tauri::AppHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub payments: Vec<Payment>,
    pub totals: PaymentTotals,
}

#[tauri::command]
pub fn get_payments(app: AppHandle, query: PaymentQuery) -> Result<PaymentView, String> {
    let ql = app.quicklink()?;
    let payments = ql
        .admin_view(|ql| ql.admin.payments.filter(&query))
        .map_err(|e| e.to_string())?;
    Ok(PaymentView {
        totals: totals(&payments),
        payments,
    })
}

#[tauri::command]
pub fn initiate_payment(app: AppHandle, payment: NewPayment) -> Result<Payment, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.payments.initiate(payment, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn verify_payment(app: AppHandle, id: String) -> Result<Payment, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.payments.verify(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn fail_payment(app: AppHandle, id: String) -> Result<Payment, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.payments.fail(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn export_payments(
    app: AppHandle,
    query: PaymentQuery,
    format: ExportFormat,
) -> Result<ExportFile, String> {
    let ql = app.quicklink()?;
    let rows = ql
        .admin_view(|ql| ql.admin.payments.filter(&query))
        .map_err(|e| e.to_string())?;
    export("payments", &rows, format, today()).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_payment_gateway(app: AppHandle) -> Result<GatewaySettings, String> {
    let ql = app.quicklink()?;
    ql.admin_view(|ql| ql.admin.payments.gateway().clone())
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_payment_gateway(
    app: AppHandle,
    settings: GatewaySettings,
) -> Result<GatewaySettings, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.payments.update_gateway(settings, trail))
        .map_err(|e| e.to_string())
}
