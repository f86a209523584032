use super::QuickLinkExt;
use crate::models::CartItem;
use serde::Serialize;
use tauri::AppHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_amount: u64,
}

fn view(app: &AppHandle) -> Result<CartView, String> {
    let ql = app.quicklink()?;
    Ok(CartView {
        items: ql.cart.lines().to_vec(),
        total_items: ql.cart.total_items(),
        total_amount: ql.cart.total_amount(),
    })
}

#[tauri::command]
pub fn get_cart(app: AppHandle) -> Result<CartView, String> {
    view(&app)
}

#[tauri::command]
pub fn add_to_cart(app: AppHandle, item: CartItem) -> Result<CartView, String> {
    app.quicklink()?.cart.add(item).map_err(|e| e.to_string())?;
    view(&app)
}

#[tauri::command]
pub fn remove_from_cart(app: AppHandle, id: String) -> Result<CartView, String> {
    app.quicklink()?.cart.remove(&id).map_err(|e| e.to_string())?;
    view(&app)
}

#[tauri::command]
pub fn set_cart_quantity(app: AppHandle, id: String, quantity: i64) -> Result<CartView, String> {
    app.quicklink()?
        .cart
        .set_quantity(&id, quantity)
        .map_err(|e| e.to_string())?;
    view(&app)
}

#[tauri::command]
pub fn clear_cart(app: AppHandle) -> Result<CartView, String> {
    app.quicklink()?.cart.clear().map_err(|e| e.to_string())?;
    view(&app)
}
