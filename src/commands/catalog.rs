use super::QuickLinkExt;
use crate::app::QuickLink;
use crate::catalog::{CatalogCounts, CatalogQuery};
use crate::models::{
    CatalogPatch, FoodDetails, FoodItem, NewFoodItem, NewProduct, Product, ProductDetails,
};
use serde::Serialize;
use tauri::AppHandle;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogView<T> {
    pub items: Vec<T>,
    pub categories: Vec<String>,
    pub counts: CatalogCounts,
}

// Food

#[tauri::command]
pub fn get_food_items(app: AppHandle, query: CatalogQuery) -> Result<CatalogView<FoodItem>, String> {
    let ql = app.quicklink()?;
    let food = &ql.admin.food;
    Ok(CatalogView {
        items: food.filter(&query),
        categories: food.categories(),
        counts: food.counts(&query),
    })
}

#[tauri::command]
pub fn create_food_item(app: AppHandle, item: NewFoodItem) -> Result<FoodItem, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.food.create(item, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_food_item(
    app: AppHandle,
    id: String,
    patch: CatalogPatch<FoodDetails>,
) -> Result<FoodItem, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.food.update(&id, patch, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn toggle_food_item(app: AppHandle, id: String) -> Result<FoodItem, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.food.toggle_availability(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_food_item(app: AppHandle, id: String) -> Result<(), String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.food.remove(&id, trail))
        .map(|_| ())
        .map_err(|e| e.to_string())
}

// Products

#[tauri::command]
pub fn get_products(app: AppHandle, query: CatalogQuery) -> Result<CatalogView<Product>, String> {
    let ql = app.quicklink()?;
    let products = &ql.admin.products;
    Ok(CatalogView {
        items: products.filter(&query),
        categories: products.categories(),
        counts: products.counts(&query),
    })
}

#[tauri::command]
pub fn create_product(app: AppHandle, product: NewProduct) -> Result<Product, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.products.create(product, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_product(
    app: AppHandle,
    id: String,
    patch: CatalogPatch<ProductDetails>,
) -> Result<Product, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.products.update(&id, patch, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn toggle_product(app: AppHandle, id: String) -> Result<Product, String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.products.toggle_availability(&id, trail))
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_product(app: AppHandle, id: String) -> Result<(), String> {
    let mut ql = app.quicklink()?;
    ql.as_admin(|admin, trail| admin.products.remove(&id, trail))
        .map(|_| ())
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_low_stock(app: AppHandle) -> Result<Vec<Product>, String> {
    let ql = app.quicklink()?;
    ql.admin_view(QuickLink::low_stock).map_err(|e| e.to_string())
}
