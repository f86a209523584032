pub mod app;
pub mod audit;
pub mod cart;
pub mod catalog;
pub mod collection;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod db;
pub mod employees;
pub mod error;
pub mod export;
pub mod filter;
pub mod ids;
pub mod logging;
pub mod messages;
pub mod models;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod requests;
mod seed;
pub mod session;
pub mod settings;
pub mod slot;

#[cfg(test)]
mod test_support;

pub use app::QuickLink;
pub use config::AppConfig;
pub use error::{Error, Result};

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use crate::app::{open_store, QuickLink};
    use crate::commands::{
        audit, cart, catalog, employees, messages, orders, payments, reports, requests, session,
        settings, AppState,
    };
    use crate::config::AppConfig;
    use crate::db::{Database, DurableStore, MemoryStore};
    use std::sync::{Arc, Mutex};
    use tauri::{
        menu::{Menu, MenuItem},
        tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
        AppHandle, Manager,
    };

    /// The configured data directory wins; otherwise the platform app data dir.
    fn desktop_store(handle: &AppHandle, config: &AppConfig) -> Arc<dyn DurableStore> {
        if config.data_dir.is_some() {
            return open_store(config);
        }
        match Database::new(handle).and_then(|db| db.initialize().map(|()| db)) {
            Ok(db) => Arc::new(db),
            Err(e) => {
                tracing::warn!(error = %e, "database unavailable, using in-memory store");
                Arc::new(MemoryStore::new())
            }
        }
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        crate::logging::init();

        let result = tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .plugin(tauri_plugin_dialog::init())
            .plugin(tauri_plugin_fs::init())
            .setup(|app| {
                let config = AppConfig::from_env();
                let store = desktop_store(app.handle(), &config);
                let quicklink = QuickLink::open(config, store);
                tracing::info!(state = ?quicklink.session.state(), "app state ready");
                app.manage(AppState(Mutex::new(quicklink)));

                let quit = MenuItem::with_id(app, "quit", "Quit", true, None::<&str>)?;
                let menu = Menu::with_items(app, &[&quit])?;

                let mut tray = TrayIconBuilder::new()
                    .menu(&menu)
                    .show_menu_on_left_click(false)
                    .on_tray_icon_event(|tray, event| {
                        if let TrayIconEvent::Click {
                            button: MouseButton::Left,
                            button_state: MouseButtonState::Up,
                            ..
                        } = event
                        {
                            let app = tray.app_handle();
                            if let Some(window) = app.get_webview_window("main") {
                                if window.is_visible().unwrap_or(false) {
                                    let _ = window.hide();
                                } else {
                                    let _ = window.show();
                                    let _ = window.set_focus();
                                }
                            }
                        }
                    })
                    .on_menu_event(|app, event| {
                        if event.id == "quit" {
                            app.exit(0);
                        }
                    });
                if let Some(icon) = app.default_window_icon() {
                    tray = tray.icon(icon.clone());
                }
                tray.build(app)?;

                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                // Session
                session::get_auth_state,
                session::login,
                session::logout,
                // Catalog
                catalog::get_food_items,
                catalog::create_food_item,
                catalog::update_food_item,
                catalog::toggle_food_item,
                catalog::delete_food_item,
                catalog::get_products,
                catalog::create_product,
                catalog::update_product,
                catalog::toggle_product,
                catalog::delete_product,
                catalog::get_low_stock,
                // Cart
                cart::get_cart,
                cart::add_to_cart,
                cart::remove_from_cart,
                cart::set_cart_quantity,
                cart::clear_cart,
                // Orders
                orders::get_orders,
                orders::checkout,
                orders::update_order_status,
                orders::cancel_order,
                orders::assign_order,
                orders::set_order_payment_status,
                orders::export_orders,
                // Service requests
                requests::get_service_requests,
                requests::request_service,
                requests::assign_service_request,
                requests::update_service_request_status,
                requests::cancel_service_request,
                requests::export_service_requests,
                // Employees
                employees::get_employees,
                employees::create_employee,
                employees::update_employee,
                employees::toggle_employee,
                employees::delete_employee,
                // Payments
                payments::get_payments,
                payments::initiate_payment,
                payments::verify_payment,
                payments::fail_payment,
                payments::export_payments,
                payments::get_payment_gateway,
                payments::update_payment_gateway,
                // Messages
                messages::get_messages,
                messages::send_message,
                messages::reply_to_message,
                messages::mark_message_read,
                messages::delete_message,
                // Audit
                audit::get_audit_logs,
                audit::get_audit_filter_options,
                audit::export_audit_logs,
                // Settings
                settings::get_settings,
                settings::update_settings,
                settings::reset_settings,
                // Reports
                reports::get_dashboard,
            ])
            .run(tauri::generate_context!());

        if let Err(e) = result {
            tracing::error!(error = %e, "error while running tauri application");
            std::process::exit(1);
        }
    }
}
