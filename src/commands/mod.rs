pub mod audit;
pub mod cart;
pub mod catalog;
pub mod employees;
pub mod messages;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod requests;
pub mod session;
pub mod settings;

use crate::app::QuickLink;
use std::sync::{Mutex, MutexGuard};
use tauri::{AppHandle, Manager};

/// Managed state shared by every command.
pub struct AppState(pub Mutex<QuickLink>);

pub trait QuickLinkExt {
    fn quicklink(&self) -> Result<MutexGuard<'_, QuickLink>, String>;
}

impl QuickLinkExt for AppHandle {
    fn quicklink(&self) -> Result<MutexGuard<'_, QuickLink>, String> {
        self.state::<AppState>()
            .inner()
            .0
            .lock()
            .map_err(|e| e.to_string())
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
