//! Application configuration loaded from environment variables.
//!
//! Every setting has a default so the app starts with zero configuration.

use std::path::PathBuf;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@quicklinkservices.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `quicklink.db`.
    /// Env: `QUICKLINK_DATA_DIR`
    /// Default: none (the desktop shell uses the platform app data dir).
    pub data_dir: Option<PathBuf>,

    /// Address that signs in as administrator and sends admin mail.
    /// Env: `QUICKLINK_ADMIN_EMAIL`
    pub admin_email: String,

    /// Address recorded on audit entries.
    /// Env: `QUICKLINK_CLIENT_IP`
    pub client_ip: String,

    /// Default look-back window of the audit log view, in days.
    /// Env: `QUICKLINK_AUDIT_WINDOW_DAYS`
    pub audit_window_days: i64,

    /// Products at or below this stock count are reported as low stock.
    /// Env: `QUICKLINK_LOW_STOCK_THRESHOLD`
    pub low_stock_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            client_ip: "192.168.1.100".to_string(),
            audit_window_days: 7,
            low_stock_threshold: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("QUICKLINK_DATA_DIR") {
            if !dir.is_empty() {
                config.data_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(email) = lookup("QUICKLINK_ADMIN_EMAIL") {
            let email = email.trim().to_lowercase();
            if email.contains('@') {
                config.admin_email = email;
            } else {
                tracing::warn!(value = %email, "Invalid QUICKLINK_ADMIN_EMAIL, using default");
            }
        }

        if let Some(ip) = lookup("QUICKLINK_CLIENT_IP") {
            if !ip.is_empty() {
                config.client_ip = ip;
            }
        }

        if let Some(val) = lookup("QUICKLINK_AUDIT_WINDOW_DAYS") {
            match val.parse::<i64>() {
                Ok(days) if days > 0 => config.audit_window_days = days,
                _ => tracing::warn!(value = %val, "Invalid QUICKLINK_AUDIT_WINDOW_DAYS, using default"),
            }
        }

        if let Some(val) = lookup("QUICKLINK_LOW_STOCK_THRESHOLD") {
            match val.parse::<u32>() {
                Ok(n) => config.low_stock_threshold = n,
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid QUICKLINK_LOW_STOCK_THRESHOLD, using default")
                }
            }
        }

        config
    }
}
