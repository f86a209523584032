use crate::audit::{AuditEvent, AuditTrail};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::models::{
    BrandingSettings, CompanySettings, NotificationSettings, PaymentSettings, Settings,
    SystemSettings,
};
use crate::slot::PersistedSlot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_settings";
const ENTITY: &str = "Settings";

/// Replacement of one settings section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", content = "values", rename_all = "camelCase")]
pub enum SettingsUpdate {
    Company(CompanySettings),
    Branding(BrandingSettings),
    Notifications(NotificationSettings),
    Payment(PaymentSettings),
    System(SystemSettings),
}

impl SettingsUpdate {
    pub fn section(&self) -> &'static str {
        match self {
            SettingsUpdate::Company(_) => "company",
            SettingsUpdate::Branding(_) => "branding",
            SettingsUpdate::Notifications(_) => "notifications",
            SettingsUpdate::Payment(_) => "payment",
            SettingsUpdate::System(_) => "system",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            SettingsUpdate::Company(company) if company.name.trim().is_empty() => {
                Err(Error::validation("Company name is required"))
            }
            SettingsUpdate::Payment(payment) if payment.currency.trim().is_empty() => {
                Err(Error::validation("Currency is required"))
            }
            _ => Ok(()),
        }
    }

    fn apply_to(self, settings: &mut Settings) {
        match self {
            SettingsUpdate::Company(company) => settings.company = company,
            SettingsUpdate::Branding(branding) => settings.branding = branding,
            SettingsUpdate::Notifications(n) => settings.notifications = n,
            SettingsUpdate::Payment(payment) => settings.payment = payment,
            SettingsUpdate::System(system) => settings.system = system,
        }
    }
}

pub struct SettingsContainer {
    slot: PersistedSlot<Settings>,
}

impl SettingsContainer {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            slot: PersistedSlot::initialize(store, STORAGE_KEY, Settings::default()),
        }
    }

    pub fn get(&self) -> &Settings {
        self.slot.get()
    }

    pub fn apply(&mut self, update: SettingsUpdate, trail: &mut AuditTrail<'_>) -> Result<Settings> {
        update.validate()?;
        let section = update.section();
        let old = self.get().clone();

        let mut next = old.clone();
        update.apply_to(&mut next);
        self.slot.set(next)?;
        tracing::debug!(section, "settings updated");

        let new = self.get().clone();
        trail.record(
            AuditEvent::new("Updated Settings", ENTITY, section)
                .with_old(&old)
                .with_new(&new),
        )?;
        Ok(new)
    }

    pub fn reset(&mut self, trail: &mut AuditTrail<'_>) -> Result<Settings> {
        let old = self.get().clone();
        self.slot.clear()?;
        let new = self.get().clone();
        tracing::info!("settings reset to defaults");
        trail.record(
            AuditEvent::new("Reset Settings", ENTITY, "all")
                .with_old(&old)
                .with_new(&new),
        )?;
        Ok(new)
    }
}
