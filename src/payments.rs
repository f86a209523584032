use crate::audit::{AuditEvent, AuditTrail};
use crate::collection::{Collection, Draft, Entity, Insert};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::export::ExportRow;
use crate::filter::{FilterSpec, Filterable};
use crate::ids;
use crate::models::{GatewaySettings, NewPayment, Payment, PaymentMethod, PaymentStatus};
use crate::seed;
use crate::slot::PersistedSlot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_payments";
pub const GATEWAY_KEY: &str = "payment_settings";

impl Entity for Payment {
    const KIND: &'static str = "Payment";
    const INSERT: Insert = Insert::Newest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Payment {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "customerName" => Some(&self.customer_name),
            "orderId" => Some(&self.order_id),
            "transactionId" => self.transaction_id.as_deref(),
            "status" => Some(self.status.as_str()),
            "method" => Some(self.method.as_str()),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "createdAt" => Some(self.created_at),
            "verifiedAt" => self.verified_at,
            _ => None,
        }
    }
}

impl ExportRow for Payment {
    fn columns() -> &'static [&'static str] {
        &[
            "Order ID",
            "Customer",
            "Amount",
            "Method",
            "Status",
            "Transaction ID",
            "Date",
        ]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.order_id.clone(),
            self.customer_name.clone(),
            self.amount.to_string(),
            self.method.to_string(),
            self.status.to_string(),
            self.transaction_id.clone().unwrap_or_default(),
            self.created_at.format("%Y-%m-%d").to_string(),
        ]
    }
}

impl Draft<Payment> for NewPayment {
    fn into_entity(self, id: String, now: DateTime<Utc>) -> Payment {
        let transaction_id = match self.method {
            PaymentMethod::Mpesa => Some(ids::transaction_id(now)),
            PaymentMethod::Cash => None,
        };
        Payment {
            id,
            order_id: self.order_id.unwrap_or_else(|| ids::order_number(now)),
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            amount: self.amount,
            method: self.method,
            status: PaymentStatus::Pending,
            transaction_id,
            created_at: now,
            verified_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub method: Option<PaymentMethod>,
}

impl PaymentQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["customerName", "orderId", "transactionId"], &self.search)
            .exact("status", self.status.map(|s| s.as_str()).unwrap_or_default())
            .exact("method", self.method.map(|m| m.as_str()).unwrap_or_default())
    }
}

/// Summary cards over the currently shown payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotals {
    pub total: u64,
    pub paid: u64,
    pub pending: u64,
    pub count: usize,
}

pub fn totals(payments: &[Payment]) -> PaymentTotals {
    payments.iter().fold(PaymentTotals::default(), |mut acc, p| {
        acc.total += p.amount;
        acc.count += 1;
        match p.status {
            PaymentStatus::Paid => acc.paid += p.amount,
            PaymentStatus::Pending => acc.pending += p.amount,
            PaymentStatus::Failed => {}
        }
        acc
    })
}

impl GatewaySettings {
    fn validate(&self) -> Result<()> {
        let short_code = self.business_short_code.trim();
        if short_code.is_empty() || !short_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation("Business short code must be numeric"));
        }
        if self.passkey.trim().is_empty() {
            return Err(Error::validation("Passkey is required"));
        }
        Ok(())
    }

    /// Copy safe to write into the audit log.
    fn redacted(&self) -> GatewaySettings {
        GatewaySettings {
            passkey: "********".to_string(),
            ..self.clone()
        }
    }
}

pub struct PaymentLedger {
    payments: Collection<Payment>,
    gateway: PersistedSlot<GatewaySettings>,
}

impl PaymentLedger {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            payments: Collection::open(store.clone(), STORAGE_KEY, seed::payments()),
            gateway: PersistedSlot::initialize(store, GATEWAY_KEY, GatewaySettings::default()),
        }
    }

    /// M-Pesa credentials used when collecting payments.
    pub fn gateway(&self) -> &GatewaySettings {
        self.gateway.get()
    }

    pub fn update_gateway(
        &mut self,
        settings: GatewaySettings,
        trail: &mut AuditTrail<'_>,
    ) -> Result<GatewaySettings> {
        settings.validate()?;
        let old = self.gateway().redacted();
        self.gateway.set(settings)?;
        let new = self.gateway().redacted();
        trail.record(AuditEvent::updated("Payment Settings", "mpesa", &old, &new))?;
        Ok(self.gateway().clone())
    }

    pub fn list(&self) -> &[Payment] {
        self.payments.list()
    }

    pub fn get(&self, id: &str) -> Option<&Payment> {
        self.payments.get(id)
    }

    pub fn for_order(&self, order_id: &str) -> Vec<Payment> {
        self.list()
            .iter()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect()
    }

    pub fn initiate(&mut self, payment: NewPayment, trail: &mut AuditTrail<'_>) -> Result<Payment> {
        if payment.amount == 0 {
            return Err(Error::validation("Amount must be greater than zero"));
        }
        let created = self.payments.create(payment)?;
        trail.record(AuditEvent::new("Initiated Payment", Payment::KIND, &created.id).with_new(&created))?;
        Ok(created)
    }

    /// Pending → paid, stamping `verified_at`.
    pub fn verify(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Payment> {
        let now = Utc::now();
        self.settle(id, PaymentStatus::Paid, "Verified Payment", trail, |p| {
            p.verified_at = Some(now)
        })
    }

    pub fn fail(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Payment> {
        self.settle(id, PaymentStatus::Failed, "Failed Payment", trail, |_| {})
    }

    pub fn remove(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Payment> {
        let removed = self.payments.remove(id)?;
        trail.record(AuditEvent::deleted(Payment::KIND, id, &removed))?;
        Ok(removed)
    }

    pub fn filter(&self, query: &PaymentQuery) -> Vec<Payment> {
        self.payments.filter(&query.to_spec(), Utc::now())
    }

    fn settle<F>(
        &mut self,
        id: &str,
        to: PaymentStatus,
        action: &str,
        trail: &mut AuditTrail<'_>,
        stamp: F,
    ) -> Result<Payment>
    where
        F: FnOnce(&mut Payment),
    {
        let mut from = None;
        let updated = self.payments.try_modify(id, |p| {
            if p.status != PaymentStatus::Pending {
                return Err(Error::InvalidTransition {
                    from: p.status.to_string(),
                    to: to.to_string(),
                });
            }
            from = Some(p.status);
            p.status = to;
            stamp(p);
            Ok(())
        })?;
        tracing::info!(id = %id, status = %to, "payment settled");
        trail.record(
            AuditEvent::new(action, Payment::KIND, id)
                .with_old(&serde_json::json!({ "status": from }))
                .with_new(&serde_json::json!({ "status": updated.status })),
        )?;
        Ok(updated)
    }
}
