//! Append-only audit trail.
//!
//! Mutations that should be recorded take an [`AuditTrail`]: the signed-in
//! [`Actor`] plus the [`AuditSink`] to append to. [`AuditLogs`] is the
//! persisted sink; newest entries sit at index 0.

use crate::collection::{Collection, Entity, Insert};
use crate::db::DurableStore;
use crate::error::Result;
use crate::export::ExportRow;
use crate::filter::{distinct_values, FilterSpec, Filterable};
use crate::ids;
use crate::models::AuditLog;
use crate::seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const STORAGE_KEY: &str = "audit_logs";

/// Who performed an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    pub email: String,
    pub ip_address: Option<String>,
}

/// What happened, before the actor and timestamp are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, entity_type: &str, entity_id: &str) -> Self {
        Self {
            action: action.into(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            old_data: None,
            new_data: None,
        }
    }

    pub fn created<T: Serialize>(entity_type: &str, entity_id: &str, new: &T) -> Self {
        Self::new(format!("Created {entity_type}"), entity_type, entity_id).with_new(new)
    }

    pub fn updated<T: Serialize>(entity_type: &str, entity_id: &str, old: &T, new: &T) -> Self {
        Self::new(format!("Updated {entity_type}"), entity_type, entity_id)
            .with_old(old)
            .with_new(new)
    }

    pub fn deleted<T: Serialize>(entity_type: &str, entity_id: &str, old: &T) -> Self {
        Self::new(format!("Deleted {entity_type}"), entity_type, entity_id).with_old(old)
    }

    pub fn with_old<T: Serialize>(mut self, old: &T) -> Self {
        self.old_data = serde_json::to_value(old).ok();
        self
    }

    pub fn with_new<T: Serialize>(mut self, new: &T) -> Self {
        self.new_data = serde_json::to_value(new).ok();
        self
    }
}

pub trait AuditSink {
    fn append(&mut self, actor: &Actor, event: AuditEvent) -> Result<AuditLog>;
}

/// Actor plus sink, handed to every recorded mutation.
pub struct AuditTrail<'a> {
    actor: &'a Actor,
    sink: &'a mut dyn AuditSink,
}

impl<'a> AuditTrail<'a> {
    pub fn new(actor: &'a Actor, sink: &'a mut dyn AuditSink) -> Self {
        Self { actor, sink }
    }

    pub fn actor(&self) -> &Actor {
        self.actor
    }

    pub fn record(&mut self, event: AuditEvent) -> Result<AuditLog> {
        self.sink.append(self.actor, event)
    }
}

impl Entity for AuditLog {
    const KIND: &'static str = "Audit Log";
    const INSERT: Insert = Insert::Newest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for AuditLog {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "action" => Some(&self.action),
            "entityType" => Some(&self.entity_type),
            "entityId" => Some(&self.entity_id),
            "userName" => Some(&self.user_name),
            "ipAddress" => self.ip_address.as_deref(),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "timestamp").then_some(self.timestamp)
    }
}

impl ExportRow for AuditLog {
    fn columns() -> &'static [&'static str] {
        &[
            "Timestamp",
            "User",
            "Action",
            "Entity",
            "Entity ID",
            "IP Address",
            "Old Data",
            "New Data",
        ]
    }

    fn values(&self) -> Vec<String> {
        let json = |v: &Option<Value>| v.as_ref().map(Value::to_string).unwrap_or_default();
        vec![
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.user_name.clone(),
            self.action.clone(),
            self.entity_type.clone(),
            self.entity_id.clone(),
            self.ip_address.clone().unwrap_or_default(),
            json(&self.old_data),
            json(&self.new_data),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub entity_type: String,
    /// Look-back window; `None` keeps everything.
    #[serde(default)]
    pub window_days: Option<i64>,
}

impl AuditQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["action", "entityType", "entityId", "userName"], &self.search)
            .exact("action", &self.action)
            .exact("entityType", &self.entity_type)
            .within_days("timestamp", self.window_days)
    }
}

pub struct AuditLogs {
    logs: Collection<AuditLog>,
}

impl AuditLogs {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            logs: Collection::open(store, STORAGE_KEY, seed::audit_logs()),
        }
    }

    pub fn list(&self) -> &[AuditLog] {
        self.logs.list()
    }

    pub fn filter(&self, query: &AuditQuery, now: DateTime<Utc>) -> Vec<AuditLog> {
        self.logs.filter(&query.to_spec(), now)
    }

    pub fn actions(&self) -> Vec<String> {
        distinct_values(self.list(), "action")
    }

    pub fn entity_types(&self) -> Vec<String> {
        distinct_values(self.list(), "entityType")
    }
}

impl AuditSink for AuditLogs {
    fn append(&mut self, actor: &Actor, event: AuditEvent) -> Result<AuditLog> {
        let log = AuditLog {
            id: ids::new_id(),
            user_id: actor.user_id.clone(),
            user_name: actor.user_name.clone(),
            action: event.action,
            entity_type: event.entity_type,
            entity_id: event.entity_id,
            old_data: event.old_data,
            new_data: event.new_data,
            timestamp: Utc::now(),
            ip_address: actor.ip_address.clone(),
        };
        tracing::info!(
            user = %log.user_name,
            action = %log.action,
            entity_id = %log.entity_id,
            "audit"
        );
        self.logs.insert(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::at;
    use serde_json::json;

    fn actor() -> Actor {
        Actor {
            user_id: "u-1".into(),
            user_name: "Admin User".into(),
            email: "admin@quicklinkservices.com".into(),
            ip_address: Some("10.0.0.1".into()),
        }
    }

    fn logs() -> AuditLogs {
        AuditLogs::open(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn append_goes_to_the_front_with_actor_identity() {
        let mut logs = logs();
        let before = logs.list().len();

        let entry = logs
            .append(&actor(), AuditEvent::created("Food Item", "42", &json!({"name": "Ugali"})))
            .unwrap();

        assert_eq!(logs.list().len(), before + 1);
        assert_eq!(logs.list()[0], entry);
        assert_eq!(entry.action, "Created Food Item");
        assert_eq!(entry.user_id, "u-1");
        assert_eq!(entry.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entry.new_data, Some(json!({"name": "Ugali"})));
    }

    #[test]
    fn trail_records_through_the_injected_sink() {
        let mut logs = logs();
        let who = actor();
        {
            let mut trail = AuditTrail::new(&who, &mut logs);
            trail
                .record(AuditEvent::deleted("Message", "m1", &json!({"subject": "hi"})))
                .unwrap();
        }
        assert_eq!(logs.list()[0].action, "Deleted Message");
    }

    #[test]
    fn filter_by_action_entity_and_window() {
        let logs = logs();
        let now = at(2025, 1, 16, 0, 0);

        let all_week = AuditQuery { window_days: Some(7), ..Default::default() };
        assert_eq!(logs.filter(&all_week, now).len(), 3);

        let orders = AuditQuery {
            entity_type: "Order".into(),
            window_days: Some(7),
            ..Default::default()
        };
        let out = logs.filter(&orders, now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entity_id, "ORD-2025-001");

        let searched = AuditQuery { search: "prod-".into(), ..Default::default() };
        assert_eq!(logs.filter(&searched, now)[0].action, "Deleted Product");

        let one_day = AuditQuery { window_days: Some(1), ..Default::default() };
        assert_eq!(logs.filter(&one_day, now).len(), 2);
    }

    #[test]
    fn option_lists_come_from_the_log() {
        let logs = logs();
        assert_eq!(logs.entity_types(), vec!["Employee", "Order", "Product"]);
        assert_eq!(logs.actions().len(), 3);
    }

    #[test]
    fn export_row_serializes_snapshots() {
        let log = &seed::audit_logs()[1];
        let values = log.values();
        assert_eq!(values.len(), AuditLog::columns().len());
        assert_eq!(values[0], "2025-01-15 09:15:00");
        assert_eq!(values[6], r#"{"status":"pending"}"#);
    }
}
