use crate::audit::{Actor, AuditLogs};
use crate::db::{DurableStore, MemoryStore};
use std::sync::Arc;

pub fn store() -> Arc<dyn DurableStore> {
    Arc::new(MemoryStore::new())
}

pub fn admin() -> Actor {
    Actor {
        user_id: "admin1".to_string(),
        user_name: "Admin User".to_string(),
        email: "admin@quicklinkservices.com".to_string(),
        ip_address: Some("192.168.1.100".to_string()),
    }
}

pub fn audit_logs() -> AuditLogs {
    AuditLogs::open(store())
}
