use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

/// Fresh entity id. Random v4, so back-to-back creations never collide.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Human-readable order reference, e.g. `ORD-2025-1a2b3c4d`.
pub fn order_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}-{}", now.year(), &suffix[..8])
}

/// Service request reference, e.g. `REQ-2025-1a2b3c4d`.
pub fn request_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("REQ-{}-{}", now.year(), &suffix[..8])
}

/// M-Pesa style transaction reference.
pub fn transaction_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("MP{}{}", now.format("%y%m%d"), suffix[..6].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_under_rapid_creation() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn order_number_shape() {
        let now = "2025-01-15T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let reference = order_number(now);
        assert!(reference.starts_with("ORD-2025-"));
        assert_eq!(reference.len(), "ORD-2025-".len() + 8);
    }

    #[test]
    fn transaction_id_shape() {
        let now = "2025-01-15T10:30:00Z".parse::<DateTime<Utc>>().unwrap();
        let tx = transaction_id(now);
        assert!(tx.starts_with("MP250115"));
        assert_eq!(tx.len(), 14);
    }
}
