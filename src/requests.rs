//! Booked services (taxi, errands, cleaning) and their dispatch lifecycle.

use crate::audit::{AuditEvent, AuditTrail};
use crate::collection::{Collection, Entity, Insert};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::export::ExportRow;
use crate::filter::{FilterSpec, Filterable};
use crate::ids;
use crate::models::{
    Employee, NewServiceRequest, RequestStatus, ServiceRequest, ServiceType, User,
};
use crate::seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_service_requests";

impl RequestStatus {
    fn rank(&self) -> u8 {
        match self {
            RequestStatus::Pending => 0,
            RequestStatus::Assigned => 1,
            RequestStatus::InProgress => 2,
            RequestStatus::Completed => 3,
            RequestStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Forward only; cancellation is possible until the job is completed.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == RequestStatus::Cancelled || next.rank() > self.rank()
    }
}

impl Entity for ServiceRequest {
    const KIND: &'static str = "Service Request";
    const INSERT: Insert = Insert::Newest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for ServiceRequest {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "id" => Some(&self.id),
            "customerName" => Some(&self.customer_name),
            "customerEmail" => Some(&self.customer_email),
            "title" => Some(&self.title),
            "serviceType" => Some(self.service_type.as_str()),
            "status" => Some(self.status.as_str()),
            "assignedTo" => self.assigned_to.as_deref(),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "createdAt" => Some(self.created_at),
            "scheduledDate" => Some(self.scheduled_date),
            "completedAt" => self.completed_at,
            _ => None,
        }
    }
}

impl ExportRow for ServiceRequest {
    fn columns() -> &'static [&'static str] {
        &[
            "Request ID",
            "Customer",
            "Service",
            "Title",
            "Budget",
            "Status",
            "Assigned To",
            "Scheduled",
        ]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_name.clone(),
            self.service_type.to_string(),
            self.title.clone(),
            self.budget.to_string(),
            self.status.to_string(),
            self.assigned_to.clone().unwrap_or_default(),
            self.scheduled_date.format("%Y-%m-%d %H:%M").to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub window_days: Option<i64>,
}

impl RequestQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["id", "customerName", "title"], &self.search)
            .exact("status", self.status.map(|s| s.as_str()).unwrap_or_default())
            .exact(
                "serviceType",
                self.service_type.map(|t| t.as_str()).unwrap_or_default(),
            )
            .within_days("createdAt", self.window_days)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct ServiceBoard {
    requests: Collection<ServiceRequest>,
}

impl ServiceBoard {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            requests: Collection::open(store, STORAGE_KEY, seed::service_requests()),
        }
    }

    pub fn list(&self) -> &[ServiceRequest] {
        self.requests.list()
    }

    pub fn get(&self, id: &str) -> Option<&ServiceRequest> {
        self.requests.get(id)
    }

    /// Book a service for `customer`; it starts out pending and unassigned.
    pub fn submit(
        &mut self,
        customer: &User,
        draft: NewServiceRequest,
        trail: &mut AuditTrail<'_>,
    ) -> Result<ServiceRequest> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("Title is required"));
        }
        if draft.service_type == ServiceType::Taxi
            && (non_blank(draft.pickup_location.clone()).is_none()
                || non_blank(draft.dropoff_location.clone()).is_none())
        {
            return Err(Error::validation("A taxi needs pickup and drop-off locations"));
        }

        let now = Utc::now();
        let request = ServiceRequest {
            id: ids::request_number(now),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_phone: draft
                .phone
                .or_else(|| customer.phone.clone())
                .unwrap_or_default(),
            customer_email: customer.email.clone(),
            service_type: draft.service_type,
            title: draft.title.trim().to_string(),
            description: draft.description,
            pickup_location: non_blank(draft.pickup_location),
            dropoff_location: non_blank(draft.dropoff_location),
            scheduled_date: draft.scheduled_date,
            budget: draft.budget,
            status: RequestStatus::Pending,
            assigned_to: None,
            promo_code: non_blank(draft.promo_code),
            created_at: now,
            updated_at: now,
            completed_at: None,
            notes: non_blank(draft.notes),
        };

        let created = self.requests.insert(request)?;
        tracing::info!(id = %created.id, service = %created.service_type, "service requested");
        trail.record(AuditEvent::created(ServiceRequest::KIND, &created.id, &created))?;
        Ok(created)
    }

    /// Hand the request to `employee`. Reassigning is allowed until work
    /// starts.
    pub fn assign(
        &mut self,
        id: &str,
        employee: &Employee,
        trail: &mut AuditTrail<'_>,
    ) -> Result<ServiceRequest> {
        if !employee.is_active {
            return Err(Error::validation(format!("{} is not active", employee.name)));
        }
        let now = Utc::now();
        let mut previous = None;
        let updated = self.requests.try_modify(id, |request| {
            if !matches!(request.status, RequestStatus::Pending | RequestStatus::Assigned) {
                return Err(Error::InvalidTransition {
                    from: request.status.to_string(),
                    to: RequestStatus::Assigned.to_string(),
                });
            }
            previous = request.assigned_to.take();
            request.assigned_to = Some(employee.id.clone());
            request.status = RequestStatus::Assigned;
            request.updated_at = now;
            Ok(())
        })?;
        trail.record(
            AuditEvent::new("Assigned Service Request", ServiceRequest::KIND, id)
                .with_old(&serde_json::json!({ "assignedTo": previous }))
                .with_new(&serde_json::json!({ "assignedTo": employee.id, "employee": employee.name })),
        )?;
        Ok(updated)
    }

    pub fn advance(
        &mut self,
        id: &str,
        next: RequestStatus,
        trail: &mut AuditTrail<'_>,
    ) -> Result<ServiceRequest> {
        if next == RequestStatus::Assigned {
            return Err(Error::validation("Use assign to pick an employee"));
        }
        let now = Utc::now();
        let mut previous = None;
        let updated = self.requests.try_modify(id, |request| {
            if !request.status.can_transition_to(next) {
                return Err(Error::InvalidTransition {
                    from: request.status.to_string(),
                    to: next.to_string(),
                });
            }
            if matches!(next, RequestStatus::InProgress | RequestStatus::Completed)
                && request.assigned_to.is_none()
            {
                return Err(Error::validation("Assign an employee first"));
            }
            previous = Some(request.status);
            request.status = next;
            request.updated_at = now;
            if next == RequestStatus::Completed {
                request.completed_at = Some(now);
            }
            Ok(())
        })?;
        trail.record(
            AuditEvent::new("Updated Request Status", ServiceRequest::KIND, id)
                .with_old(&serde_json::json!({ "status": previous }))
                .with_new(&serde_json::json!({ "status": next })),
        )?;
        Ok(updated)
    }

    pub fn cancel(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<ServiceRequest> {
        self.advance(id, RequestStatus::Cancelled, trail)
    }

    /// Requests a given employee is on, newest first.
    pub fn for_employee(&self, employee_id: &str) -> Vec<ServiceRequest> {
        self.list()
            .iter()
            .filter(|r| r.assigned_to.as_deref() == Some(employee_id))
            .cloned()
            .collect()
    }

    pub fn filter(&self, query: &RequestQuery, now: DateTime<Utc>) -> Vec<ServiceRequest> {
        self.requests.filter(&query.to_spec(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_support::{admin, audit_logs, store};

    fn customer() -> User {
        User {
            id: "c1".into(),
            email: "jane@example.com".into(),
            name: "Jane".into(),
            role: Role::Customer,
            phone: Some("0700000000".into()),
            created_at: Utc::now(),
            is_active: true,
        }
    }

    fn laundry() -> NewServiceRequest {
        NewServiceRequest {
            service_type: ServiceType::Laundry,
            title: "Weekly laundry".into(),
            description: "Two bags".into(),
            pickup_location: Some("  ".into()),
            dropoff_location: None,
            scheduled_date: Utc::now(),
            budget: 800,
            phone: None,
            promo_code: None,
            notes: None,
        }
    }

    fn driver() -> Employee {
        seed::employees().into_iter().next().unwrap()
    }

    #[test]
    fn submit_prepends_pending_request() {
        let mut board = ServiceBoard::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let request = board.submit(&customer(), laundry(), &mut trail).unwrap();
        assert_eq!(board.list()[0], request);
        assert_eq!(board.list().len(), 3);
        assert!(request.id.starts_with("REQ-"));
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.customer_phone, "0700000000");
        assert_eq!(request.pickup_location, None);
    }

    #[test]
    fn taxi_needs_both_locations() {
        let mut board = ServiceBoard::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let taxi = NewServiceRequest {
            service_type: ServiceType::Taxi,
            pickup_location: Some("JKIA".into()),
            ..laundry()
        };
        let err = board.submit(&customer(), taxi, &mut trail).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(board.list().len(), 2);
    }

    #[test]
    fn lifecycle_runs_through_completion() {
        let mut board = ServiceBoard::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);
        let request = board.submit(&customer(), laundry(), &mut trail).unwrap();

        let err = board.advance(&request.id, RequestStatus::InProgress, &mut trail).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let assigned = board.assign(&request.id, &driver(), &mut trail).unwrap();
        assert_eq!(assigned.status, RequestStatus::Assigned);
        assert_eq!(assigned.assigned_to.as_deref(), Some("1"));

        board.advance(&request.id, RequestStatus::InProgress, &mut trail).unwrap();
        let err = board.assign(&request.id, &driver(), &mut trail).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));

        let done = board.advance(&request.id, RequestStatus::Completed, &mut trail).unwrap();
        assert!(done.completed_at.is_some());
        assert!(board.cancel(&request.id, &mut trail).is_err());
    }

    #[test]
    fn inactive_employee_cannot_be_assigned() {
        let mut board = ServiceBoard::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);
        let request = board.submit(&customer(), laundry(), &mut trail).unwrap();

        let resting = Employee { is_active: false, ..driver() };
        let err = board.assign(&request.id, &resting, &mut trail).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(board.get(&request.id).unwrap().status, RequestStatus::Pending);
    }

    #[test]
    fn filter_and_lookup_by_employee() {
        let board = ServiceBoard::open(store());
        let now = crate::models::at(2025, 1, 20, 0, 0);

        let completed = RequestQuery { status: Some(RequestStatus::Completed), ..Default::default() };
        assert_eq!(board.filter(&completed, now)[0].id, "REQ-2025-002");

        let taxis = RequestQuery { service_type: Some(ServiceType::Taxi), ..Default::default() };
        assert_eq!(board.filter(&taxis, now).len(), 1);

        let recent = RequestQuery { window_days: Some(6), ..Default::default() };
        assert_eq!(board.filter(&recent, now).len(), 1);

        assert_eq!(board.for_employee("3").len(), 1);
    }
}
