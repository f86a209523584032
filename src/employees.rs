//! Field staff that orders and service requests get assigned to.

use crate::audit::{AuditEvent, AuditTrail};
use crate::collection::{Collection, Draft, Entity, Patch};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::filter::{FilterSpec, Filterable};
use crate::models::{Employee, EmployeePatch, EmployeeRole, NewEmployee};
use crate::seed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_employees";

impl Entity for Employee {
    const KIND: &'static str = "Employee";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Employee {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "role" => Some(self.role.as_str()),
            "isActive" => Some(if self.is_active { "true" } else { "false" }),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "joinedAt").then_some(self.joined_at)
    }
}

impl Draft<Employee> for NewEmployee {
    fn into_entity(self, id: String, now: DateTime<Utc>) -> Employee {
        Employee {
            id,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.trim().to_string(),
            role: self.role,
            is_active: true,
            rating: 0.0,
            total_jobs: 0,
            joined_at: now,
            skills: self.skills,
        }
    }
}

impl Patch<Employee> for EmployeePatch {
    fn apply(self, employee: &mut Employee, _now: DateTime<Utc>) {
        if let Some(name) = self.name {
            employee.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            employee.email = email.trim().to_lowercase();
        }
        if let Some(phone) = self.phone {
            employee.phone = phone.trim().to_string();
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(is_active) = self.is_active {
            employee.is_active = is_active;
        }
        if let Some(skills) = self.skills {
            employee.skills = skills;
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub role: Option<EmployeeRole>,
    #[serde(default)]
    pub active: Option<bool>,
}

impl EmployeeQuery {
    pub fn to_spec(&self) -> FilterSpec {
        let active = match self.active {
            Some(true) => "true",
            Some(false) => "false",
            None => "",
        };
        FilterSpec::search(&["name", "email", "phone"], &self.search)
            .exact("role", self.role.map(|r| r.as_str()).unwrap_or_default())
            .exact("isActive", active)
    }
}

pub struct EmployeeRoster {
    employees: Collection<Employee>,
}

impl EmployeeRoster {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            employees: Collection::open(store, STORAGE_KEY, seed::employees()),
        }
    }

    pub fn list(&self) -> &[Employee] {
        self.employees.list()
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.get(id)
    }

    /// The employee at `id`, provided they can take new work.
    pub fn available(&self, id: &str) -> Result<&Employee> {
        let employee = self
            .get(id)
            .ok_or_else(|| Error::not_found(Employee::KIND, id))?;
        if !employee.is_active {
            return Err(Error::validation(format!("{} is not active", employee.name)));
        }
        Ok(employee)
    }

    pub fn create(&mut self, draft: NewEmployee, trail: &mut AuditTrail<'_>) -> Result<Employee> {
        require("Name", &draft.name)?;
        require("Email", &draft.email)?;
        require("Phone", &draft.phone)?;

        let employee = self.employees.create(draft)?;
        trail.record(AuditEvent::created(Employee::KIND, &employee.id, &employee))?;
        Ok(employee)
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: EmployeePatch,
        trail: &mut AuditTrail<'_>,
    ) -> Result<Employee> {
        for (field, value) in [("Name", &patch.name), ("Email", &patch.email), ("Phone", &patch.phone)] {
            if let Some(value) = value {
                require(field, value)?;
            }
        }

        let old = self.get(id).cloned();
        let employee = self.employees.update(id, patch)?;
        if let Some(old) = old {
            trail.record(AuditEvent::updated(Employee::KIND, id, &old, &employee))?;
        }
        Ok(employee)
    }

    pub fn toggle_active(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Employee> {
        let employee = self.employees.modify(id, |e| e.is_active = !e.is_active)?;
        trail.record(
            AuditEvent::new("Toggled Employee Status", Employee::KIND, id)
                .with_new(&serde_json::json!({ "isActive": employee.is_active })),
        )?;
        Ok(employee)
    }

    pub fn remove(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Employee> {
        let removed = self.employees.remove(id)?;
        trail.record(AuditEvent::deleted(Employee::KIND, id, &removed))?;
        Ok(removed)
    }

    pub fn filter(&self, query: &EmployeeQuery) -> Vec<Employee> {
        self.employees.filter(&query.to_spec(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin, audit_logs, store};

    fn recruit(name: &str) -> NewEmployee {
        NewEmployee {
            name: name.into(),
            email: " Ken@QuickLinkServices.com ".into(),
            phone: "0756789012".into(),
            role: EmployeeRole::Driver,
            skills: vec!["Navigation".into()],
        }
    }

    #[test]
    fn create_appends_active_employee() {
        let mut roster = EmployeeRoster::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let ken = roster.create(recruit("Ken Otieno"), &mut trail).unwrap();
        assert_eq!(roster.list().len(), 5);
        assert_eq!(roster.list()[4], ken);
        assert!(ken.is_active);
        assert_eq!(ken.email, "ken@quicklinkservices.com");
        assert_eq!(ken.total_jobs, 0);

        let err = roster.create(recruit("  "), &mut trail).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn inactive_employee_is_not_available() {
        let mut roster = EmployeeRoster::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        assert_eq!(roster.available("1").unwrap().name, "James Mwangi");
        roster.toggle_active("1", &mut trail).unwrap();
        assert!(matches!(roster.available("1"), Err(Error::Validation(_))));
        assert!(matches!(roster.available("nobody"), Err(Error::NotFound { .. })));
    }

    #[test]
    fn update_and_remove_are_audited() {
        let mut roster = EmployeeRoster::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        {
            let mut trail = AuditTrail::new(&actor, &mut logs);
            let patch = EmployeePatch { phone: Some("0799999999".into()), ..Default::default() };
            let mary = roster.update("2", patch, &mut trail).unwrap();
            assert_eq!(mary.phone, "0799999999");
            assert_eq!(mary.name, "Mary Wanjiku");

            roster.remove("3", &mut trail).unwrap();
        }
        assert!(roster.get("3").is_none());
        assert_eq!(logs.list()[0].action, "Deleted Employee");
        assert_eq!(logs.list()[1].action, "Updated Employee");
    }

    #[test]
    fn filter_by_role_and_activity() {
        let mut roster = EmployeeRoster::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);
        roster.toggle_active("2", &mut trail).unwrap();

        let drivers = roster.filter(&EmployeeQuery { role: Some(EmployeeRole::Driver), ..Default::default() });
        assert_eq!(drivers.len(), 1);

        let active = roster.filter(&EmployeeQuery { active: Some(true), ..Default::default() });
        assert_eq!(active.len(), 3);

        let by_name = roster.filter(&EmployeeQuery { search: "wanjiku".into(), ..Default::default() });
        assert_eq!(by_name[0].id, "2");
    }
}
