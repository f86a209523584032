//! Who is signed in.
//!
//! The session starts in [`AuthState::Loading`] and leaves it exactly once,
//! when [`SessionContainer::restore`] reads the persisted user. Until then
//! nothing protected should be shown and every operation that needs a user
//! fails with [`Error::SessionLoading`].

use crate::audit::Actor;
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::ids;
use crate::models::{Role, User};
use crate::slot::PersistedSlot;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "quicklink_user";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "camelCase")]
pub enum AuthState {
    Loading,
    Authenticated(User),
    Anonymous,
}

/// Credential check behind `login`.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, email: &str, password: &str) -> Result<User>;
}

/// Accepts any non-empty credentials. The configured admin address signs in
/// as an admin, everyone else as a customer.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    admin_email: String,
}

impl DemoAuthenticator {
    pub fn new(admin_email: impl Into<String>) -> Self {
        Self {
            admin_email: admin_email.into(),
        }
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(Error::validation("Email and password are required"));
        }

        let is_admin = email.eq_ignore_ascii_case(&self.admin_email);
        let (id, name, role) = if is_admin {
            ("admin1".to_string(), "Admin User", Role::Admin)
        } else {
            (ids::new_id(), "Customer User", Role::Customer)
        };
        Ok(User {
            id,
            email: email.to_string(),
            name: name.to_string(),
            role,
            phone: Some("0111679286".to_string()),
            created_at: Utc::now(),
            is_active: true,
        })
    }
}

pub struct SessionContainer {
    state: AuthState,
    slot: Option<PersistedSlot<Option<User>>>,
}

impl Default for SessionContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContainer {
    pub fn new() -> Self {
        Self {
            state: AuthState::Loading,
            slot: None,
        }
    }

    /// Read the persisted user once. Calling it again is a no-op.
    pub fn restore(&mut self, store: Arc<dyn DurableStore>) -> &AuthState {
        if self.slot.is_some() {
            return &self.state;
        }
        let slot: PersistedSlot<Option<User>> =
            PersistedSlot::initialize(store, STORAGE_KEY, None);
        self.state = match slot.get() {
            Some(user) => {
                tracing::info!(email = %user.email, role = %user.role, "session restored");
                AuthState::Authenticated(user.clone())
            }
            None => AuthState::Anonymous,
        };
        self.slot = Some(slot);
        &self.state
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == AuthState::Loading
    }

    pub fn login(
        &mut self,
        auth: &dyn Authenticator,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let slot = self.slot.as_mut().ok_or(Error::SessionLoading)?;
        let user = auth.authenticate(email, password)?;
        slot.set(Some(user.clone()))?;
        tracing::info!(email = %user.email, role = %user.role, "signed in");
        self.state = AuthState::Authenticated(user.clone());
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        let slot = self.slot.as_mut().ok_or(Error::SessionLoading)?;
        slot.clear()?;
        tracing::info!("signed out");
        self.state = AuthState::Anonymous;
        Ok(())
    }

    pub fn current(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    fn has_role(&self, role: Role) -> bool {
        self.current().is_some_and(|u| u.role == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    pub fn is_employee(&self) -> bool {
        self.has_role(Role::Employee)
    }

    pub fn is_customer(&self) -> bool {
        self.has_role(Role::Customer)
    }

    /// Audit identity of the signed-in user.
    pub fn actor(&self, ip_address: Option<String>) -> Result<Actor> {
        match &self.state {
            AuthState::Loading => Err(Error::SessionLoading),
            AuthState::Anonymous => Err(Error::Unauthorized("not signed in".into())),
            AuthState::Authenticated(user) => Ok(Actor {
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                email: user.email.clone(),
                ip_address,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::store;

    fn demo() -> DemoAuthenticator {
        DemoAuthenticator::new("admin@quicklinkservices.com")
    }

    fn restored(store: Arc<dyn DurableStore>) -> SessionContainer {
        let mut session = SessionContainer::new();
        session.restore(store);
        session
    }

    #[test]
    fn starts_loading_and_refuses_login() {
        let mut session = SessionContainer::new();
        assert!(session.is_loading());
        assert!(session.current().is_none());
        let err = session.login(&demo(), "a@b.com", "pw").unwrap_err();
        assert!(matches!(err, Error::SessionLoading));
    }

    #[test]
    fn admin_address_signs_in_as_admin() {
        let mut session = restored(store());
        assert_eq!(session.state(), &AuthState::Anonymous);

        let user = session.login(&demo(), "admin@quicklinkservices.com", "x").unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.name, "Admin User");
        assert!(session.is_admin());
        assert!(!session.is_customer());
    }

    #[test]
    fn other_addresses_sign_in_as_customers() {
        let mut session = restored(store());
        let user = session.login(&demo(), "jane@example.com", "x").unwrap();
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.name, "Customer User");
        assert!(session.is_customer());
        assert!(!session.is_employee());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let mut session = restored(store());
        assert!(matches!(session.login(&demo(), "", "x"), Err(Error::Validation(_))));
        assert!(matches!(session.login(&demo(), "a@b.com", ""), Err(Error::Validation(_))));
        assert_eq!(session.state(), &AuthState::Anonymous);
    }

    #[test]
    fn session_survives_restart_until_logout() {
        let store = store();
        let mut session = restored(store.clone());
        session.login(&demo(), "jane@example.com", "x").unwrap();

        let mut again = restored(store.clone());
        assert_eq!(again.current().map(|u| u.email.as_str()), Some("jane@example.com"));

        again.logout().unwrap();
        assert!(again.current().is_none());
        assert_eq!(restored(store).state(), &AuthState::Anonymous);
    }

    #[test]
    fn actor_carries_identity_and_ip() {
        let mut session = restored(store());
        assert!(matches!(session.actor(None), Err(Error::Unauthorized(_))));

        session.login(&demo(), "admin@quicklinkservices.com", "x").unwrap();
        let actor = session.actor(Some("10.0.0.2".into())).unwrap();
        assert_eq!(actor.user_id, "admin1");
        assert_eq!(actor.email, "admin@quicklinkservices.com");
        assert_eq!(actor.ip_address.as_deref(), Some("10.0.0.2"));
    }
}
