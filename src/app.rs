//! Everything one signed-in profile works with, wired to one store.

use crate::audit::{AuditLogs, AuditQuery, AuditTrail};
use crate::cart::Cart;
use crate::catalog::{FoodCatalog, ProductCatalog};
use crate::config::AppConfig;
use crate::db::{Database, DurableStore, MemoryStore};
use crate::employees::EmployeeRoster;
use crate::error::{Error, Result};
use crate::messages::MessageBox;
use crate::models::{
    AuditLog, CheckoutDetails, NewServiceRequest, Order, Product, ServiceRequest, User,
};
use crate::orders::OrderBoard;
use crate::payments::PaymentLedger;
use crate::reports::DashboardSummary;
use crate::requests::ServiceBoard;
use crate::session::{Authenticator, DemoAuthenticator, SessionContainer};
use crate::settings::SettingsContainer;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Back-office containers. Reached through [`QuickLink::as_admin`] for
/// anything that changes them.
pub struct AdminContainers {
    pub food: FoodCatalog,
    pub products: ProductCatalog,
    pub messages: MessageBox,
    pub payments: PaymentLedger,
    pub orders: OrderBoard,
    pub requests: ServiceBoard,
    pub employees: EmployeeRoster,
    pub settings: SettingsContainer,
}

impl AdminContainers {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            food: FoodCatalog::open(store.clone()),
            products: ProductCatalog::open(store.clone()),
            messages: MessageBox::open(store.clone()),
            payments: PaymentLedger::open(store.clone()),
            orders: OrderBoard::open(store.clone()),
            requests: ServiceBoard::open(store.clone()),
            employees: EmployeeRoster::open(store.clone()),
            settings: SettingsContainer::open(store),
        }
    }
}

/// Open the SQLite store under `config.data_dir`, or an in-memory store when
/// no directory is configured or the database cannot be opened.
pub fn open_store(config: &AppConfig) -> Arc<dyn DurableStore> {
    let Some(dir) = &config.data_dir else {
        tracing::info!("no data directory configured, using in-memory store");
        return Arc::new(MemoryStore::new());
    };
    match Database::in_app_dir(dir).and_then(|db| db.initialize().map(|()| db)) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "database unavailable, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    }
}

pub struct QuickLink {
    config: AppConfig,
    authenticator: Box<dyn Authenticator>,
    pub session: SessionContainer,
    pub cart: Cart,
    pub audit: AuditLogs,
    pub admin: AdminContainers,
}

impl QuickLink {
    /// Open every container and restore the persisted session.
    pub fn open(config: AppConfig, store: Arc<dyn DurableStore>) -> Self {
        let mut session = SessionContainer::new();
        session.restore(store.clone());
        Self {
            authenticator: Box::new(DemoAuthenticator::new(config.admin_email.clone())),
            cart: Cart::open(store.clone()),
            audit: AuditLogs::open(store.clone()),
            admin: AdminContainers::open(store),
            session,
            config,
        }
    }

    pub fn with_authenticator(mut self, authenticator: Box<dyn Authenticator>) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        self.session.login(self.authenticator.as_ref(), email, password)
    }

    /// Sign out and drop the cart so the next user starts empty.
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.cart.clear()?;
        Ok(())
    }

    fn require_admin(&self) -> Result<()> {
        let actor = self.session.actor(Some(self.config.client_ip.clone()))?;
        if !self.session.is_admin() {
            return Err(Error::Unauthorized(format!("{} is not an admin", actor.email)));
        }
        Ok(())
    }

    /// Run `f` against the back-office containers with an audit trail for
    /// the signed-in admin.
    pub fn as_admin<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut AdminContainers, &mut AuditTrail<'_>) -> Result<T>,
    {
        self.require_admin()?;
        let actor = self.session.actor(Some(self.config.client_ip.clone()))?;
        let mut trail = AuditTrail::new(&actor, &mut self.audit);
        f(&mut self.admin, &mut trail)
    }

    /// Read-only counterpart of [`QuickLink::as_admin`] for back-office
    /// lists, exports and reports.
    pub fn admin_view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&QuickLink) -> T,
    {
        self.require_admin()?;
        Ok(f(self))
    }

    /// Turn the signed-in user's cart into an order.
    pub fn checkout(&mut self, details: CheckoutDetails) -> Result<Order> {
        let actor = self.session.actor(Some(self.config.client_ip.clone()))?;
        let customer = self
            .session
            .current()
            .cloned()
            .ok_or_else(|| Error::Unauthorized("not signed in".into()))?;
        let mut trail = AuditTrail::new(&actor, &mut self.audit);
        self.admin
            .orders
            .checkout(&customer, &mut self.cart, details, &mut trail)
    }

    /// Book a service for the signed-in user.
    pub fn request_service(&mut self, draft: NewServiceRequest) -> Result<ServiceRequest> {
        let actor = self.session.actor(Some(self.config.client_ip.clone()))?;
        let customer = self
            .session
            .current()
            .cloned()
            .ok_or_else(|| Error::Unauthorized("not signed in".into()))?;
        let mut trail = AuditTrail::new(&actor, &mut self.audit);
        self.admin.requests.submit(&customer, draft, &mut trail)
    }

    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::from_records(
            self.admin.orders.list(),
            self.admin.payments.list(),
            self.admin.requests.list(),
        )
    }

    pub fn low_stock(&self) -> Vec<Product> {
        self.admin.products.low_stock(self.config.low_stock_threshold)
    }

    /// Audit entries matching `query`; a query without a window uses the
    /// configured default.
    pub fn audit_view(&self, query: &AuditQuery, now: DateTime<Utc>) -> Vec<AuditLog> {
        let mut query = query.clone();
        query.window_days.get_or_insert(self.config.audit_window_days);
        self.audit.filter(&query, now)
    }
}
