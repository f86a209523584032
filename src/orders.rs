use crate::audit::{AuditEvent, AuditTrail};
use crate::cart::Cart;
use crate::collection::{Collection, Entity, Insert};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::export::ExportRow;
use crate::filter::{FilterSpec, Filterable};
use crate::ids;
use crate::models::{
    CartItem, CheckoutDetails, Employee, Order, OrderStatus, OrderType, PaymentStatus, User,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "admin_orders";

impl OrderStatus {
    fn rank(&self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Confirmed => 1,
            OrderStatus::Preparing => 2,
            OrderStatus::Ready => 3,
            OrderStatus::Delivered => 4,
            OrderStatus::Cancelled => 5,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Orders only move forward; cancellation is possible until delivery.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == OrderStatus::Cancelled || next.rank() > self.rank()
    }
}

impl Entity for Order {
    const KIND: &'static str = "Order";
    const INSERT: Insert = Insert::Newest;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Filterable for Order {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "id" => Some(&self.id),
            "customerName" => Some(&self.customer_name),
            "customerEmail" => Some(&self.customer_email),
            "customerPhone" => Some(&self.customer_phone),
            "status" => Some(self.status.as_str()),
            "orderType" => Some(self.order_type.as_str()),
            "paymentStatus" => Some(self.payment_status.as_str()),
            "assignedTo" => self.assigned_to.as_deref(),
            _ => None,
        }
    }

    fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "createdAt" => Some(self.created_at),
            "updatedAt" => Some(self.updated_at),
            _ => None,
        }
    }
}

impl ExportRow for Order {
    fn columns() -> &'static [&'static str] {
        &[
            "Order ID",
            "Customer",
            "Email",
            "Items",
            "Total",
            "Status",
            "Payment",
            "Date",
        ]
    }

    fn values(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.customer_name.clone(),
            self.customer_email.clone(),
            self.items
                .iter()
                .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
                .to_string(),
            self.total_amount.to_string(),
            self.status.to_string(),
            format!("{} ({})", self.payment_method, self.payment_status),
            self.created_at.format("%Y-%m-%d").to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub order_type: Option<OrderType>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub window_days: Option<i64>,
}

impl OrderQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["id", "customerName", "customerEmail"], &self.search)
            .exact("status", self.status.map(|s| s.as_str()).unwrap_or_default())
            .exact("orderType", self.order_type.map(|t| t.as_str()).unwrap_or_default())
            .exact(
                "paymentStatus",
                self.payment_status.map(|s| s.as_str()).unwrap_or_default(),
            )
            .within_days("createdAt", self.window_days)
    }
}

/// A cart snapshot plus the checkout form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub customer: User,
    pub items: Vec<CartItem>,
    pub total_amount: u64,
    #[serde(flatten)]
    pub details: CheckoutDetails,
}

pub struct OrderBoard {
    orders: Collection<Order>,
}

impl OrderBoard {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            orders: Collection::open(store, STORAGE_KEY, Vec::new()),
        }
    }

    pub fn list(&self) -> &[Order] {
        self.orders.list()
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    /// Record a new pending order. The total is taken as given and never
    /// recomputed.
    pub fn place(&mut self, draft: NewOrder, trail: &mut AuditTrail<'_>) -> Result<Order> {
        if draft.items.is_empty() {
            return Err(Error::validation("An order needs at least one item"));
        }
        if draft.details.delivery_address.trim().is_empty() {
            return Err(Error::validation("Delivery address is required"));
        }

        let now = Utc::now();
        let NewOrder { customer, items, total_amount, details } = draft;
        let order_type = if items.iter().all(|i| i.food_id.is_some()) {
            OrderType::Food
        } else {
            OrderType::Product
        };

        let order = Order {
            id: ids::order_number(now),
            customer_id: customer.id,
            customer_name: customer.name,
            customer_phone: details.phone.or(customer.phone).unwrap_or_default(),
            customer_email: customer.email,
            items,
            total_amount,
            status: OrderStatus::Pending,
            order_type,
            delivery_address: details.delivery_address.trim().to_string(),
            payment_method: details.payment_method,
            payment_status: PaymentStatus::Pending,
            assigned_to: None,
            created_at: now,
            updated_at: now,
            notes: details.notes.filter(|n| !n.trim().is_empty()),
        };

        let placed = self.orders.insert(order)?;
        tracing::info!(id = %placed.id, total = placed.total_amount, "order placed");
        trail.record(AuditEvent::new("Placed Order", Order::KIND, &placed.id).with_new(&placed))?;
        Ok(placed)
    }

    /// Place an order from the cart's current lines and empty the cart.
    pub fn checkout(
        &mut self,
        customer: &User,
        cart: &mut Cart,
        details: CheckoutDetails,
        trail: &mut AuditTrail<'_>,
    ) -> Result<Order> {
        if cart.lines().is_empty() {
            return Err(Error::validation("Cart is empty"));
        }
        let draft = NewOrder {
            customer: customer.clone(),
            items: cart.lines().to_vec(),
            total_amount: cart.total_amount(),
            details,
        };
        let placed = self.place(draft, trail)?;
        cart.clear()?;
        Ok(placed)
    }

    pub fn advance(
        &mut self,
        id: &str,
        next: OrderStatus,
        trail: &mut AuditTrail<'_>,
    ) -> Result<Order> {
        let now = Utc::now();
        let mut previous = None;
        let updated = self.orders.try_modify(id, |order| {
            if !order.status.can_transition_to(next) {
                return Err(Error::InvalidTransition {
                    from: order.status.to_string(),
                    to: next.to_string(),
                });
            }
            previous = Some(order.status);
            order.status = next;
            order.updated_at = now;
            Ok(())
        })?;
        trail.record(
            AuditEvent::new("Updated Order Status", Order::KIND, id)
                .with_old(&serde_json::json!({ "status": previous }))
                .with_new(&serde_json::json!({ "status": next })),
        )?;
        Ok(updated)
    }

    pub fn cancel(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<Order> {
        self.advance(id, OrderStatus::Cancelled, trail)
    }

    /// Hand the order to an active employee; `assigned_to` stores their id.
    pub fn assign(
        &mut self,
        id: &str,
        employee: &Employee,
        trail: &mut AuditTrail<'_>,
    ) -> Result<Order> {
        if !employee.is_active {
            return Err(Error::validation(format!("{} is not active", employee.name)));
        }
        let now = Utc::now();
        let updated = self.orders.try_modify(id, |order| {
            if order.status.is_terminal() {
                return Err(Error::validation(format!("Order is already {}", order.status)));
            }
            order.assigned_to = Some(employee.id.clone());
            order.updated_at = now;
            Ok(())
        })?;
        trail.record(
            AuditEvent::new("Assigned Order", Order::KIND, id).with_new(
                &serde_json::json!({ "assignedTo": updated.assigned_to, "employee": employee.name }),
            ),
        )?;
        Ok(updated)
    }

    /// Independent of the payment ledger; nothing keeps the two in sync.
    pub fn set_payment_status(
        &mut self,
        id: &str,
        status: PaymentStatus,
        trail: &mut AuditTrail<'_>,
    ) -> Result<Order> {
        let now = Utc::now();
        let old = self.get(id).map(|o| o.payment_status);
        let updated = self.orders.modify(id, |order| {
            order.payment_status = status;
            order.updated_at = now;
        })?;
        trail.record(
            AuditEvent::new("Updated Payment Status", Order::KIND, id)
                .with_old(&serde_json::json!({ "paymentStatus": old }))
                .with_new(&serde_json::json!({ "paymentStatus": status })),
        )?;
        Ok(updated)
    }

    pub fn filter(&self, query: &OrderQuery, now: DateTime<Utc>) -> Vec<Order> {
        self.orders.filter(&query.to_spec(), now)
    }
}
