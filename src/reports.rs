//! Dashboard figures, folded from the order board, payment ledger and
//! service requests on every call.

use crate::models::{Order, OrderStatus, Payment, PaymentStatus, ServiceRequest};
use crate::payments;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

const TOP_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    pub sales: u32,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_revenue: u64,
    pub total_orders: usize,
    pub total_requests: usize,
    pub average_order_value: u64,
    pub active_customers: usize,
    pub payments_collected: u64,
    pub payments_pending: u64,
    pub orders_by_status: Vec<StatusCount>,
    pub top_items: Vec<TopItem>,
    pub revenue_by_month: Vec<MonthRevenue>,
}

/// An order earns revenue once it is delivered or paid, unless cancelled.
fn earns_revenue(order: &Order) -> bool {
    order.status != OrderStatus::Cancelled
        && (order.status == OrderStatus::Delivered || order.payment_status == PaymentStatus::Paid)
}

impl DashboardSummary {
    pub fn from_records(
        orders: &[Order],
        payments: &[Payment],
        requests: &[ServiceRequest],
    ) -> Self {
        let earning: Vec<&Order> = orders.iter().filter(|o| earns_revenue(o)).collect();
        let total_revenue = earning
            .iter()
            .fold(0u64, |acc, o| acc.saturating_add(o.total_amount));
        let average_order_value = match earning.len() as u64 {
            0 => 0,
            n => total_revenue / n,
        };

        let active_customers = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len();

        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ];
        let orders_by_status = statuses
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let ledger = payments::totals(payments);

        Self {
            total_revenue,
            total_orders: orders.len(),
            total_requests: requests.len(),
            average_order_value,
            active_customers,
            payments_collected: ledger.paid,
            payments_pending: ledger.pending,
            orders_by_status,
            top_items: top_items(&earning),
            revenue_by_month: revenue_by_month(&earning),
        }
    }
}

fn top_items(orders: &[&Order]) -> Vec<TopItem> {
    let mut by_name: HashMap<&str, TopItem> = HashMap::new();
    for line in orders.iter().flat_map(|o| o.items.iter()) {
        let entry = by_name.entry(line.name.as_str()).or_insert_with(|| TopItem {
            name: line.name.clone(),
            sales: 0,
            revenue: 0,
        });
        entry.sales = entry.sales.saturating_add(line.quantity);
        entry.revenue = entry.revenue.saturating_add(line.line_total());
    }

    let mut items: Vec<TopItem> = by_name.into_values().collect();
    items.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.name.cmp(&b.name)));
    items.truncate(TOP_ITEMS);
    items
}

fn revenue_by_month(orders: &[&Order]) -> Vec<MonthRevenue> {
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    for order in orders {
        let month = months.entry(order.created_at.format("%Y-%m").to_string()).or_default();
        *month = month.saturating_add(order.total_amount);
    }
    months
        .into_iter()
        .map(|(month, revenue)| MonthRevenue { month, revenue })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{at, CartItem, OrderType, PaymentMethod};
    use crate::seed;

    fn order(id: &str, customer: &str, status: OrderStatus, paid: bool, month: u32) -> Order {
        let items = vec![
            CartItem {
                id: "1".into(),
                product_id: None,
                food_id: Some("1".into()),
                quantity: 2,
                price: 1200,
                name: "Chicken Biryani".into(),
                image_url: String::new(),
            },
            CartItem {
                id: "3".into(),
                product_id: None,
                food_id: Some("3".into()),
                quantity: 1,
                price: 890,
                name: "Beef Burger".into(),
                image_url: String::new(),
            },
        ];
        Order {
            id: id.into(),
            customer_id: customer.into(),
            customer_name: customer.into(),
            customer_phone: String::new(),
            customer_email: format!("{customer}@example.com"),
            total_amount: items.iter().map(CartItem::line_total).sum(),
            items,
            status,
            order_type: OrderType::Food,
            delivery_address: "Nairobi".into(),
            payment_method: PaymentMethod::Mpesa,
            payment_status: if paid { PaymentStatus::Paid } else { PaymentStatus::Pending },
            assigned_to: None,
            created_at: at(2025, month, 10, 12, 0),
            updated_at: at(2025, month, 10, 12, 0),
            notes: None,
        }
    }

    #[test]
    fn empty_board_has_zero_figures() {
        let summary = DashboardSummary::from_records(&[], &[], &[]);
        assert_eq!(summary.total_revenue, 0);
        assert_eq!(summary.average_order_value, 0);
        assert_eq!(summary.total_requests, 0);
        assert!(summary.top_items.is_empty());
        assert_eq!(summary.orders_by_status.len(), 6);
    }

    #[test]
    fn revenue_counts_delivered_or_paid_orders() {
        let orders = vec![
            order("a", "jane", OrderStatus::Delivered, false, 1),
            order("b", "joe", OrderStatus::Preparing, true, 2),
            order("c", "joe", OrderStatus::Pending, false, 2),
            order("d", "ann", OrderStatus::Cancelled, true, 2),
        ];
        let summary = DashboardSummary::from_records(&orders, &seed::payments(), &seed::service_requests());

        assert_eq!(summary.total_orders, 4);
        assert_eq!(summary.total_requests, 2);
        assert_eq!(summary.total_revenue, 2 * 3290);
        assert_eq!(summary.average_order_value, 3290);
        assert_eq!(summary.active_customers, 2);
        assert_eq!(summary.payments_collected, 7400);
        assert_eq!(summary.payments_pending, 129999);

        let cancelled = summary
            .orders_by_status
            .iter()
            .find(|s| s.status == OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(cancelled.count, 1);

        assert_eq!(summary.top_items[0].name, "Chicken Biryani");
        assert_eq!(summary.top_items[0].sales, 4);
        assert_eq!(summary.top_items[0].revenue, 4800);

        assert_eq!(
            summary.revenue_by_month,
            vec![
                MonthRevenue { month: "2025-01".into(), revenue: 3290 },
                MonthRevenue { month: "2025-02".into(), revenue: 3290 },
            ]
        );
    }
}
