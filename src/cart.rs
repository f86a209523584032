//! Shopping cart for the signed-in customer.

use crate::db::DurableStore;
use crate::error::Result;
use crate::models::CartItem;
use crate::slot::{Durability, PersistedSlot};
use std::sync::Arc;

pub const STORAGE_KEY: &str = "quicklink_cart";

pub struct Cart {
    slot: PersistedSlot<Vec<CartItem>>,
}

impl Cart {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            slot: PersistedSlot::initialize(store, STORAGE_KEY, Vec::new()),
        }
    }

    pub fn lines(&self) -> &[CartItem] {
        self.slot.get()
    }

    /// Adding an id that is already in the cart bumps its quantity by one.
    pub fn add(&mut self, item: CartItem) -> Result<Durability> {
        tracing::debug!(id = %item.id, "cart add");
        self.slot.update(|lines| {
            let mut next = lines.clone();
            match next.iter_mut().find(|line| line.id == item.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => next.push(CartItem { quantity: 1, ..item }),
            }
            next
        })
    }

    pub fn remove(&mut self, id: &str) -> Result<Durability> {
        self.slot
            .update(|lines| lines.iter().filter(|line| line.id != id).cloned().collect())
    }

    /// `quantity <= 0` drops the line; larger values are capped at `u32::MAX`.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) -> Result<Durability> {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.slot.update(|lines| {
            lines
                .iter()
                .cloned()
                .map(|mut line| {
                    if line.id == id {
                        line.quantity = quantity;
                    }
                    line
                })
                .collect()
        })
    }

    pub fn clear(&mut self) -> Result<Durability> {
        self.slot.clear()
    }

    pub fn total_items(&self) -> u32 {
        self.lines()
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    pub fn total_amount(&self) -> u64 {
        self.lines()
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.line_total()))
    }
}
