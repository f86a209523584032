//! Shop products and menu dishes, one generic container for both.

use crate::audit::{AuditEvent, AuditTrail};
use crate::collection::{Collection, Draft, Entity, Patch};
use crate::db::DurableStore;
use crate::error::{Error, Result};
use crate::filter::{distinct_values, FilterSpec, Filterable};
use crate::models::{
    CatalogItem, CatalogPatch, FoodDetails, NewCatalogItem, Product, ProductDetails,
};
use crate::seed;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::sync::Arc;

/// The fields that set one catalog apart from another.
pub trait CatalogDetails: Serialize + DeserializeOwned + Clone + Debug + PartialEq {
    const KIND: &'static str;
    const STORAGE_KEY: &'static str;

    fn seed() -> Vec<CatalogItem<Self>>;
}

impl CatalogDetails for FoodDetails {
    const KIND: &'static str = "Food Item";
    const STORAGE_KEY: &'static str = "admin_food_items";

    fn seed() -> Vec<CatalogItem<Self>> {
        seed::food_items()
    }
}

impl CatalogDetails for ProductDetails {
    const KIND: &'static str = "Product";
    const STORAGE_KEY: &'static str = "admin_products";

    fn seed() -> Vec<CatalogItem<Self>> {
        seed::products()
    }
}

impl<X: CatalogDetails> Entity for CatalogItem<X> {
    const KIND: &'static str = X::KIND;

    fn id(&self) -> &str {
        &self.id
    }
}

impl<X> Filterable for CatalogItem<X> {
    fn text_field(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "description" => Some(&self.description),
            "category" => Some(&self.category),
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

impl<X> Draft<CatalogItem<X>> for NewCatalogItem<X> {
    fn into_entity(self, id: String, now: DateTime<Utc>) -> CatalogItem<X> {
        CatalogItem {
            id,
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            category: self.category.trim().to_string(),
            image_url: self.image_url,
            is_available: self.is_available,
            details: self.details,
            created_at: now,
            updated_at: now,
        }
    }
}

impl<X> Patch<CatalogItem<X>> for CatalogPatch<X> {
    fn apply(self, item: &mut CatalogItem<X>, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(category) = self.category {
            item.category = category.trim().to_string();
        }
        if let Some(image_url) = self.image_url {
            item.image_url = image_url;
        }
        if let Some(is_available) = self.is_available {
            item.is_available = is_available;
        }
        if let Some(details) = self.details {
            item.details = details;
        }
        item.updated_at = now;
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
pub struct CatalogQuery {
    #[serde(default)]
    pub search: String,
    /// Empty means every category.
    #[serde(default)]
    pub category: String,
}

impl CatalogQuery {
    pub fn to_spec(&self) -> FilterSpec {
        FilterSpec::search(&["name", "description"], &self.search).exact("category", &self.category)
    }
}

/// "3 of 12 items"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCounts {
    pub shown: usize,
    pub total: usize,
}

pub struct Catalog<X> {
    items: Collection<CatalogItem<X>>,
}

pub type FoodCatalog = Catalog<FoodDetails>;
pub type ProductCatalog = Catalog<ProductDetails>;

impl<X: CatalogDetails> Catalog<X> {
    pub fn open(store: Arc<dyn DurableStore>) -> Self {
        Self {
            items: Collection::open(store, X::STORAGE_KEY, X::seed()),
        }
    }

    pub fn list(&self) -> &[CatalogItem<X>] {
        self.items.list()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem<X>> {
        self.items.get(id)
    }

    pub fn create(
        &mut self,
        draft: NewCatalogItem<X>,
        trail: &mut AuditTrail<'_>,
    ) -> Result<CatalogItem<X>> {
        require("Name", &draft.name)?;
        require("Category", &draft.category)?;

        let item = self.items.create(draft)?;
        trail.record(AuditEvent::created(X::KIND, &item.id, &item))?;
        Ok(item)
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: CatalogPatch<X>,
        trail: &mut AuditTrail<'_>,
    ) -> Result<CatalogItem<X>> {
        if let Some(name) = &patch.name {
            require("Name", name)?;
        }
        if let Some(category) = &patch.category {
            require("Category", category)?;
        }

        let old = self.get(id).cloned();
        let item = self.items.update(id, patch)?;
        if let Some(old) = old {
            trail.record(AuditEvent::updated(X::KIND, id, &old, &item))?;
        }
        Ok(item)
    }

    pub fn remove(&mut self, id: &str, trail: &mut AuditTrail<'_>) -> Result<CatalogItem<X>> {
        let removed = self.items.remove(id)?;
        trail.record(AuditEvent::deleted(X::KIND, id, &removed))?;
        Ok(removed)
    }

    pub fn toggle_availability(
        &mut self,
        id: &str,
        trail: &mut AuditTrail<'_>,
    ) -> Result<CatalogItem<X>> {
        let now = Utc::now();
        let item = self.items.modify(id, |item| {
            item.is_available = !item.is_available;
            item.updated_at = now;
        })?;
        trail.record(
            AuditEvent::new(format!("Toggled {} Availability", X::KIND), X::KIND, id)
                .with_old(&serde_json::json!({ "isAvailable": !item.is_available }))
                .with_new(&serde_json::json!({ "isAvailable": item.is_available })),
        )?;
        Ok(item)
    }

    pub fn categories(&self) -> Vec<String> {
        distinct_values(self.list(), "category")
    }

    pub fn filter(&self, query: &CatalogQuery) -> Vec<CatalogItem<X>> {
        self.items.filter(&query.to_spec(), Utc::now())
    }

    pub fn counts(&self, query: &CatalogQuery) -> CatalogCounts {
        CatalogCounts {
            shown: self.filter(query).len(),
            total: self.items.len(),
        }
    }
}

impl ProductCatalog {
    /// Products at or below `threshold`, lowest stock first.
    pub fn low_stock(&self, threshold: u32) -> Vec<Product> {
        let mut low: Vec<Product> = self
            .list()
            .iter()
            .filter(|p| p.details.stock <= threshold)
            .cloned()
            .collect();
        low.sort_by_key(|p| p.details.stock);
        low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditTrail;
    use crate::models::NewFoodItem;
    use crate::test_support::{admin, audit_logs, store};

    fn test_dish() -> NewFoodItem {
        NewCatalogItem {
            name: "Test Dish".into(),
            description: "Crispy".into(),
            price: 500,
            category: "Snacks".into(),
            image_url: String::new(),
            is_available: true,
            details: FoodDetails { prep_time: 10 },
        }
    }

    #[test]
    fn create_toggle_delete_scenario() {
        let mut food = FoodCatalog::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);
        let n = food.list().len();

        let dish = food.create(test_dish(), &mut trail).unwrap();
        assert_eq!(food.list().len(), n + 1);
        assert_eq!(food.get(&dish.id).unwrap().category, "Snacks");

        let original = dish.is_available;
        food.toggle_availability(&dish.id, &mut trail).unwrap();
        let twice = food.toggle_availability(&dish.id, &mut trail).unwrap();
        assert_eq!(twice.is_available, original);

        food.remove(&dish.id, &mut trail).unwrap();
        assert_eq!(food.list().len(), n);
    }

    #[test]
    fn mutations_are_audited() {
        let mut food = FoodCatalog::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        {
            let mut trail = AuditTrail::new(&actor, &mut logs);
            let dish = food.create(test_dish(), &mut trail).unwrap();
            food.remove(&dish.id, &mut trail).unwrap();
        }
        assert_eq!(logs.list()[0].action, "Deleted Food Item");
        assert_eq!(logs.list()[1].action, "Created Food Item");
        assert_eq!(logs.list()[1].new_data.as_ref().unwrap()["name"], "Test Dish");
    }

    #[test]
    fn blank_name_never_reaches_the_list() {
        let mut food = FoodCatalog::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);
        let n = food.list().len();

        let err = food
            .create(NewCatalogItem { name: "  ".into(), ..test_dish() }, &mut trail)
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(food.list().len(), n);
    }

    #[test]
    fn update_merges_patch_and_reports_unknown_ids() {
        let mut food = FoodCatalog::open(store());
        let mut logs = audit_logs();
        let actor = admin();
        let mut trail = AuditTrail::new(&actor, &mut logs);

        let patch = CatalogPatch {
            price: Some(1300),
            details: Some(FoodDetails { prep_time: 40 }),
            ..Default::default()
        };
        let updated = food.update("1", patch, &mut trail).unwrap();
        assert_eq!(updated.price, 1300);
        assert_eq!(updated.details.prep_time, 40);
        assert_eq!(updated.name, "Chicken Biryani");

        let err = food.update("nope", CatalogPatch::default(), &mut trail).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "Food Item", .. }));
    }

    #[test]
    fn filter_by_search_and_category() {
        let food = FoodCatalog::open(store());

        let pizza = food.filter(&CatalogQuery { search: "MOZZARELLA".into(), ..Default::default() });
        assert_eq!(pizza.len(), 1);
        assert_eq!(pizza[0].name, "Margherita Pizza");

        let query = CatalogQuery { category: "Fast Food".into(), ..Default::default() };
        assert_eq!(food.counts(&query), CatalogCounts { shown: 1, total: 3 });
        assert_eq!(food.categories(), vec!["Indian", "Italian", "Fast Food"]);
    }

    #[test]
    fn low_stock_is_sorted_ascending() {
        let products = ProductCatalog::open(store());
        let low = products.low_stock(12);
        let stocks: Vec<u32> = low.iter().map(|p| p.details.stock).collect();
        assert_eq!(stocks, vec![6, 8, 12]);
    }
}
