//! Search / category / time-window filtering shared by every admin list.

use chrono::{DateTime, Duration, Utc};

/// Exposes named fields of an entity to [`filter_entities`].
pub trait Filterable {
    /// Text or categorical field by name. `None` when the field is absent.
    fn text_field(&self, field: &str) -> Option<&str>;

    /// Timestamp field by name.
    fn time_field(&self, _field: &str) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub search_fields: Vec<&'static str>,
    pub search_term: String,
    /// Field / required value pairs. An empty value means "all".
    pub exact_filters: Vec<(&'static str, String)>,
    pub date_field: Option<&'static str>,
    pub window_days: Option<i64>,
}

impl FilterSpec {
    pub fn search(fields: &[&'static str], term: impl Into<String>) -> Self {
        Self {
            search_fields: fields.to_vec(),
            search_term: term.into(),
            ..Self::default()
        }
    }

    pub fn exact(mut self, field: &'static str, value: impl Into<String>) -> Self {
        self.exact_filters.push((field, value.into()));
        self
    }

    pub fn within_days(mut self, field: &'static str, days: Option<i64>) -> Self {
        self.date_field = Some(field);
        self.window_days = days;
        self
    }

    pub fn matches<E: Filterable>(&self, item: &E, now: DateTime<Utc>) -> bool {
        self.matches_search(item) && self.matches_exact(item) && self.matches_window(item, now)
    }

    fn matches_search<E: Filterable>(&self, item: &E) -> bool {
        if self.search_fields.is_empty() || self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        self.search_fields.iter().any(|field| {
            item.text_field(field)
                .map(|value| value.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    fn matches_exact<E: Filterable>(&self, item: &E) -> bool {
        self.exact_filters.iter().all(|(field, wanted)| {
            wanted.is_empty() || item.text_field(field) == Some(wanted.as_str())
        })
    }

    fn matches_window<E: Filterable>(&self, item: &E, now: DateTime<Utc>) -> bool {
        let (Some(field), Some(days)) = (self.date_field, self.window_days) else {
            return true;
        };
        let cutoff = now - Duration::days(days);
        item.time_field(field).map(|ts| ts >= cutoff).unwrap_or(false)
    }
}

/// Items matching `spec`, in their original order.
pub fn filter_entities<E>(items: &[E], spec: &FilterSpec, now: DateTime<Utc>) -> Vec<E>
where
    E: Filterable + Clone,
{
    items
        .iter()
        .filter(|item| spec.matches(*item, now))
        .cloned()
        .collect()
}

/// Distinct non-empty values of `field`, in first-seen order.
pub fn distinct_values<E: Filterable>(items: &[E], field: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if let Some(value) = item.text_field(field) {
            if !value.is_empty() && !seen.iter().any(|v| v == value) {
                seen.push(value.to_string());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        note: Option<&'static str>,
        kind: &'static str,
        at: DateTime<Utc>,
    }

    impl Filterable for Row {
        fn text_field(&self, field: &str) -> Option<&str> {
            match field {
                "name" => Some(self.name),
                "note" => self.note,
                "kind" => Some(self.kind),
                _ => None,
            }
        }

        fn time_field(&self, field: &str) -> Option<DateTime<Utc>> {
            (field == "at").then_some(self.at)
        }
    }

    fn now() -> DateTime<Utc> {
        "2025-01-15T12:00:00Z".parse().unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Chicken Biryani", note: Some("spicy"), kind: "Indian", at: now() - Duration::days(1) },
            Row { name: "Margherita Pizza", note: None, kind: "Italian", at: now() - Duration::days(10) },
            Row { name: "Beef Burger", note: Some("Cheese"), kind: "Fast Food", at: now() - Duration::hours(2) },
        ]
    }

    #[test]
    fn empty_spec_keeps_everything_in_order() {
        let out = filter_entities(&rows(), &FilterSpec::default(), now());
        assert_eq!(out, rows());
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let spec = FilterSpec::search(&["name", "note"], "CHEESE");
        let out = filter_entities(&rows(), &spec, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Beef Burger");
    }

    #[test]
    fn empty_term_matches_rows_without_the_field() {
        let spec = FilterSpec::search(&["note"], "");
        let out = filter_entities(&rows(), &spec, now());
        assert_eq!(out, rows());
    }

    #[test]
    fn absent_optional_field_never_matches_a_term() {
        let spec = FilterSpec::search(&["note"], "i");
        let out = filter_entities(&rows(), &spec, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Chicken Biryani");
    }

    #[test]
    fn exact_filter_with_empty_value_means_all() {
        let all = FilterSpec::default().exact("kind", "");
        assert_eq!(filter_entities(&rows(), &all, now()).len(), 3);

        let italian = FilterSpec::default().exact("kind", "Italian");
        let out = filter_entities(&rows(), &italian, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Margherita Pizza");
    }

    #[test]
    fn window_drops_older_entries() {
        let spec = FilterSpec::default().within_days("at", Some(7));
        let out = filter_entities(&rows(), &spec, now());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.name != "Margherita Pizza"));
    }

    #[test]
    fn criteria_combine_with_and() {
        let spec = FilterSpec::search(&["name"], "b")
            .exact("kind", "Indian")
            .within_days("at", Some(7));
        let out = filter_entities(&rows(), &spec, now());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Chicken Biryani");
    }

    #[test]
    fn filtering_is_idempotent() {
        let spec = FilterSpec::search(&["name"], "er").within_days("at", Some(30));
        let first = filter_entities(&rows(), &spec, now());
        let second = filter_entities(&rows(), &spec, now());
        assert_eq!(first, second);
        assert_eq!(filter_entities(&first, &spec, now()), first);
    }

    #[test]
    fn distinct_values_first_seen_order() {
        let mut items = rows();
        items.push(items[0].clone());
        assert_eq!(
            distinct_values(&items, "kind"),
            vec!["Indian", "Italian", "Fast Food"]
        );
    }
}
