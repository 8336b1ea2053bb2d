// Query orchestration: store scope -> filter -> sort -> aggregate

use crate::aggregate::{Aggregate, InventoryStats, NotificationStats};
use crate::filter::{Filter, NotificationFilter, ProductFilter};
use crate::models::{Notification, Product};
use crate::record::Record;
use crate::sort::{NotificationSortField, ProductSortField, SortKey, SortSpec, sort_records};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

/// Default width of the "recent movements" window, in days
pub const DEFAULT_VENTANA_DIAS: i64 = 7;

/// Caller-supplied state threaded into every query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryContext {
    /// Current store; records owned by other stores are excluded
    pub tienda_id: Option<String>,
    /// Reference instant for time-relative aggregates
    pub now: DateTime<Utc>,
    pub ventana_reciente: Duration,
}

impl QueryContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            tienda_id: None,
            now,
            ventana_reciente: Duration::days(DEFAULT_VENTANA_DIAS),
        }
    }

    pub fn with_tienda(mut self, tienda_id: impl Into<String>) -> Self {
        self.tienda_id = Some(tienda_id.into());
        self
    }

    pub fn with_ventana(mut self, ventana: Duration) -> Self {
        self.ventana_reciente = ventana;
        self
    }

    /// Records without an owner are shared by every store
    pub fn in_scope<R: Record>(&self, record: &R) -> bool {
        match (self.tienda_id.as_deref(), record.tienda_id()) {
            (Some(current), Some(owner)) => current == owner,
            _ => true,
        }
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// A record type the engine knows how to filter, sort and summarize
pub trait Queryable: Record {
    type Filter: Filter<Self> + Default;
    type SortField: SortKey<Self>;
    type Aggregates: Aggregate<Self>;
}

impl Queryable for Product {
    type Filter = ProductFilter;
    type SortField = ProductSortField;
    type Aggregates = InventoryStats;
}

impl Queryable for Notification {
    type Filter = NotificationFilter;
    type SortField = NotificationSortField;
    type Aggregates = NotificationStats;
}

/// Derived view: borrowed items in display order plus their summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult<'a, R, A> {
    pub items: Vec<&'a R>,
    pub aggregates: A,
}

impl<R, A> QueryResult<'_, R, A> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Run the full pipeline over an in-memory collection
///
/// The collection is only read. Aggregates are computed over the filtered
/// items; an empty filter with no sort yields the collection in input order.
pub fn query<'a, R: Queryable>(
    collection: &'a [R],
    filter: &R::Filter,
    sort: Option<&SortSpec<R::SortField>>,
    ctx: &QueryContext,
) -> QueryResult<'a, R, R::Aggregates> {
    let mut items: Vec<&R> = collection
        .iter()
        .filter(|record| ctx.in_scope(*record) && filter.matches(*record))
        .collect();

    sort_records(&mut items, sort);

    let aggregates = <R::Aggregates as Aggregate<R>>::aggregate(items.iter().copied(), ctx);

    debug!(
        collection = R::collection_name(),
        total = collection.len(),
        matched = items.len(),
        tienda = ?ctx.tienda_id,
        filtered = !filter.is_empty(),
        sorted = sort.is_some(),
        "query evaluated"
    );

    QueryResult { items, aggregates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::matches;
    use crate::models::NotificationStatus;
    use crate::sort::SortDirection;
    use chrono::TimeZone;
    use serde_json::json;

    fn ctx() -> QueryContext {
        QueryContext::new(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap())
    }

    fn inventory() -> Vec<Product> {
        serde_json::from_value(json!([
            {"id": 1, "nombre": "Shampoo", "estado": "activo", "stock": 5, "stock_minimo": 10, "precio": 8},
            {"id": 2, "nombre": "Acondicionador", "estado": "agotado", "stock": 0, "stock_minimo": 5, "precio": 9},
            {"id": 3, "nombre": "Mascarilla", "estado": "activo", "stock": 20, "stock_minimo": 5, "precio": 15}
        ]))
        .unwrap()
    }

    fn ids<R: Record>(items: &[&R]) -> Vec<String> {
        items.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_inventory_low_stock_scenario() {
        let products = inventory();
        let filter = ProductFilter {
            stock_bajo: true,
            ..Default::default()
        };

        let result = query(&products, &filter, None, &ctx());
        assert_eq!(ids(&result.items), vec!["1"]);
        assert_eq!(result.aggregates.total_productos, 1);

        let all = query(&products, &ProductFilter::default(), None, &ctx());
        assert_eq!(all.aggregates.productos_agotados, 1);
    }

    #[test]
    fn test_notification_scenario() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "estado": "pendiente"},
            {"id": "b", "estado": "enviada"},
            {"id": "c", "estado": "leida"}
        ]))
        .unwrap();

        let result = query(&notifications, &NotificationFilter::default(), None, &ctx());
        assert_eq!(result.len(), 3);
        assert_eq!(result.aggregates.total, 3);
        assert_eq!(result.aggregates.pendientes, 1);
        assert_eq!(result.aggregates.enviadas, 1);
        assert_eq!(result.aggregates.leidas, 1);
        assert_eq!(result.aggregates.tasa_apertura, 1.0);
    }

    #[test]
    fn test_no_filter_identity() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"id": 9}, {"id": 1}, {"id": 5}, {"id": 1}
        ]))
        .unwrap();

        let result = query(&products, &ProductFilter::default(), None, &ctx());
        let expected: Vec<&Product> = products.iter().collect();
        assert_eq!(result.items, expected);
    }

    #[test]
    fn test_idempotent() {
        let products = inventory();
        let filter = ProductFilter {
            estado: Some(crate::models::ProductStatus::Activo),
            ..Default::default()
        };
        let sort = SortSpec::desc(ProductSortField::Precio);

        let first = query(&products, &filter, Some(&sort), &ctx());
        let second = query(&products, &filter, Some(&sort), &ctx());
        assert_eq!(first, second);
        assert_eq!(products, inventory());
    }

    #[test]
    fn test_filter_narrowing() {
        let products = inventory();
        let filter = ProductFilter {
            busqueda: Some("a".to_string()),
            precio_min: Some(9.0),
            ..Default::default()
        };

        let result = query(&products, &filter, None, &ctx());
        assert!(result.len() <= products.len());
        assert!(!result.is_empty());
        for item in &result.items {
            assert!(matches(*item, &filter));
            assert!(products.iter().any(|p| std::ptr::eq(p, *item)));
        }
    }

    #[test]
    fn test_sort_correctness_and_aggregate_consistency() {
        let products = inventory();
        let sort = SortSpec {
            field: ProductSortField::Stock,
            direction: SortDirection::Asc,
        };

        let result = query(&products, &ProductFilter::default(), Some(&sort), &ctx());
        for pair in result.items.windows(2) {
            assert!(pair[0].stock <= pair[1].stock);
        }
        assert_eq!(result.aggregates.total_productos, result.items.len());
        assert_eq!(ids(&result.items), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_stability_on_equal_keys() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "b", "estado": "enviada"},
            {"id": "a", "estado": "enviada"},
            {"id": "c", "estado": "leida"}
        ]))
        .unwrap();
        let sort = SortSpec::asc(NotificationSortField::Estado);

        let result = query(&notifications, &NotificationFilter::default(), Some(&sort), &ctx());
        assert_eq!(ids(&result.items), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_aggregates_follow_filter() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "estado": "pendiente", "tipo": "cita"},
            {"id": "b", "estado": "enviada", "tipo": "promocion"},
            {"id": "c", "estado": "leida", "tipo": "promocion"}
        ]))
        .unwrap();
        let filter = NotificationFilter {
            tipo: Some(crate::models::NotificationKind::Promocion),
            ..Default::default()
        };

        let result = query(&notifications, &filter, None, &ctx());
        assert_eq!(result.aggregates.total, 2);
        assert_eq!(result.aggregates.pendientes, 0);
        assert_eq!(result.aggregates.total, result.len());
    }

    #[test]
    fn test_empty_collection() {
        let products: Vec<Product> = Vec::new();
        let result = query(&products, &ProductFilter::default(), None, &ctx());
        assert!(result.is_empty());
        assert_eq!(result.aggregates, InventoryStats::default());

        let notifications: Vec<Notification> = Vec::new();
        let sort = SortSpec::asc(NotificationSortField::FechaCreacion);
        let result = query(&notifications, &NotificationFilter::default(), Some(&sort), &ctx());
        assert!(result.is_empty());
        assert_eq!(result.aggregates.tasa_apertura, 0.0);
    }

    #[test]
    fn test_store_scope() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "tienda_id": 1, "estado": "pendiente"},
            {"id": "b", "tienda_id": 2, "estado": "enviada"},
            {"id": "c", "estado": "leida"}
        ]))
        .unwrap();

        let scoped = query(&notifications, &NotificationFilter::default(), None, &ctx().with_tienda("1"));
        assert_eq!(ids(&scoped.items), vec!["a", "c"]);
        assert_eq!(scoped.aggregates.enviadas, 0);
        assert_eq!(scoped.aggregates.leidas, 1);

        let unscoped = query(&notifications, &NotificationFilter::default(), None, &ctx());
        assert_eq!(unscoped.len(), 3);
    }

    #[test]
    fn test_clear_filters_restores_full_view() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "estado": "pendiente"},
            {"id": "b", "estado": "enviada"}
        ]))
        .unwrap();
        let narrowed = NotificationFilter {
            estado: Some(NotificationStatus::Enviada),
            ..Default::default()
        };

        assert_eq!(query(&notifications, &narrowed, None, &ctx()).len(), 1);
        assert_eq!(query(&notifications, &NotificationFilter::default(), None, &ctx()).len(), 2);
    }

    #[test]
    fn test_result_serializes_items_and_aggregates() {
        let products = inventory();
        let result = query(&products, &ProductFilter::default(), None, &ctx());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 3);
        assert_eq!(value["items"][0]["id"], "1");
        assert_eq!(value["aggregates"]["productos_bajo_stock"], 1);
    }
}
