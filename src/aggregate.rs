// Summary statistics over a filtered collection

use crate::dates::within_window;
use crate::models::{Notification, NotificationStatus, Product};
use crate::query::QueryContext;
use serde::{Deserialize, Serialize};

/// Fixed-shape summary computed from a set of records
///
/// Implementations never fail: missing numbers count as zero and rates
/// guard their denominators.
pub trait Aggregate<R>: Sized {
    fn aggregate<'a>(records: impl IntoIterator<Item = &'a R>, ctx: &QueryContext) -> Self
    where
        R: 'a;
}

/// Inventory screen summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryStats {
    pub total_productos: usize,
    /// Sum of precio * stock
    pub valor_inventario: f64,
    pub productos_agotados: usize,
    pub productos_bajo_stock: usize,
    /// Products touched within the context's recent window
    pub movimientos_recientes: usize,
}

impl Aggregate<Product> for InventoryStats {
    fn aggregate<'a>(records: impl IntoIterator<Item = &'a Product>, ctx: &QueryContext) -> Self
    where
        Product: 'a,
    {
        let mut stats = Self::default();
        for product in records {
            stats.total_productos += 1;
            stats.valor_inventario += product.stock_value();
            if product.is_agotado() {
                stats.productos_agotados += 1;
            }
            if product.is_low_stock() {
                stats.productos_bajo_stock += 1;
            }
            if within_window(product.fecha_actualizacion.as_deref(), ctx.now, ctx.ventana_reciente) {
                stats.movimientos_recientes += 1;
            }
        }
        stats
    }
}

/// Notification screen summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total: usize,
    pub pendientes: usize,
    pub enviadas: usize,
    pub leidas: usize,
    /// leidas / max(enviadas, 1)
    pub tasa_apertura: f64,
}

impl Aggregate<Notification> for NotificationStats {
    fn aggregate<'a>(records: impl IntoIterator<Item = &'a Notification>, _ctx: &QueryContext) -> Self
    where
        Notification: 'a,
    {
        let mut stats = Self::default();
        for notification in records {
            stats.total += 1;
            match notification.estado {
                NotificationStatus::Pendiente => stats.pendientes += 1,
                NotificationStatus::Enviada => stats.enviadas += 1,
                NotificationStatus::Leida => stats.leidas += 1,
                NotificationStatus::Programada | NotificationStatus::Fallida => {}
            }
        }
        stats.tasa_apertura = stats.leidas as f64 / stats.enviadas.max(1) as f64;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn ctx() -> QueryContext {
        QueryContext::new(Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_inventory_stats() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"id": 1, "estado": "activo", "precio": 10, "stock": 5, "stock_minimo": 10,
             "fecha_actualizacion": "2024-03-14T09:00:00Z"},
            {"id": 2, "estado": "agotado", "precio": 99, "stock": 0, "stock_minimo": 5},
            {"id": 3, "estado": "activo", "precio": "2.5", "stock": 20, "stock_minimo": 5,
             "fecha_actualizacion": "2024-01-01"}
        ]))
        .unwrap();

        let stats = InventoryStats::aggregate(&products, &ctx());
        assert_eq!(stats.total_productos, 3);
        assert_eq!(stats.valor_inventario, 100.0);
        assert_eq!(stats.productos_agotados, 1);
        assert_eq!(stats.productos_bajo_stock, 1);
        assert_eq!(stats.movimientos_recientes, 1);
    }

    #[test]
    fn test_recent_window_follows_context() {
        let products: Vec<Product> = serde_json::from_value(json!([
            {"id": 1, "fecha_actualizacion": "2024-03-01T12:00:00Z"}
        ]))
        .unwrap();

        let narrow = InventoryStats::aggregate(&products, &ctx());
        assert_eq!(narrow.movimientos_recientes, 0);

        let wide = InventoryStats::aggregate(&products, &ctx().with_ventana(Duration::days(30)));
        assert_eq!(wide.movimientos_recientes, 1);
    }

    #[test]
    fn test_notification_stats() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "estado": "pendiente"},
            {"id": "b", "estado": "enviada"},
            {"id": "c", "estado": "leida"}
        ]))
        .unwrap();

        let stats = NotificationStats::aggregate(&notifications, &ctx());
        assert_eq!(
            stats,
            NotificationStats {
                total: 3,
                pendientes: 1,
                enviadas: 1,
                leidas: 1,
                tasa_apertura: 1.0,
            }
        );
    }

    #[test]
    fn test_open_rate_without_sent() {
        let notifications: Vec<Notification> = serde_json::from_value(json!([
            {"id": "a", "estado": "leida"},
            {"id": "b", "estado": "leida"},
            {"id": "c", "estado": "fallida"}
        ]))
        .unwrap();

        let stats = NotificationStats::aggregate(&notifications, &ctx());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.enviadas, 0);
        assert_eq!(stats.tasa_apertura, 2.0);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let inventory = InventoryStats::aggregate(&Vec::<Product>::new(), &ctx());
        assert_eq!(inventory, InventoryStats::default());

        let notifications = NotificationStats::aggregate(&Vec::<Notification>::new(), &ctx());
        assert_eq!(notifications, NotificationStats::default());
        assert_eq!(notifications.tasa_apertura, 0.0);
        assert!(!notifications.tasa_apertura.is_nan());
    }
}
