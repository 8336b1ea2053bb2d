// Per-domain filter specs and the predicate evaluator

use crate::dates::DateRange;
use crate::models::{Notification, NotificationKind, NotificationStatus, Product, ProductStatus, Recipient};
use crate::text::{any_contains, search_needle};
use serde::{Deserialize, Serialize};

/// A structured set of optional constraints for one record type
///
/// Every present dimension must hold (AND); absent dimensions, blank
/// strings and `false` flags constrain nothing.
pub trait Filter<R> {
    /// Evaluate one record against every present dimension
    fn matches(&self, record: &R) -> bool;

    /// True when no dimension is constrained
    fn is_empty(&self) -> bool;
}

/// Evaluate `record` against `filter`
pub fn matches<R, F: Filter<R>>(record: &R, filter: &F) -> bool {
    filter.matches(record)
}

/// Categorical constraint, ignoring blank values from "all" select options
fn constraint(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn range_set(range: &Option<DateRange>) -> Option<&DateRange> {
    range.as_ref().filter(|r| !r.is_unbounded())
}

// ============================================================================
// Products
// ============================================================================

/// Filter for the inventory list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductFilter {
    /// Free text over nombre, descripcion, codigo and marca
    pub busqueda: Option<String>,
    pub categoria_id: Option<String>,
    pub estado: Option<ProductStatus>,
    pub marca: Option<String>,
    /// Only products at or under their minimum but not empty
    pub stock_bajo: bool,
    /// Only products with nothing on hand
    pub sin_stock: bool,
    pub destacados: bool,
    pub precio_min: Option<f64>,
    pub precio_max: Option<f64>,
    pub fecha_creacion: Option<DateRange>,
    pub fecha_vencimiento: Option<DateRange>,
}

impl Filter<Product> for ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = search_needle(self.busqueda.as_deref()) {
            let fields = [
                Some(product.nombre.as_str()),
                product.descripcion.as_deref(),
                product.codigo.as_deref(),
                product.marca.as_deref(),
            ];
            if !any_contains(&needle, &fields) {
                return false;
            }
        }

        if let Some(categoria) = constraint(&self.categoria_id) {
            if product.categoria_id.as_deref() != Some(categoria) {
                return false;
            }
        }

        if let Some(estado) = self.estado {
            if product.estado != estado {
                return false;
            }
        }

        if let Some(marca) = constraint(&self.marca) {
            if product.marca.as_deref() != Some(marca) {
                return false;
            }
        }

        if self.stock_bajo && !product.is_low_stock() {
            return false;
        }

        if self.sin_stock && !product.is_out_of_stock() {
            return false;
        }

        if self.destacados && !product.destacado {
            return false;
        }

        if let Some(min) = self.precio_min {
            if product.precio < min {
                return false;
            }
        }

        if let Some(max) = self.precio_max {
            if product.precio > max {
                return false;
            }
        }

        if let Some(range) = range_set(&self.fecha_creacion) {
            if !range.contains(product.fecha_creacion.as_deref()) {
                return false;
            }
        }

        if let Some(range) = range_set(&self.fecha_vencimiento) {
            if !range.contains(product.fecha_vencimiento.as_deref()) {
                return false;
            }
        }

        true
    }

    fn is_empty(&self) -> bool {
        search_needle(self.busqueda.as_deref()).is_none()
            && constraint(&self.categoria_id).is_none()
            && self.estado.is_none()
            && constraint(&self.marca).is_none()
            && !self.stock_bajo
            && !self.sin_stock
            && !self.destacados
            && self.precio_min.is_none()
            && self.precio_max.is_none()
            && range_set(&self.fecha_creacion).is_none()
            && range_set(&self.fecha_vencimiento).is_none()
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Filter for the notification list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationFilter {
    /// Free text over titulo and mensaje
    pub busqueda: Option<String>,
    pub tipo: Option<NotificationKind>,
    pub estado: Option<NotificationStatus>,
    pub destinatario: Option<Recipient>,
    pub destinatario_id: Option<String>,
    /// Only notifications waiting on a valid scheduled date
    pub programadas: bool,
    pub fecha_creacion: Option<DateRange>,
    pub fecha_programada: Option<DateRange>,
}

impl Filter<Notification> for NotificationFilter {
    fn matches(&self, notification: &Notification) -> bool {
        if let Some(needle) = search_needle(self.busqueda.as_deref()) {
            let fields = [Some(notification.titulo.as_str()), Some(notification.mensaje.as_str())];
            if !any_contains(&needle, &fields) {
                return false;
            }
        }

        if let Some(tipo) = self.tipo {
            if notification.tipo != tipo {
                return false;
            }
        }

        if let Some(estado) = self.estado {
            if notification.estado != estado {
                return false;
            }
        }

        if let Some(destinatario) = self.destinatario {
            if notification.destinatario != destinatario {
                return false;
            }
        }

        if let Some(destinatario_id) = constraint(&self.destinatario_id) {
            if notification.destinatario_id.as_deref() != Some(destinatario_id) {
                return false;
            }
        }

        if self.programadas && !notification.is_scheduled() {
            return false;
        }

        if let Some(range) = range_set(&self.fecha_creacion) {
            if !range.contains(notification.fecha_creacion.as_deref()) {
                return false;
            }
        }

        if let Some(range) = range_set(&self.fecha_programada) {
            if !range.contains(notification.fecha_programada.as_deref()) {
                return false;
            }
        }

        true
    }

    fn is_empty(&self) -> bool {
        search_needle(self.busqueda.as_deref()).is_none()
            && self.tipo.is_none()
            && self.estado.is_none()
            && self.destinatario.is_none()
            && constraint(&self.destinatario_id).is_none()
            && !self.programadas
            && range_set(&self.fecha_creacion).is_none()
            && range_set(&self.fecha_programada).is_none()
    }
}
