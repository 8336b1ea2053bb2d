// Data models for inventory products and notifications
//
// Field names mirror the backend's JSON payloads.

use crate::record::{
    Record, deserialize_count, deserialize_id, deserialize_number, deserialize_opt_id, deserialize_opt_number,
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Inventory product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// SKU or barcode
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub marca: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub categoria_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub tienda_id: Option<String>,
    #[serde(default)]
    pub estado: ProductStatus,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub precio: f64,
    #[serde(default, deserialize_with = "deserialize_opt_number")]
    pub costo: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stock: i64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub stock_minimo: i64,
    #[serde(default)]
    pub destacado: bool,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    /// Last edit or stock movement
    #[serde(default)]
    pub fecha_actualizacion: Option<String>,
    #[serde(default)]
    pub fecha_vencimiento: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Activo,
    Inactivo,
    Agotado,
    Descontinuado,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductStatus::Activo => "activo",
            ProductStatus::Inactivo => "inactivo",
            ProductStatus::Agotado => "agotado",
            ProductStatus::Descontinuado => "descontinuado",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Product {
    /// Below the reorder threshold but not yet empty
    ///
    /// The same rule drives the `stock_bajo` filter and the
    /// `productos_bajo_stock` count.
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= self.stock_minimo
    }

    /// Nothing left on the shelf, whatever `estado` says
    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// Marked as sold out by the backend
    pub fn is_agotado(&self) -> bool {
        self.estado == ProductStatus::Agotado
    }

    /// Price times units on hand
    pub fn stock_value(&self) -> f64 {
        self.precio * self.stock as f64
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }

    fn tienda_id(&self) -> Option<&str> {
        self.tienda_id.as_deref()
    }

    fn collection_name() -> &'static str {
        "productos"
    }
}

/// Push/in-app notification sent to clients or staff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub mensaje: String,
    #[serde(default)]
    pub tipo: NotificationKind,
    #[serde(default)]
    pub estado: NotificationStatus,
    #[serde(default)]
    pub destinatario: Recipient,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub destinatario_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub tienda_id: Option<String>,
    #[serde(default)]
    pub fecha_creacion: Option<String>,
    #[serde(default)]
    pub fecha_programada: Option<String>,
    #[serde(default)]
    pub fecha_envio: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Promocion,
    Recordatorio,
    Cita,
    #[default]
    Sistema,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Promocion => "promocion",
            NotificationKind::Recordatorio => "recordatorio",
            NotificationKind::Cita => "cita",
            NotificationKind::Sistema => "sistema",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[default]
    Pendiente,
    Programada,
    Enviada,
    Leida,
    Fallida,
}

impl NotificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationStatus::Pendiente => "pendiente",
            NotificationStatus::Programada => "programada",
            NotificationStatus::Enviada => "enviada",
            NotificationStatus::Leida => "leida",
            NotificationStatus::Fallida => "fallida",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Audience of a notification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    #[default]
    Todos,
    Clientes,
    Empleados,
    /// A single client, see `destinatario_id`
    Cliente,
    /// A single employee, see `destinatario_id`
    Empleado,
}

impl Recipient {
    pub fn as_str(self) -> &'static str {
        match self {
            Recipient::Todos => "todos",
            Recipient::Clientes => "clientes",
            Recipient::Empleados => "empleados",
            Recipient::Cliente => "cliente",
            Recipient::Empleado => "empleado",
        }
    }
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl Notification {
    /// Has a valid scheduled date and has not gone out yet
    pub fn is_scheduled(&self) -> bool {
        matches!(self.estado, NotificationStatus::Pendiente | NotificationStatus::Programada)
            && self
                .fecha_programada
                .as_deref()
                .and_then(crate::dates::parse_datetime)
                .is_some()
    }
}

impl Record for Notification {
    fn id(&self) -> &str {
        &self.id
    }

    fn tienda_id(&self) -> Option<&str> {
        self.tienda_id.as_deref()
    }

    fn collection_name() -> &'static str {
        "notificaciones"
    }
}
