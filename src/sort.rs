// Single-key sorting with a deterministic id tie-break

use crate::dates::parse_datetime;
use crate::models::{Notification, Product};
use crate::record::Record;
use crate::text::compare_text;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Active sort: one field and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec<F> {
    pub field: F,
    #[serde(default)]
    pub direction: SortDirection,
}

impl<F> SortSpec<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// A sortable field of record type `R`
pub trait SortKey<R>: Copy {
    /// Ascending comparison on this field alone
    fn compare(self, a: &R, b: &R) -> Ordering;
}

/// Compare two records under an optional sort spec
///
/// Without a spec every pair is equal. With one, the field comparison
/// (flipped for descending) is tie-broken by ascending id regardless of
/// direction, so the order is total.
pub fn compare<R, F>(a: &R, b: &R, sort: Option<&SortSpec<F>>) -> Ordering
where
    R: Record,
    F: SortKey<R>,
{
    let Some(spec) = sort else {
        return Ordering::Equal;
    };

    spec.direction
        .apply(spec.field.compare(a, b))
        .then_with(|| compare_ids(a.id(), b.id()))
}

/// Sort records in place; a no-op when `sort` is None
pub fn sort_records<R, F>(records: &mut [&R], sort: Option<&SortSpec<F>>)
where
    R: Record,
    F: SortKey<R>,
{
    if sort.is_none() {
        return;
    }
    records.sort_by(|a, b| compare(*a, *b, sort));
}

/// Integer ids first in numeric order, then the rest lexically
///
/// Equivalent to ordering by `(is_not_integer, parsed, raw)`, so mixed id
/// sets still get a total order.
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    let ranked = match (a.parse::<i64>().ok(), b.parse::<i64>().ok()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    ranked.then_with(|| a.cmp(b))
}

/// Dates by instant; missing or unparseable values sort first
pub fn compare_dates(a: Option<&str>, b: Option<&str>) -> Ordering {
    a.and_then(parse_datetime).cmp(&b.and_then(parse_datetime))
}

fn compare_opt_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    compare_text(a.unwrap_or_default(), b.unwrap_or_default())
}

// ============================================================================
// Field sets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ProductSortField {
    Nombre,
    Precio,
    Stock,
    FechaCreacion,
    FechaActualizacion,
    Categoria,
}

impl SortKey<Product> for ProductSortField {
    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSortField::Nombre => compare_text(&a.nombre, &b.nombre),
            ProductSortField::Precio => a.precio.total_cmp(&b.precio),
            ProductSortField::Stock => a.stock.cmp(&b.stock),
            ProductSortField::FechaCreacion => {
                compare_dates(a.fecha_creacion.as_deref(), b.fecha_creacion.as_deref())
            }
            ProductSortField::FechaActualizacion => {
                compare_dates(a.fecha_actualizacion.as_deref(), b.fecha_actualizacion.as_deref())
            }
            ProductSortField::Categoria => compare_opt_text(a.categoria_id.as_deref(), b.categoria_id.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum NotificationSortField {
    Titulo,
    Estado,
    FechaCreacion,
    FechaProgramada,
}

impl SortKey<Notification> for NotificationSortField {
    fn compare(self, a: &Notification, b: &Notification) -> Ordering {
        match self {
            NotificationSortField::Titulo => compare_text(&a.titulo, &b.titulo),
            NotificationSortField::Estado => a.estado.as_str().cmp(b.estado.as_str()),
            NotificationSortField::FechaCreacion => {
                compare_dates(a.fecha_creacion.as_deref(), b.fecha_creacion.as_deref())
            }
            NotificationSortField::FechaProgramada => {
                compare_dates(a.fecha_programada.as_deref(), b.fecha_programada.as_deref())
            }
        }
    }
}
