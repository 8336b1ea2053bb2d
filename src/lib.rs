// salon-query - Filtering, sorting and aggregation over inventory and notification collections

pub mod aggregate;
pub mod config;
pub mod dates;
pub mod filter;
pub mod loader;
pub mod models;
pub mod query;
pub mod record;
pub mod sort;
pub mod text;

// Re-export main types for convenience
pub use aggregate::{Aggregate, InventoryStats, NotificationStats};
pub use config::Config;
pub use dates::DateRange;
pub use filter::{Filter, NotificationFilter, ProductFilter, matches};
pub use loader::load_collection;
pub use models::{Notification, NotificationKind, NotificationStatus, Product, ProductStatus, Recipient};
pub use query::{QueryContext, QueryResult, Queryable, query};
pub use record::Record;
pub use sort::{NotificationSortField, ProductSortField, SortDirection, SortKey, SortSpec, compare};
