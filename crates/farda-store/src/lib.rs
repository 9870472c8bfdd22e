//! Postgres data layer for the Farda dashboard.
//!
//! One store per aggregate, all sharing a `PgPool`. Mutations that touch
//! stock run inside a transaction with row locks so concurrent orders can
//! never drive a product's stock negative.

pub mod clients;
pub mod error;
pub mod orders;
pub mod pool;
pub mod products;
pub mod reports;
pub mod schema;
pub mod schools;
pub mod stock;
pub mod users;

pub use clients::{ClientStore, NewClient};
pub use error::StoreError;
pub use orders::{NewOrder, NewOrderLine, OrderLineDetail, OrderStore, OrderSummary};
pub use pool::connect;
pub use products::{NewProduct, ProductStore, ProductWithSchool};
pub use reports::{OverviewMetrics, ReportStore, SchoolMetrics, SchoolSales};
pub use schema::ensure_schema;
pub use schools::SchoolStore;
pub use stock::{MovementDetail, StockStore};
pub use users::{NewUser, UserStore};
