//! Web dashboard for the Farda uniform-order system.
//!
//! Server-rendered HTML over axum: login with cookie sessions, role-gated
//! navigation, and screens for orders, clients, products, stock, and reports.

pub mod assets;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod pages_extra;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::DashboardError;
pub use server::DashboardServer;
pub use state::{AppState, SessionUser};
