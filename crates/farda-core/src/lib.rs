use serde::{Deserialize, Serialize};

// Configuration types shared across all Farda crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    AuditConfig, ConfigError, DashboardConfig, DatabaseConfig, FardaConfig, SeedConfig,
    seed::SeedSchool,
};

use chrono::{DateTime, NaiveDate, Utc};

/// Clothing sizes carried for children's uniforms.
pub const CHILD_SIZES: &[&str] = &["2", "4", "6", "8", "10", "12"];

/// Clothing sizes carried for adult uniforms.
pub const ADULT_SIZES: &[&str] = &["PP", "P", "M", "G", "GG"];

/// All sizes, children first.
pub fn all_sizes() -> Vec<&'static str> {
    CHILD_SIZES.iter().chain(ADULT_SIZES.iter()).copied().collect()
}

/// User role. Gates which dashboard screens are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management and settings.
    Admin,
    /// Sales access: orders, clients, products, stock, reports.
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendor => "vendor",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "vendor" => Some(Role::Vendor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A school whose uniforms the shop produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
}

/// A customer who places uniform orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub registered_at: NaiveDate,
}

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Shirts,
    PantsShorts,
    Jackets,
    Accessories,
    Other,
}

impl ProductCategory {
    pub const ALL: &'static [ProductCategory] = &[
        ProductCategory::Shirts,
        ProductCategory::PantsShorts,
        ProductCategory::Jackets,
        ProductCategory::Accessories,
        ProductCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Shirts => "shirts",
            ProductCategory::PantsShorts => "pants_shorts",
            ProductCategory::Jackets => "jackets",
            ProductCategory::Accessories => "accessories",
            ProductCategory::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<ProductCategory> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }

    /// Human-readable label for the dashboard.
    pub fn label(&self) -> &'static str {
        match self {
            ProductCategory::Shirts => "Shirts",
            ProductCategory::PantsShorts => "Pants / Shorts",
            ProductCategory::Jackets => "Jackets",
            ProductCategory::Accessories => "Accessories",
            ProductCategory::Other => "Other",
        }
    }
}

/// A uniform item offered for a specific school.
///
/// A product is identified to buyers by (name, size, color) within a school;
/// that tuple is unique among active products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub size: String,
    pub color: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub min_stock: i64,
    pub description: Option<String>,
    pub school_id: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product is at or below its restock threshold.
    pub fn low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    InProduction,
    ReadyForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: &'static [OrderStatus] = &[
        OrderStatus::Pending,
        OrderStatus::InProduction,
        OrderStatus::ReadyForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProduction => "in_production",
            OrderStatus::ReadyForDelivery => "ready_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<OrderStatus> {
        Self::ALL.iter().copied().find(|st| st.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProduction => "In production",
            OrderStatus::ReadyForDelivery => "Ready for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    Transfer,
}

impl PaymentMethod {
    pub const ALL: &'static [PaymentMethod] = &[
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Pix,
        PaymentMethod::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Option<PaymentMethod> {
        Self::ALL.iter().copied().find(|p| p.as_str() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::DebitCard => "Debit card",
            PaymentMethod::Pix => "Pix",
            PaymentMethod::Transfer => "Bank transfer",
        }
    }
}

/// A placed uniform order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub school_id: i64,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
    pub delivered_at: Option<NaiveDate>,
    pub payment_method: PaymentMethod,
    pub total_quantity: i64,
    pub total_amount: f64,
    pub notes: Option<String>,
    /// User who entered the order.
    pub seller_id: Option<i64>,
}

/// One line of an order. Unit price is captured at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// A recorded change to a product's stock level.
///
/// Written for manual adjustments and for order placement/cancellation, so
/// the stock screen can show how a level came to be.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub delta: i64,
    pub reason: String,
    pub recorded_by: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("vendor"), Some(Role::Vendor));
        assert_eq!(Role::parse("root"), None);
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn test_payment_round_trip() {
        for method in PaymentMethod::ALL {
            assert_eq!(PaymentMethod::parse(method.as_str()), Some(*method));
        }
    }

    #[test]
    fn test_size_catalog() {
        let sizes = all_sizes();
        assert_eq!(sizes.len(), CHILD_SIZES.len() + ADULT_SIZES.len());
        assert_eq!(sizes.first(), Some(&"2"));
        assert_eq!(sizes.last(), Some(&"GG"));
    }

    #[test]
    fn test_low_stock() {
        let product = Product {
            id: 1,
            name: "Polo shirt".to_string(),
            category: ProductCategory::Shirts,
            size: "M".to_string(),
            color: Some("white".to_string()),
            price: 39.9,
            stock: 5,
            min_stock: 5,
            description: None,
            school_id: 1,
            active: true,
            created_at: Utc::now(),
        };
        assert!(product.low_stock());
    }
}
