//! Request handlers for the dashboard.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::error::DashboardError;
use crate::pages;
use crate::pages_extra;
use crate::state::{AppState, SessionUser};

// =============================================================================
// Page Handlers (HTML responses)
// =============================================================================

/// Handler for the dashboard home page.
pub async fn home(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let metrics = state.reports().overview().await?;
    let status_counts = state.reports().orders_by_status().await?;
    let school_metrics = state.reports().per_school().await?;

    Ok(Html(pages::home_page(
        &user,
        state.config().project_name(),
        &metrics,
        &status_counts,
        &school_metrics,
    )))
}

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    /// School filter; an empty string means "all".
    #[serde(default)]
    pub school: Option<String>,
}

/// Handler for the orders listing.
pub async fn orders(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(params): Query<OrderListParams>,
) -> Result<Html<String>, DashboardError> {
    let school_filter = params.school.as_deref().and_then(|s| s.parse::<i64>().ok());
    let orders = state.orders().list(school_filter).await?;
    let schools = state.schools().list(true).await?;

    Ok(Html(pages::orders_page(
        &user,
        state.config().project_name(),
        &orders,
        &schools,
        school_filter,
    )))
}

/// Handler for the new-order form.
pub async fn order_new(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let clients = state.clients().list().await?;
    let schools = state.schools().list(true).await?;
    let products = state.products().list(None, true).await?;

    Ok(Html(pages::new_order_page(
        &user,
        state.config().project_name(),
        &clients,
        &schools,
        &products,
    )))
}

/// Handler for an order's detail page.
pub async fn order_detail(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i64>,
) -> Result<Html<String>, DashboardError> {
    let summary = state.orders().get(id).await?;
    let lines = state.orders().lines(id).await?;

    Ok(Html(pages::order_detail_page(
        &user,
        state.config().project_name(),
        &summary,
        &lines,
    )))
}

/// Handler for the clients screen.
pub async fn clients(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let clients = state.clients().list().await?;
    Ok(Html(pages::clients_page(
        &user,
        state.config().project_name(),
        &clients,
    )))
}

/// Handler for the products screen.
pub async fn products(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let products = state.products().list(None, true).await?;
    let schools = state.schools().list(true).await?;
    Ok(Html(pages::products_page(
        &user,
        state.config().project_name(),
        &products,
        &schools,
    )))
}

/// Handler for the stock screen.
pub async fn stock(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let products = state.products().list(None, true).await?;
    let movements = state.stock().recent_movements(50).await?;
    Ok(Html(pages_extra::stock_page(
        &user,
        state.config().project_name(),
        &products,
        &movements,
    )))
}

/// Handler for the reports screen.
pub async fn reports(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let metrics = state.reports().overview().await?;
    let status_counts = state.reports().orders_by_status().await?;
    let school_metrics = state.reports().per_school().await?;
    let sales = state.reports().sales_by_school().await?;

    Ok(Html(pages_extra::reports_page(
        &user,
        state.config().project_name(),
        &metrics,
        &status_counts,
        &school_metrics,
        &sales,
    )))
}

/// Handler for the change-password screen.
pub async fn password(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Html<String> {
    Html(pages_extra::password_page(&user, state.config().project_name()))
}

/// Handler for the user management screen (admin only).
pub async fn users(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let users = state.users().list().await?;
    Ok(Html(pages_extra::users_page(
        &user,
        state.config().project_name(),
        &users,
    )))
}

/// Handler for the settings screen (admin only).
pub async fn settings(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Html<String>, DashboardError> {
    let schools = state.schools().list(false).await?;
    Ok(Html(pages_extra::settings_page(
        &user,
        state.config().project_name(),
        state.config(),
        &schools,
    )))
}

// =============================================================================
// API Handlers (form/JSON mutations)
// =============================================================================

pub mod api {
    use super::*;
    use axum::{Form, Json};
    use chrono::NaiveDate;
    use farda_core::{OrderStatus, PaymentMethod, ProductCategory, Role};
    use farda_store::{NewClient, NewOrder, NewOrderLine, NewProduct, NewUser};

    fn none_if_empty(s: Option<String>) -> Option<String> {
        s.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn parse_date(s: Option<String>) -> Result<Option<NaiveDate>, DashboardError> {
        match none_if_empty(s) {
            None => Ok(None),
            Some(v) => NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| DashboardError::InvalidRequest(format!("invalid date '{v}'"))),
        }
    }

    fn toast_reload(message: &str) -> Html<String> {
        Html(format!(
            r#"<script>showToast('{message}'); setTimeout(() => window.location.reload(), 600);</script>"#
        ))
    }

    fn toast_redirect(message: &str, href: &str) -> Html<String> {
        Html(format!(
            r#"<script>showToast('{message}'); setTimeout(() => window.location.href='{href}', 600);</script>"#
        ))
    }

    // -------------------------------------------------------------------------
    // Clients
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct ClientForm {
        pub name: String,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub address: Option<String>,
        #[serde(default)]
        pub birth_date: Option<String>,
    }

    pub async fn client_create(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<ClientForm>,
    ) -> Result<Html<String>, DashboardError> {
        let client = state
            .clients()
            .create(NewClient {
                name: form.name,
                phone: none_if_empty(form.phone),
                email: none_if_empty(form.email),
                address: none_if_empty(form.address),
                birth_date: parse_date(form.birth_date)?,
            })
            .await?;

        let _ = state.audit().log_client_created(&user.username, client.id).await;
        Ok(toast_reload("Client registered"))
    }

    pub async fn client_delete(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Path(id): Path<i64>,
    ) -> Result<Html<String>, DashboardError> {
        state.clients().delete(id).await?;
        let _ = state.audit().log_client_deleted(&user.username, id).await;
        Ok(toast_reload("Client deleted"))
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct ProductForm {
        pub name: String,
        pub category: String,
        pub size: String,
        #[serde(default)]
        pub color: Option<String>,
        pub price: f64,
        pub stock: i64,
        pub min_stock: i64,
        #[serde(default)]
        pub description: Option<String>,
        pub school_id: i64,
    }

    pub async fn product_create(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<ProductForm>,
    ) -> Result<Html<String>, DashboardError> {
        let category = ProductCategory::parse(&form.category).ok_or_else(|| {
            DashboardError::InvalidRequest(format!("unknown category '{}'", form.category))
        })?;

        let product = state
            .products()
            .create(NewProduct {
                name: form.name,
                category,
                size: form.size,
                color: none_if_empty(form.color),
                price: form.price,
                stock: form.stock,
                min_stock: form.min_stock,
                description: none_if_empty(form.description),
                school_id: form.school_id,
            })
            .await?;

        let _ = state.audit().log_product_created(&user.username, product.id).await;
        Ok(toast_reload("Product registered"))
    }

    pub async fn product_deactivate(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Path(id): Path<i64>,
    ) -> Result<Html<String>, DashboardError> {
        state.products().deactivate(id).await?;
        let _ = state.audit().log_product_retired(&user.username, id).await;
        Ok(toast_reload("Product retired"))
    }

    // -------------------------------------------------------------------------
    // Stock
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct StockAdjustForm {
        pub product_id: i64,
        pub delta: i64,
        pub reason: String,
    }

    pub async fn stock_adjust(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<StockAdjustForm>,
    ) -> Result<Html<String>, DashboardError> {
        state
            .stock()
            .adjust(form.product_id, form.delta, &form.reason, Some(&user.username))
            .await?;

        let _ = state
            .audit()
            .log_stock_adjusted(&user.username, form.product_id, form.delta, &form.reason)
            .await;
        Ok(toast_reload("Stock adjusted"))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct PlaceOrderRequest {
        pub client_id: i64,
        pub school_id: i64,
        pub payment_method: String,
        #[serde(default)]
        pub expected_delivery: Option<String>,
        #[serde(default)]
        pub notes: Option<String>,
        pub lines: Vec<PlaceOrderLine>,
    }

    #[derive(Debug, Deserialize)]
    pub struct PlaceOrderLine {
        pub product_id: i64,
        pub quantity: i64,
    }

    pub async fn order_place(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Json(req): Json<PlaceOrderRequest>,
    ) -> Result<Json<serde_json::Value>, DashboardError> {
        let payment_method = PaymentMethod::parse(&req.payment_method).ok_or_else(|| {
            DashboardError::InvalidRequest(format!(
                "unknown payment method '{}'",
                req.payment_method
            ))
        })?;

        let seller_id = state
            .users()
            .find_active(&user.username)
            .await?
            .map(|u| u.id);

        let order = state
            .orders()
            .create(
                NewOrder {
                    client_id: req.client_id,
                    school_id: req.school_id,
                    expected_delivery: parse_date(req.expected_delivery)?,
                    payment_method,
                    notes: none_if_empty(req.notes),
                    seller_id,
                    lines: req
                        .lines
                        .into_iter()
                        .map(|l| NewOrderLine {
                            product_id: l.product_id,
                            quantity: l.quantity,
                        })
                        .collect(),
                },
                Some(&user.username),
            )
            .await?;

        let _ = state
            .audit()
            .log_order_placed(
                &user.username,
                order.id,
                order.total_quantity,
                order.total_amount,
            )
            .await;

        Ok(Json(serde_json::json!({ "id": order.id })))
    }

    #[derive(Debug, Deserialize)]
    pub struct StatusForm {
        pub status: String,
    }

    pub async fn order_status(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Path(id): Path<i64>,
        Form(form): Form<StatusForm>,
    ) -> Result<Html<String>, DashboardError> {
        let status = OrderStatus::parse(&form.status).ok_or_else(|| {
            DashboardError::InvalidRequest(format!("unknown status '{}'", form.status))
        })?;

        state
            .orders()
            .set_status(id, status, Some(&user.username))
            .await?;

        let _ = state
            .audit()
            .log_order_status_changed(&user.username, id, status.as_str())
            .await;
        Ok(toast_reload("Order status updated"))
    }

    pub async fn order_delete(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Path(id): Path<i64>,
    ) -> Result<Html<String>, DashboardError> {
        state.orders().delete(id, Some(&user.username)).await?;
        let _ = state.audit().log_order_deleted(&user.username, id).await;
        Ok(toast_redirect("Order deleted, stock restored", "/orders"))
    }

    // -------------------------------------------------------------------------
    // Account
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct PasswordForm {
        pub current_password: String,
        pub new_password: String,
        pub confirm_password: String,
    }

    pub async fn password_change(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<PasswordForm>,
    ) -> Result<Html<String>, DashboardError> {
        if form.new_password != form.confirm_password {
            return Err(DashboardError::InvalidRequest(
                "new passwords do not match".to_string(),
            ));
        }

        state
            .users()
            .change_password(&user.username, &form.current_password, &form.new_password)
            .await?;

        let _ = state.audit().log_password_changed(&user.username).await;
        Ok(toast_reload("Password changed"))
    }

    // -------------------------------------------------------------------------
    // Admin: users and schools
    // -------------------------------------------------------------------------

    #[derive(Debug, Deserialize)]
    pub struct UserForm {
        pub username: String,
        pub password: String,
        pub display_name: String,
        pub role: String,
    }

    pub async fn user_create(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<UserForm>,
    ) -> Result<Html<String>, DashboardError> {
        let role = Role::parse(&form.role).ok_or_else(|| {
            DashboardError::InvalidRequest(format!("unknown role '{}'", form.role))
        })?;

        let created = state
            .users()
            .create(NewUser {
                username: form.username,
                password: form.password,
                display_name: form.display_name,
                role,
            })
            .await?;

        let _ = state
            .audit()
            .log_user_created(&user.username, &created.username)
            .await;
        Ok(toast_reload("User created"))
    }

    #[derive(Debug, Deserialize)]
    pub struct SchoolForm {
        pub name: String,
        #[serde(default)]
        pub address: Option<String>,
        #[serde(default)]
        pub phone: Option<String>,
    }

    pub async fn school_create(
        State(state): State<AppState>,
        Extension(user): Extension<SessionUser>,
        Form(form): Form<SchoolForm>,
    ) -> Result<Html<String>, DashboardError> {
        let address = none_if_empty(form.address);
        let phone = none_if_empty(form.phone);
        let school = state
            .schools()
            .create(&form.name, address.as_deref(), phone.as_deref())
            .await?;
        let _ = state.audit().log_school_created(&user.username, school.id).await;
        Ok(toast_reload("School added"))
    }
}
