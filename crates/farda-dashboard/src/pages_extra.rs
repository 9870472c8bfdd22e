//! Page builders for the stock, reports, account, and admin screens.

use farda_core::{FardaConfig, Role, School, User};
use farda_store::{
    MovementDetail, OverviewMetrics, ProductWithSchool, SchoolMetrics, SchoolSales,
};

use crate::state::SessionUser;
use crate::templates::{
    badge, card, empty_state, format_money, html_escape, input, layout, select, status_badge,
    table,
};

/// Stock screen: current levels, manual adjustment form, recent movements.
pub fn stock_page(
    user: &SessionUser,
    project: &str,
    products: &[ProductWithSchool],
    movements: &[MovementDetail],
) -> String {
    let product_options: Vec<(String, String, bool)> = products
        .iter()
        .filter(|p| p.product.active)
        .map(|p| {
            (
                p.product.id.to_string(),
                format!(
                    "{} — {} ({}, {} in stock)",
                    p.product.name, p.product.size, p.school_name, p.product.stock
                ),
                false,
            )
        })
        .collect();

    let adjust_form = format!(
        r##"<form hx-post="/api/stock/adjust" hx-target="#action-result" class="grid grid-cols-1 md:grid-cols-3 gap-4">
            <div class="md:col-span-3">{product}</div>
            {delta}
            <div class="md:col-span-2">{reason}</div>
            <div class="md:col-span-3">
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-right-left mr-2"></i>Apply adjustment
                </button>
            </div>
        </form>
        <p class="mt-3 text-sm text-slate-500">
            Use a positive delta for units received, a negative one for losses.
            An adjustment that would take stock below zero is rejected.
        </p>
        <div id="action-result"></div>"##,
        product = select("product_id", "Product", &product_options),
        delta = input("delta", "Delta", "number", "", "+10 or -3"),
        reason = input("reason", "Reason", "text", "", "inventory recount"),
    );

    let levels = if products.is_empty() {
        empty_state("boxes-stacked", "No products yet", "Register products first.", None)
    } else {
        let rows: Vec<Vec<String>> = products
            .iter()
            .map(|p| {
                let level = if p.product.low_stock() {
                    format!("{} {}", p.product.stock, badge("restock", "red"))
                } else {
                    p.product.stock.to_string()
                };
                vec![
                    html_escape(&p.product.name),
                    html_escape(&p.product.size),
                    html_escape(&p.school_name),
                    level,
                    p.product.min_stock.to_string(),
                ]
            })
            .collect();
        table(&["Product", "Size", "School", "Stock", "Minimum"], &rows)
    };

    let history = if movements.is_empty() {
        empty_state("clock-rotate-left", "No movements yet", "Stock changes appear here.", None)
    } else {
        let rows: Vec<Vec<String>> = movements
            .iter()
            .map(|m| {
                let delta = if m.movement.delta >= 0 {
                    format!(r#"<span class="text-emerald-600 font-medium">+{}</span>"#, m.movement.delta)
                } else {
                    format!(r#"<span class="text-red-600 font-medium">{}</span>"#, m.movement.delta)
                };
                vec![
                    m.movement.recorded_at.format("%Y-%m-%d %H:%M").to_string(),
                    format!("{} — {}", html_escape(&m.product_name), html_escape(&m.product_size)),
                    delta,
                    html_escape(&m.movement.reason),
                    m.movement
                        .recorded_by
                        .as_deref()
                        .map(html_escape)
                        .unwrap_or_else(|| "—".to_string()),
                ]
            })
            .collect();
        table(&["When", "Product", "Delta", "Reason", "By"], &rows)
    };

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Stock</h1>
        <div class="space-y-6">
            {adjust_card}
            {levels_card}
            {history_card}
        </div>"##,
        adjust_card = card("Manual adjustment", &adjust_form),
        levels_card = card("Current levels", &levels),
        history_card = card("Recent movements", &history),
    );

    layout("Stock", project, user, &content)
}

/// Reports screen: overview numbers, status distribution, per-school
/// roll-ups, delivered revenue ranking.
pub fn reports_page(
    user: &SessionUser,
    project: &str,
    metrics: &OverviewMetrics,
    status_counts: &[(farda_core::OrderStatus, i64)],
    school_metrics: &[SchoolMetrics],
    sales: &[SchoolSales],
) -> String {
    let summary = format!(
        r##"<dl class="grid grid-cols-2 md:grid-cols-5 gap-4 text-sm">
            <div><dt class="text-slate-500">Orders</dt><dd class="text-xl font-bold">{orders}</dd></div>
            <div><dt class="text-slate-500">Pending</dt><dd class="text-xl font-bold">{pending}</dd></div>
            <div><dt class="text-slate-500">Clients</dt><dd class="text-xl font-bold">{clients}</dd></div>
            <div><dt class="text-slate-500">Low stock</dt><dd class="text-xl font-bold">{low}</dd></div>
            <div><dt class="text-slate-500">Delivered sales</dt><dd class="text-xl font-bold">{sales}</dd></div>
        </dl>"##,
        orders = metrics.total_orders,
        pending = metrics.pending_orders,
        clients = metrics.total_clients,
        low = metrics.low_stock_products,
        sales = format_money(metrics.delivered_sales),
    );

    let total: i64 = status_counts.iter().map(|(_, n)| n).sum();
    let status_rows: Vec<Vec<String>> = status_counts
        .iter()
        .map(|(status, count)| {
            let share = if total > 0 {
                format!("{:.0}%", *count as f64 * 100.0 / total as f64)
            } else {
                "—".to_string()
            };
            vec![status_badge(*status), count.to_string(), share]
        })
        .collect();
    let status_table = table(&["Status", "Orders", "Share"], &status_rows);

    let school_rows: Vec<Vec<String>> = school_metrics
        .iter()
        .map(|m| {
            vec![
                html_escape(&m.school_name),
                m.orders.to_string(),
                m.pending_orders.to_string(),
                m.products.to_string(),
                m.low_stock_products.to_string(),
            ]
        })
        .collect();
    let school_table = table(
        &["School", "Orders", "Pending", "Products", "Low stock"],
        &school_rows,
    );

    let sales_rows: Vec<Vec<String>> = sales
        .iter()
        .map(|s| {
            vec![
                html_escape(&s.school_name),
                s.delivered_orders.to_string(),
                format_money(s.delivered_sales),
            ]
        })
        .collect();
    let sales_table = table(&["School", "Delivered orders", "Revenue"], &sales_rows);

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Reports</h1>
        <div class="space-y-6">
            {summary_card}
            <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
                {status_card}
                {sales_card}
            </div>
            {school_card}
        </div>"##,
        summary_card = card("Summary", &summary),
        status_card = card("Orders by status", &status_table),
        sales_card = card("Delivered revenue by school", &sales_table),
        school_card = card("By school", &school_table),
    );

    layout("Reports", project, user, &content)
}

/// Change-password screen, available to every logged-in user.
pub fn password_page(user: &SessionUser, project: &str) -> String {
    let form = format!(
        r##"<form hx-post="/api/password" hx-target="#action-result" class="max-w-md space-y-4">
            {current}
            {replacement}
            {confirm}
            <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                <i class="fas fa-key mr-2"></i>Change password
            </button>
        </form>
        <p class="mt-3 text-sm text-slate-500">
            At least 8 characters with an uppercase letter, a lowercase letter, and a digit.
        </p>
        <div id="action-result"></div>"##,
        current = input("current_password", "Current password", "password", "", ""),
        replacement = input("new_password", "New password", "password", "", ""),
        confirm = input("confirm_password", "Confirm new password", "password", "", ""),
    );

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Account</h1>
        {card}"##,
        card = card("Change password", &form),
    );

    layout("Account", project, user, &content)
}

/// User management (admin only): creation form + listing.
pub fn users_page(user: &SessionUser, project: &str, users: &[User]) -> String {
    let role_options: Vec<(String, String, bool)> = [Role::Vendor, Role::Admin]
        .iter()
        .map(|r| (r.as_str().to_string(), r.as_str().to_string(), *r == Role::Vendor))
        .collect();

    let form = format!(
        r##"<form hx-post="/api/users" hx-target="#action-result" class="grid grid-cols-1 md:grid-cols-2 gap-4">
            {username}
            {display_name}
            {password}
            {role}
            <div class="md:col-span-2">
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-user-plus mr-2"></i>Create user
                </button>
            </div>
        </form>
        <div id="action-result"></div>"##,
        username = input("username", "Username", "text", "", ""),
        display_name = input("display_name", "Full name", "text", "", ""),
        password = input("password", "Password", "password", "", ""),
        role = select("role", "Role", &role_options),
    );

    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            let role_color = if u.role == Role::Admin { "violet" } else { "sky" };
            let status = if u.active {
                badge("active", "emerald")
            } else {
                badge("inactive", "slate")
            };
            vec![
                html_escape(&u.username),
                html_escape(&u.display_name),
                badge(u.role.as_str(), role_color),
                status,
                u.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    let listing = table(&["Username", "Name", "Role", "Status", "Created"], &rows);

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Users</h1>
        <div class="space-y-6">
            {form_card}
            {list_card}
        </div>"##,
        form_card = card("Create user", &form),
        list_card = card("All users", &listing),
    );

    layout("Users", project, user, &content)
}

/// Settings (admin only): configuration summary and the school registry.
pub fn settings_page(
    user: &SessionUser,
    project: &str,
    config: &FardaConfig,
    schools: &[School],
) -> String {
    let summary = format!(
        r##"<dl class="grid grid-cols-1 md:grid-cols-2 gap-4 text-sm">
            <div><dt class="text-slate-500">Database</dt><dd class="font-mono">{host}:{port}/{db}</dd></div>
            <div><dt class="text-slate-500">Dashboard</dt><dd class="font-mono">{bind}</dd></div>
            <div><dt class="text-slate-500">Session TTL</dt><dd>{ttl}s</dd></div>
            <div><dt class="text-slate-500">Audit</dt><dd>{audit}</dd></div>
        </dl>"##,
        host = html_escape(&config.database.host),
        port = config.database.port,
        db = html_escape(&config.database.database),
        bind = config.dashboard.bind_addr(),
        ttl = config.dashboard.session_ttl_secs,
        audit = if config.audit.enabled {
            format!("enabled → {}", html_escape(&config.audit.directory))
        } else {
            "disabled".to_string()
        },
    );

    let school_form = format!(
        r##"<form hx-post="/api/schools" hx-target="#action-result" class="grid grid-cols-1 md:grid-cols-3 gap-4">
            {name}
            {address}
            {phone}
            <div class="md:col-span-3">
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-school mr-2"></i>Add school
                </button>
            </div>
        </form>
        <div id="action-result"></div>"##,
        name = input("name", "Name", "text", "", "School name"),
        address = input("address", "Address", "text", "", ""),
        phone = input("phone", "Phone", "tel", "", ""),
    );

    let school_rows: Vec<Vec<String>> = schools
        .iter()
        .map(|s| {
            vec![
                html_escape(&s.name),
                s.address.as_deref().map(html_escape).unwrap_or_else(|| "—".to_string()),
                s.phone.as_deref().map(html_escape).unwrap_or_else(|| "—".to_string()),
                if s.active {
                    badge("active", "emerald")
                } else {
                    badge("inactive", "slate")
                },
            ]
        })
        .collect();
    let school_table = table(&["Name", "Address", "Phone", "Status"], &school_rows);

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Settings</h1>
        <div class="space-y-6">
            {summary_card}
            {school_form_card}
            {school_list_card}
        </div>"##,
        summary_card = card("Configuration", &summary),
        school_form_card = card("Add school", &school_form),
        school_list_card = card("Schools", &school_table),
    );

    layout("Settings", project, user, &content)
}
