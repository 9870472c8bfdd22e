//! Page builders for the main screens: dashboard home, orders, clients,
//! products.

use farda_core::{Client, OrderStatus, PaymentMethod, ProductCategory, School, all_sizes};
use farda_store::{
    OrderLineDetail, OrderSummary, OverviewMetrics, ProductWithSchool, SchoolMetrics,
};

use crate::state::SessionUser;
use crate::templates::{
    badge, card, empty_state, format_money, html_escape, layout, metric_card, select, status_badge,
    table,
};

/// Dashboard home: headline metrics, status distribution, per-school cards,
/// quick actions.
pub fn home_page(
    user: &SessionUser,
    project: &str,
    metrics: &OverviewMetrics,
    status_counts: &[(OrderStatus, i64)],
    school_metrics: &[SchoolMetrics],
) -> String {
    let stats = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-3 xl:grid-cols-5 gap-4 mb-8">
            {total}{pending}{clients}{alerts}{sales}
        </div>"##,
        total = metric_card("Total orders", &metrics.total_orders.to_string(), "box", "sky"),
        pending = metric_card(
            "Pending orders",
            &metrics.pending_orders.to_string(),
            "hourglass-half",
            "amber"
        ),
        clients = metric_card("Clients", &metrics.total_clients.to_string(), "users", "emerald"),
        alerts = metric_card(
            "Low-stock alerts",
            &metrics.low_stock_products.to_string(),
            "triangle-exclamation",
            "red"
        ),
        sales = metric_card(
            "Delivered sales",
            &format_money(metrics.delivered_sales),
            "sack-dollar",
            "emerald"
        ),
    );

    let status_rows: Vec<Vec<String>> = status_counts
        .iter()
        .map(|(status, count)| vec![status_badge(*status), count.to_string()])
        .collect();
    let status_card = card("Orders by status", &table(&["Status", "Orders"], &status_rows));

    let school_cards: String = school_metrics
        .iter()
        .map(|m| {
            card(
                &html_escape(&m.school_name),
                &format!(
                    r##"<dl class="grid grid-cols-2 gap-3 text-sm">
                        <div><dt class="text-slate-500">Orders</dt><dd class="font-semibold">{orders}</dd></div>
                        <div><dt class="text-slate-500">Pending</dt><dd class="font-semibold">{pending}</dd></div>
                        <div><dt class="text-slate-500">Products</dt><dd class="font-semibold">{products}</dd></div>
                        <div><dt class="text-slate-500">Low stock</dt><dd class="font-semibold">{low}</dd></div>
                    </dl>"##,
                    orders = m.orders,
                    pending = m.pending_orders,
                    products = m.products,
                    low = m.low_stock_products,
                ),
            )
        })
        .collect();

    let quick_actions = r##"<div class="flex flex-wrap gap-3 mb-8">
        <a href="/orders/new" class="bg-teal-700 hover:bg-teal-800 text-white px-4 py-2 rounded-md font-medium transition-colors">
            <i class="fas fa-plus mr-2"></i>New order
        </a>
        <a href="/clients" class="bg-slate-200 hover:bg-slate-300 text-slate-700 px-4 py-2 rounded-md font-medium transition-colors">
            <i class="fas fa-user-plus mr-2"></i>Register client
        </a>
        <a href="/products" class="bg-slate-200 hover:bg-slate-300 text-slate-700 px-4 py-2 rounded-md font-medium transition-colors">
            <i class="fas fa-shirt mr-2"></i>Register product
        </a>
        <a href="/reports" class="bg-slate-200 hover:bg-slate-300 text-slate-700 px-4 py-2 rounded-md font-medium transition-colors">
            <i class="fas fa-chart-line mr-2"></i>View reports
        </a>
    </div>"##;

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Overview</h1>
        {stats}
        {quick_actions}
        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 mb-8">
            {status_card}
        </div>
        <h2 class="text-lg font-semibold text-slate-900 mb-4">By school</h2>
        <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
            {school_cards}
        </div>"##
    );

    layout("Dashboard", project, user, &content)
}

/// Orders listing.
pub fn orders_page(
    user: &SessionUser,
    project: &str,
    orders: &[OrderSummary],
    schools: &[School],
    school_filter: Option<i64>,
) -> String {
    let filter_options: Vec<(String, String, bool)> = std::iter::once((
        String::new(),
        "All schools".to_string(),
        school_filter.is_none(),
    ))
    .chain(schools.iter().map(|s| {
        (
            s.id.to_string(),
            s.name.clone(),
            school_filter == Some(s.id),
        )
    }))
    .collect();

    let filter_form = format!(
        r##"<form method="GET" action="/orders" class="w-64">
            {select}
            <noscript><button type="submit">Filter</button></noscript>
        </form>
        <script>
            document.getElementById('school').addEventListener('change', e => e.target.form.submit());
        </script>"##,
        select = select("school", "School", &filter_options),
    );

    let body = if orders.is_empty() {
        empty_state(
            "box-open",
            "No orders yet",
            "Orders show up here as soon as they are placed.",
            Some(("New order", "/orders/new")),
        )
    } else {
        let rows: Vec<Vec<String>> = orders
            .iter()
            .map(|o| {
                vec![
                    format!(r#"<a href="/orders/{id}" class="text-teal-700 font-medium">#{id}</a>"#, id = o.order.id),
                    html_escape(&o.client_name),
                    html_escape(&o.school_name),
                    status_badge(o.order.status),
                    o.order.placed_at.format("%Y-%m-%d %H:%M").to_string(),
                    o.order.total_quantity.to_string(),
                    format_money(o.order.total_amount),
                ]
            })
            .collect();
        table(
            &["Order", "Client", "School", "Status", "Placed", "Items", "Total"],
            &rows,
        )
    };

    let content = format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-bold text-slate-900">Orders</h1>
            <a href="/orders/new" class="bg-teal-700 hover:bg-teal-800 text-white px-4 py-2 rounded-md font-medium transition-colors">
                <i class="fas fa-plus mr-2"></i>New order
            </a>
        </div>
        <div class="mb-4">{filter_form}</div>
        {body_card}"##,
        body_card = card("All orders", &body),
    );

    layout("Orders", project, user, &content)
}

/// Order detail with its lines and the status / delete actions.
pub fn order_detail_page(
    user: &SessionUser,
    project: &str,
    summary: &OrderSummary,
    lines: &[OrderLineDetail],
) -> String {
    let order = &summary.order;

    let line_rows: Vec<Vec<String>> = lines
        .iter()
        .map(|l| {
            vec![
                html_escape(&l.product_name),
                html_escape(&l.product_size),
                l.item.quantity.to_string(),
                format_money(l.item.unit_price),
                format_money(l.item.subtotal),
            ]
        })
        .collect();
    let lines_table = table(&["Product", "Size", "Qty", "Unit price", "Subtotal"], &line_rows);

    let info = format!(
        r##"<dl class="grid grid-cols-2 md:grid-cols-3 gap-4 text-sm">
            <div><dt class="text-slate-500">Client</dt><dd class="font-semibold">{client}</dd></div>
            <div><dt class="text-slate-500">School</dt><dd class="font-semibold">{school}</dd></div>
            <div><dt class="text-slate-500">Status</dt><dd>{status}</dd></div>
            <div><dt class="text-slate-500">Placed</dt><dd>{placed}</dd></div>
            <div><dt class="text-slate-500">Expected delivery</dt><dd>{expected}</dd></div>
            <div><dt class="text-slate-500">Delivered</dt><dd>{delivered}</dd></div>
            <div><dt class="text-slate-500">Payment</dt><dd>{payment}</dd></div>
            <div><dt class="text-slate-500">Total quantity</dt><dd>{quantity}</dd></div>
            <div><dt class="text-slate-500">Total</dt><dd class="font-semibold">{total}</dd></div>
        </dl>
        {notes}"##,
        client = html_escape(&summary.client_name),
        school = html_escape(&summary.school_name),
        status = status_badge(order.status),
        placed = order.placed_at.format("%Y-%m-%d %H:%M"),
        expected = order
            .expected_delivery
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string()),
        delivered = order
            .delivered_at
            .map(|d| d.to_string())
            .unwrap_or_else(|| "—".to_string()),
        payment = order.payment_method.label(),
        quantity = order.total_quantity,
        total = format_money(order.total_amount),
        notes = order
            .notes
            .as_deref()
            .map(|n| format!(
                r#"<p class="mt-4 text-sm text-slate-600"><span class="text-slate-500">Notes:</span> {}</p>"#,
                html_escape(n)
            ))
            .unwrap_or_default(),
    );

    let status_options: Vec<(String, String, bool)> = OrderStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.label().to_string(), *s == order.status))
        .collect();

    let actions = format!(
        r##"<div class="flex flex-wrap items-end gap-4">
            <form hx-post="/api/orders/{id}/status" hx-target="#action-result" class="flex items-end gap-2">
                {status_select}
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-4 py-2 rounded-md font-medium transition-colors">
                    Update status
                </button>
            </form>
            <form hx-post="/api/orders/{id}/delete" hx-target="#action-result"
                  hx-confirm="Delete this order? Stock will be restored.">
                <button type="submit" class="bg-red-600 hover:bg-red-700 text-white px-4 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-trash mr-2"></i>Delete order
                </button>
            </form>
        </div>
        <div id="action-result"></div>"##,
        id = order.id,
        status_select = select("status", "Status", &status_options),
    );

    let content = format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-bold text-slate-900">Order #{id}</h1>
            <a href="/orders" class="text-teal-700 font-medium"><i class="fas fa-arrow-left mr-1"></i>Back to orders</a>
        </div>
        <div class="space-y-6">
            {info_card}
            {lines_card}
            {actions_card}
        </div>"##,
        id = order.id,
        info_card = card("Details", &info),
        lines_card = card("Items", &lines_table),
        actions_card = card("Actions", &actions),
    );

    layout(&format!("Order #{}", order.id), project, user, &content)
}

/// New-order form. Lines are assembled client-side and posted as JSON.
pub fn new_order_page(
    user: &SessionUser,
    project: &str,
    clients: &[Client],
    schools: &[School],
    products: &[ProductWithSchool],
) -> String {
    if clients.is_empty() || products.is_empty() {
        let content = empty_state(
            "box-open",
            "Not ready for orders",
            "Register at least one client and one product first.",
            Some(("Register client", "/clients")),
        );
        return layout("New order", project, user, &content);
    }

    let client_options: Vec<(String, String, bool)> = clients
        .iter()
        .map(|c| (c.id.to_string(), c.name.clone(), false))
        .collect();
    let school_options: Vec<(String, String, bool)> = schools
        .iter()
        .filter(|s| s.active)
        .map(|s| (s.id.to_string(), s.name.clone(), false))
        .collect();
    let payment_options: Vec<(String, String, bool)> = PaymentMethod::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string(), *p == PaymentMethod::Cash))
        .collect();

    // Every product option carries its school and live stock so the script
    // can filter by school and cap quantities.
    let product_options: String = products
        .iter()
        .filter(|p| p.product.active)
        .map(|p| {
            format!(
                r#"<option value="{id}" data-school="{school}" data-stock="{stock}">{name} — {size} ({stock} in stock, {price})</option>"#,
                id = p.product.id,
                school = p.product.school_id,
                stock = p.product.stock,
                name = html_escape(&p.product.name),
                size = html_escape(&p.product.size),
                price = format_money(p.product.price),
            )
        })
        .collect();

    let form = format!(
        r##"<div class="grid grid-cols-1 md:grid-cols-2 gap-4 mb-6">
            {client_select}
            {school_select}
            {payment_select}
            <div class="space-y-1">
                <label for="expected_delivery" class="block text-sm font-medium text-slate-700">Expected delivery</label>
                <input type="date" name="expected_delivery" id="expected_delivery"
                       class="w-full px-4 py-2 rounded-md border border-slate-300 focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600">
            </div>
            <div class="space-y-1 md:col-span-2">
                <label for="notes" class="block text-sm font-medium text-slate-700">Notes</label>
                <textarea name="notes" id="notes" rows="2"
                          class="w-full px-4 py-2 rounded-md border border-slate-300 focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600"></textarea>
            </div>
        </div>

        <h3 class="text-sm font-semibold text-slate-700 uppercase tracking-wider mb-2">Items</h3>
        <div id="order-lines">
            <div class="order-line flex items-center gap-2">
                <select class="line-product flex-1 px-4 py-2 rounded-md border border-slate-300">
                    {product_options}
                </select>
                <input type="number" class="line-qty w-24 px-4 py-2 rounded-md border border-slate-300" min="1" value="1">
                <button type="button" class="line-remove text-red-500 p-2" title="Remove line">
                    <i class="fas fa-times"></i>
                </button>
            </div>
        </div>
        <div class="mt-3 flex items-center justify-between">
            <button type="button" id="add-line" class="text-teal-700 font-medium">
                <i class="fas fa-plus mr-1"></i>Add line
            </button>
            <button type="button" id="place-order"
                    class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                <i class="fas fa-check mr-2"></i>Place order
            </button>
        </div>"##,
        client_select = select("client_id", "Client", &client_options),
        school_select = select("school_id", "School", &school_options),
        payment_select = select("payment_method", "Payment method", &payment_options),
    );

    let content = format!(
        r##"<div class="flex items-center justify-between mb-6">
            <h1 class="text-2xl font-bold text-slate-900">New order</h1>
            <a href="/orders" class="text-teal-700 font-medium"><i class="fas fa-arrow-left mr-1"></i>Back to orders</a>
        </div>
        {form_card}
        {script}"##,
        form_card = card("Order", &form),
        script = NEW_ORDER_SCRIPT,
    );

    layout("New order", project, user, &content)
}

/// Client-side behavior of the new-order form: school filtering, line
/// management, and the JSON POST to /api/orders.
const NEW_ORDER_SCRIPT: &str = r##"<script>
(function () {
    const schoolSelect = document.getElementById('school_id');

    function filterLineOptions(selectEl) {
        const school = schoolSelect.value;
        let firstVisible = null;
        Array.from(selectEl.options).forEach(opt => {
            const match = opt.dataset.school === school;
            opt.hidden = !match;
            if (match && firstVisible === null) firstVisible = opt.value;
        });
        const current = selectEl.selectedOptions[0];
        if (!current || current.hidden) selectEl.value = firstVisible || '';
    }

    function applySchoolFilter() {
        document.querySelectorAll('.line-product').forEach(filterLineOptions);
    }

    schoolSelect.addEventListener('change', applySchoolFilter);
    applySchoolFilter();

    document.getElementById('add-line').addEventListener('click', () => {
        const lines = document.getElementById('order-lines');
        const clone = lines.querySelector('.order-line').cloneNode(true);
        clone.querySelector('.line-qty').value = 1;
        wireRemove(clone);
        lines.appendChild(clone);
        filterLineOptions(clone.querySelector('.line-product'));
    });

    function wireRemove(line) {
        line.querySelector('.line-remove').addEventListener('click', () => {
            if (document.querySelectorAll('.order-line').length > 1) line.remove();
        });
    }
    document.querySelectorAll('.order-line').forEach(wireRemove);

    document.getElementById('place-order').addEventListener('click', async () => {
        const lines = [];
        document.querySelectorAll('.order-line').forEach(row => {
            const product = row.querySelector('.line-product').value;
            const qty = parseInt(row.querySelector('.line-qty').value, 10);
            if (product && qty > 0) lines.push({ product_id: parseInt(product, 10), quantity: qty });
        });
        if (lines.length === 0) {
            showToast('Add at least one item', 'error');
            return;
        }

        const body = {
            client_id: parseInt(document.getElementById('client_id').value, 10),
            school_id: parseInt(schoolSelect.value, 10),
            payment_method: document.getElementById('payment_method').value,
            expected_delivery: document.getElementById('expected_delivery').value || null,
            notes: document.getElementById('notes').value || null,
            lines: lines
        };

        const res = await fetch('/api/orders', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body)
        });
        if (res.ok) {
            const data = await res.json();
            window.location.href = '/orders/' + data.id;
        } else {
            showToast(await res.text(), 'error');
        }
    });
})();
</script>"##;

/// Client registry: registration form + listing.
pub fn clients_page(user: &SessionUser, project: &str, clients: &[Client]) -> String {
    let form = format!(
        r##"<form hx-post="/api/clients" hx-target="#action-result" class="grid grid-cols-1 md:grid-cols-2 gap-4">
            {name}
            {phone}
            {email}
            {birth}
            <div class="md:col-span-2">{address}</div>
            <div class="md:col-span-2">
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-user-plus mr-2"></i>Register client
                </button>
            </div>
        </form>
        <div id="action-result"></div>"##,
        name = crate::templates::input("name", "Name", "text", "", "Full name"),
        phone = crate::templates::input("phone", "Phone", "tel", "", "(11) 99999-9999"),
        email = crate::templates::input("email", "Email", "email", "", "name@example.com"),
        birth = crate::templates::input("birth_date", "Birth date", "date", "", ""),
        address = crate::templates::input("address", "Address", "text", "", "Street, number"),
    );

    let listing = if clients.is_empty() {
        empty_state("users", "No clients yet", "Registered clients appear here.", None)
    } else {
        let rows: Vec<Vec<String>> = clients
            .iter()
            .map(|c| {
                vec![
                    html_escape(&c.name),
                    c.phone.as_deref().map(html_escape).unwrap_or_else(|| "—".to_string()),
                    c.email.as_deref().map(html_escape).unwrap_or_else(|| "—".to_string()),
                    c.registered_at.to_string(),
                    format!(
                        r##"<button hx-post="/api/clients/{id}/delete" hx-target="#action-result"
                                hx-confirm="Delete this client?" class="text-red-500" title="Delete">
                            <i class="fas fa-trash"></i>
                        </button>"##,
                        id = c.id
                    ),
                ]
            })
            .collect();
        table(&["Name", "Phone", "Email", "Registered", ""], &rows)
    };

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Clients</h1>
        <div class="space-y-6">
            {form_card}
            {list_card}
        </div>"##,
        form_card = card("Register client", &form),
        list_card = card("All clients", &listing),
    );

    layout("Clients", project, user, &content)
}

/// Product catalog: registration form + listing.
pub fn products_page(
    user: &SessionUser,
    project: &str,
    products: &[ProductWithSchool],
    schools: &[School],
) -> String {
    let category_options: Vec<(String, String, bool)> = ProductCategory::ALL
        .iter()
        .map(|c| (c.as_str().to_string(), c.label().to_string(), false))
        .collect();
    let size_options: Vec<(String, String, bool)> = all_sizes()
        .iter()
        .map(|s| (s.to_string(), s.to_string(), false))
        .collect();
    let school_options: Vec<(String, String, bool)> = schools
        .iter()
        .filter(|s| s.active)
        .map(|s| (s.id.to_string(), s.name.clone(), false))
        .collect();

    let form = format!(
        r##"<form hx-post="/api/products" hx-target="#action-result" class="grid grid-cols-1 md:grid-cols-3 gap-4">
            {name}
            {category}
            {school}
            {size}
            {color}
            {price}
            {stock}
            {min_stock}
            <div class="md:col-span-3">{description}</div>
            <div class="md:col-span-3">
                <button type="submit" class="bg-teal-700 hover:bg-teal-800 text-white px-6 py-2 rounded-md font-medium transition-colors">
                    <i class="fas fa-plus mr-2"></i>Register product
                </button>
            </div>
        </form>
        <div id="action-result"></div>"##,
        name = crate::templates::input("name", "Name", "text", "", "Polo shirt"),
        category = select("category", "Category", &category_options),
        school = select("school_id", "School", &school_options),
        size = select("size", "Size", &size_options),
        color = crate::templates::input("color", "Color", "text", "", "White"),
        price = crate::templates::input("price", "Price", "number", "", "0.00"),
        stock = crate::templates::input("stock", "Initial stock", "number", "0", ""),
        min_stock = crate::templates::input("min_stock", "Minimum stock", "number", "5", ""),
        description = crate::templates::input("description", "Description", "text", "", ""),
    );

    let listing = if products.is_empty() {
        empty_state("shirt", "No products yet", "Registered products appear here.", None)
    } else {
        let rows: Vec<Vec<String>> = products
            .iter()
            .map(|p| {
                let stock_cell = if p.product.low_stock() {
                    format!(
                        "{} {}",
                        p.product.stock,
                        badge("low", "red")
                    )
                } else {
                    p.product.stock.to_string()
                };
                vec![
                    html_escape(&p.product.name),
                    p.product.category.label().to_string(),
                    html_escape(&p.product.size),
                    p.product.color.as_deref().map(html_escape).unwrap_or_else(|| "—".to_string()),
                    html_escape(&p.school_name),
                    format_money(p.product.price),
                    stock_cell,
                    format!(
                        r##"<button hx-post="/api/products/{id}/deactivate" hx-target="#action-result"
                                hx-confirm="Retire this product from the catalog?" class="text-red-500" title="Retire">
                            <i class="fas fa-box-archive"></i>
                        </button>"##,
                        id = p.product.id
                    ),
                ]
            })
            .collect();
        table(
            &["Name", "Category", "Size", "Color", "School", "Price", "Stock", ""],
            &rows,
        )
    };

    let content = format!(
        r##"<h1 class="text-2xl font-bold text-slate-900 mb-6">Products</h1>
        <div class="space-y-6">
            {form_card}
            {list_card}
        </div>"##,
        form_card = card("Register product", &form),
        list_card = card("Catalog", &listing),
    );

    layout("Products", project, user, &content)
}
