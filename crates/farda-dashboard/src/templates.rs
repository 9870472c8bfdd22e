//! HTML building blocks for the dashboard.
//!
//! Server-rendered Tailwind markup with HTMX for the form endpoints. Every
//! page goes through [`layout`]; the smaller helpers keep the screens
//! visually consistent without a template engine.

use farda_core::Role;

use crate::state::SessionUser;

/// Full page shell: topbar, role-aware sidebar, content column, toast.
pub fn layout(title: &str, project: &str, user: &SessionUser, content: &str) -> String {
    let topbar = topbar(project, user);
    let sidebar = sidebar(user.role);

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} · {project}</title>
<script src="https://cdn.tailwindcss.com"></script>
<script src="https://unpkg.com/htmx.org@1.9.10"></script>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css">
<link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-slate-100 text-slate-800">
{topbar}
<div class="flex">
{sidebar}
<main class="flex-1 px-6 py-8">
<div class="mx-auto max-w-6xl">
{content}
</div>
</main>
</div>
<div id="toast" class="pointer-events-none fixed bottom-6 right-6 z-50 hidden rounded-md px-5 py-3 text-sm font-medium text-white shadow-lg"></div>
<script>
function showToast(message, type) {{
  const el = document.getElementById('toast');
  el.textContent = message;
  el.classList.remove('hidden', 'bg-teal-700', 'bg-red-600');
  el.classList.add(type === 'error' ? 'bg-red-600' : 'bg-teal-700');
  clearTimeout(el._timer);
  el._timer = setTimeout(() => el.classList.add('hidden'), 3000);
}}
document.body.addEventListener('htmx:responseError', (evt) => {{
  showToast(evt.detail.xhr.responseText || 'Request failed', 'error');
}});
</script>
</body>
</html>"##,
        title = html_escape(title),
        project = html_escape(project),
    )
}

fn topbar(project: &str, user: &SessionUser) -> String {
    format!(
        r##"<header class="sticky top-0 z-40 border-b border-slate-800 bg-slate-900 text-slate-100">
<div class="flex h-14 items-center justify-between px-6">
<a href="/" class="flex items-center gap-2 font-semibold tracking-tight">
<span class="text-lg">👕</span>
<span>{project}</span>
</a>
<div class="flex items-center gap-4 text-sm">
<a href="/account" class="text-slate-300 hover:text-white" title="Account">{display_name}</a>
{role}
<a href="/logout" class="rounded-md px-2 py-1 text-slate-300 hover:bg-slate-800 hover:text-white" title="Sign out">
<i class="fas fa-arrow-right-from-bracket"></i>
</a>
</div>
</div>
</header>"##,
        project = html_escape(project),
        display_name = html_escape(&user.display_name),
        role = badge(user.role.as_str(), if user.is_admin() { "violet" } else { "sky" }),
    )
}

fn nav_link(href: &str, icon: &str, label: &str) -> String {
    format!(
        r##"<a href="{href}" class="flex items-center gap-3 rounded-md px-3 py-2 text-sm text-slate-600 hover:bg-slate-100 hover:text-teal-700">
<i class="fas fa-{icon} w-4 text-center"></i><span>{label}</span>
</a>"##
    )
}

fn nav_heading(label: &str) -> String {
    format!(
        r#"<p class="px-3 pt-5 pb-1 text-xs font-semibold uppercase tracking-wide text-slate-400">{label}</p>"#
    )
}

fn sidebar(role: Role) -> String {
    let mut nav = String::new();
    nav.push_str(&nav_link("/", "gauge", "Dashboard"));
    nav.push_str(&nav_heading("Sales"));
    nav.push_str(&nav_link("/orders", "box", "Orders"));
    nav.push_str(&nav_link("/clients", "users", "Clients"));
    nav.push_str(&nav_heading("Catalog"));
    nav.push_str(&nav_link("/products", "shirt", "Products"));
    nav.push_str(&nav_link("/stock", "boxes-stacked", "Stock"));
    nav.push_str(&nav_heading("Insight"));
    nav.push_str(&nav_link("/reports", "chart-line", "Reports"));

    if role == Role::Admin {
        nav.push_str(&nav_heading("Administration"));
        nav.push_str(&nav_link("/users", "user-shield", "Users"));
        nav.push_str(&nav_link("/settings", "sliders", "Settings"));
    }

    format!(
        r##"<aside class="min-h-[calc(100vh-3.5rem)] w-60 shrink-0 border-r border-slate-200 bg-white">
<nav class="flex flex-col gap-0.5 p-3">
{nav}
</nav>
</aside>"##
    )
}

/// Titled panel.
pub fn card(title: &str, body: &str) -> String {
    format!(
        r##"<section class="overflow-hidden rounded-md border border-slate-200 bg-white shadow-sm">
<header class="border-b border-slate-100 px-5 py-3">
<h2 class="text-sm font-semibold text-slate-700">{title}</h2>
</header>
<div class="p-5">
{body}
</div>
</section>"##
    )
}

/// Headline number with an icon, for the dashboard metric row.
pub fn metric_card(label: &str, value: &str, icon: &str, tone: &str) -> String {
    format!(
        r##"<div class="flex items-center gap-4 rounded-md border border-slate-200 bg-white p-4 shadow-sm">
<span class="flex h-10 w-10 items-center justify-center rounded-md bg-{tone}-50 text-{tone}-600">
<i class="fas fa-{icon}"></i>
</span>
<div>
<p class="text-xs uppercase tracking-wide text-slate-400">{label}</p>
<p class="text-xl font-bold text-slate-900">{value}</p>
</div>
</div>"##
    )
}

/// Labelled text input.
pub fn input(name: &str, label: &str, input_type: &str, value: &str, placeholder: &str) -> String {
    format!(
        r##"<label class="block">
<span class="mb-1 block text-xs font-medium uppercase tracking-wide text-slate-500">{label}</span>
<input type="{input_type}" name="{name}" id="{name}" value="{value}" placeholder="{placeholder}"
       class="w-full rounded-md border border-slate-300 px-3 py-2 text-sm shadow-sm focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600">
</label>"##
    )
}

/// Labelled dropdown. Options are (value, text, selected).
pub fn select(name: &str, label: &str, options: &[(String, String, bool)]) -> String {
    let mut options_html = String::new();
    for (value, text, selected) in options {
        let marker = if *selected { " selected" } else { "" };
        options_html.push_str(&format!(
            r#"<option value="{value}"{marker}>{text}</option>"#,
            value = html_escape(value),
            text = html_escape(text),
        ));
    }

    format!(
        r##"<label class="block">
<span class="mb-1 block text-xs font-medium uppercase tracking-wide text-slate-500">{label}</span>
<select name="{name}" id="{name}"
        class="w-full rounded-md border border-slate-300 px-3 py-2 text-sm shadow-sm focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600">
{options_html}
</select>
</label>"##
    )
}

/// Small colored pill.
pub fn badge(text: &str, tone: &str) -> String {
    format!(
        r##"<span class="inline-flex items-center rounded-full border border-{tone}-200 bg-{tone}-50 px-2 py-0.5 text-xs font-medium text-{tone}-700">{text}</span>"##
    )
}

/// Striped data table.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from(
        r#"<div class="overflow-x-auto"><table class="w-full text-left text-sm"><thead><tr class="border-b border-slate-200">"#,
    );
    for header in headers {
        html.push_str(&format!(
            r#"<th class="px-4 py-2 text-xs font-semibold uppercase tracking-wide text-slate-400">{header}</th>"#
        ));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str(r#"<tr class="border-b border-slate-100 last:border-0 hover:bg-slate-50">"#);
        for cell in row {
            html.push_str(&format!(
                r#"<td class="whitespace-nowrap px-4 py-2.5 text-slate-700">{cell}</td>"#
            ));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");
    html
}

/// Placeholder shown instead of an empty table.
pub fn empty_state(icon: &str, title: &str, description: &str, action: Option<(&str, &str)>) -> String {
    let action_html = match action {
        Some((text, href)) => format!(
            r##"<a href="{href}" class="mt-4 inline-block rounded-md bg-teal-700 px-4 py-2 text-sm font-medium text-white hover:bg-teal-800">{text}</a>"##
        ),
        None => String::new(),
    };

    format!(
        r##"<div class="rounded-md border-2 border-dashed border-slate-200 py-10 text-center">
<i class="fas fa-{icon} mb-3 text-3xl text-slate-300"></i>
<p class="font-medium text-slate-700">{title}</p>
<p class="mt-1 text-sm text-slate-400">{description}</p>
{action_html}
</div>"##
    )
}

/// Pill for an order status.
pub fn status_badge(status: farda_core::OrderStatus) -> String {
    use farda_core::OrderStatus;
    let tone = match status {
        OrderStatus::Pending => "amber",
        OrderStatus::InProduction => "sky",
        OrderStatus::ReadyForDelivery => "violet",
        OrderStatus::Delivered => "emerald",
        OrderStatus::Cancelled => "red",
    };
    badge(status.label(), tone)
}

/// Money formatting, Brazilian real.
pub fn format_money(amount: f64) -> String {
    format!("R$ {amount:.2}")
}

pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#x27;");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(1234.5), "R$ 1234.50");
        assert_eq!(format_money(0.0), "R$ 0.00");
    }

    #[test]
    fn test_table_renders_rows() {
        let html = table(&["Name", "Qty"], &[vec!["Polo".to_string(), "3".to_string()]]);
        assert!(html.contains("<th"));
        assert!(html.contains("Polo"));
    }

    #[test]
    fn test_select_escapes_options() {
        let options = vec![("1".to_string(), "Escola <X>".to_string(), true)];
        let html = select("school", "School", &options);
        assert!(html.contains("Escola &lt;X&gt;"));
        assert!(html.contains("selected"));
    }

    #[test]
    fn test_sidebar_hides_admin_links_for_vendor() {
        let vendor = sidebar(Role::Vendor);
        assert!(!vendor.contains("/users"));
        assert!(!vendor.contains("/settings"));

        let admin = sidebar(Role::Admin);
        assert!(admin.contains("/users"));
        assert!(admin.contains("/settings"));
    }
}
