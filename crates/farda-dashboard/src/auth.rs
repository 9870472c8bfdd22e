//! Authentication for the dashboard.
//!
//! Form-based login against the user store, with server-side sessions and an
//! HttpOnly cookie. Vendor sessions are kept away from admin-only screens by
//! `require_admin`.

use axum::{
    Form,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::DashboardError;
use crate::state::{AppState, SessionUser};
use crate::templates::html_escape;

const SESSION_COOKIE: &str = "farda_session";

/// Paths reachable without a session.
fn is_public(path: &str) -> bool {
    path == "/login" || path.starts_with("/static/")
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    token_from_cookies(cookies)
}

fn token_from_cookies(cookies: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|cookie| {
            cookie
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(str::to_string)
}

fn session_cookie(token: &str, max_age_secs: u64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Resolves the session cookie to a user and attaches it to the request.
/// Anonymous requests are sent to the login page, remembering where they
/// were headed.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let user = session_token(request.headers()).and_then(|token| state.sessions().validate(&token));

    match user {
        Some(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            let wanted = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            Redirect::to(&format!("/login?redirect={}", urlencoding::encode(wanted)))
                .into_response()
        }
    }
}

/// Gate for admin-only routes. Runs after `auth_middleware`, so a missing
/// session user means the route was wired incorrectly.
pub async fn require_admin(request: Request, next: Next) -> Response {
    match request.extensions().get::<SessionUser>() {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => DashboardError::NotAuthorized.into_response(),
        None => DashboardError::AuthenticationFailed.into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub redirect: Option<String>,
}

pub async fn login_page(
    State(state): State<AppState>,
    axum::extract::Query(query): axum::extract::Query<LoginQuery>,
) -> Html<String> {
    Html(render_login(
        state.config().project_name(),
        query.redirect.as_deref(),
        query.error.is_some(),
    ))
}

pub async fn login_submit(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let verified = state.users().verify_login(&form.username, &form.password).await;

    let user = match verified {
        Ok(user) => user,
        Err(err) => {
            let _ = state
                .audit()
                .log_login_failed(&form.username, &err.to_string())
                .await;

            let carry = form
                .redirect
                .map(|r| format!("&redirect={}", urlencoding::encode(&r)))
                .unwrap_or_default();
            return Redirect::to(&format!("/login?error=invalid{carry}")).into_response();
        }
    };

    let _ = state.audit().log_login_succeeded(&user.username).await;

    let token = state.sessions().create(SessionUser {
        username: user.username,
        display_name: user.display_name,
        role: user.role,
    });

    // Only same-site relative targets are honored.
    let target = form
        .redirect
        .filter(|r| r.starts_with('/'))
        .unwrap_or_else(|| "/".to_string());

    let cookie = session_cookie(&token, state.config().dashboard.session_ttl_secs);
    ([(header::SET_COOKIE, cookie)], Redirect::to(&target)).into_response()
}

/// Drops the server-side session and expires the cookie.
pub async fn logout(State(state): State<AppState>, request: Request) -> Response {
    if let Some(token) = session_token(request.headers()) {
        state.sessions().remove(&token);
    }

    (
        [(header::SET_COOKIE, session_cookie("", 0))],
        Redirect::to("/login"),
    )
        .into_response()
}

fn render_login(project: &str, redirect: Option<&str>, failed: bool) -> String {
    let notice = if failed {
        r##"<p class="mb-4 rounded-md border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700">Invalid username or password.</p>"##
    } else {
        ""
    };

    let redirect_field = redirect
        .map(|r| {
            format!(
                r#"<input type="hidden" name="redirect" value="{}">"#,
                html_escape(r)
            )
        })
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Sign in · {project}</title>
<script src="https://cdn.tailwindcss.com"></script>
<link rel="stylesheet" href="/static/app.css">
</head>
<body class="flex min-h-screen items-center justify-center bg-slate-900 p-4">
<div class="w-full max-w-sm">
<div class="mb-6 text-center text-slate-100">
<div class="text-3xl">👕</div>
<h1 class="mt-2 text-xl font-semibold">{project}</h1>
<p class="text-sm text-slate-400">Uniform order management</p>
</div>
<div class="rounded-md bg-white p-6 shadow-xl">
{notice}
<form method="POST" action="/login" class="space-y-4">
{redirect_field}
<label class="block">
<span class="mb-1 block text-xs font-medium uppercase tracking-wide text-slate-500">Username</span>
<input type="text" name="username" id="username" required autofocus
       class="w-full rounded-md border border-slate-300 px-3 py-2 text-sm focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600">
</label>
<label class="block">
<span class="mb-1 block text-xs font-medium uppercase tracking-wide text-slate-500">Password</span>
<input type="password" name="password" id="password" required
       class="w-full rounded-md border border-slate-300 px-3 py-2 text-sm focus:border-teal-600 focus:outline-none focus:ring-1 focus:ring-teal-600">
</label>
<button type="submit"
        class="w-full rounded-md bg-teal-700 py-2.5 text-sm font-medium text-white hover:bg-teal-800 focus:outline-none focus:ring-2 focus:ring-teal-600 focus:ring-offset-2">
Sign in
</button>
</form>
</div>
</div>
</body>
</html>"##,
        project = html_escape(project),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Router, middleware};
    use farda_core::Role;
    use tower::ServiceExt;

    fn session(role: Role) -> SessionUser {
        SessionUser {
            username: "someone".to_string(),
            display_name: "Someone".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_require_admin_gates_by_role() {
        async fn ok_handler() -> &'static str {
            "ok"
        }

        let app = Router::new()
            .route("/users", get(ok_handler))
            .route_layer(middleware::from_fn(require_admin));

        // Vendor sessions are rejected.
        let mut req = axum::http::Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(session(Role::Vendor));
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        // Admin sessions pass through.
        let mut req = axum::http::Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut().insert(session(Role::Admin));
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        // No session at all is a wiring error, reported as unauthorized.
        let req = axum::http::Request::builder()
            .uri("/users")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_token_from_cookies() {
        assert_eq!(
            token_from_cookies("theme=dark; farda_session=abc123; other=x"),
            Some("abc123".to_string())
        );
        assert_eq!(token_from_cookies("theme=dark"), None);
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public("/login"));
        assert!(is_public("/static/app.css"));
        assert!(!is_public("/orders"));
    }

    #[test]
    fn test_login_page_escapes_redirect() {
        let html = render_login("Farda", Some("/orders?x=\"><script>"), false);
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_login_page_shows_error() {
        let html = render_login("Farda", None, true);
        assert!(html.contains("Invalid username or password"));
        assert!(!render_login("Farda", None, false).contains("Invalid username"));
    }
}
