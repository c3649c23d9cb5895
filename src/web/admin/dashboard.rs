use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    backend::{ContactSubmission, PendingReview, display_date, display_datetime},
    web::{
        AppState, Flash, PageLayout, auth, escape_html, flash_from_codes, render_flash,
        render_footer, render_login_page, render_page,
    },
};

use super::types::{DashboardQuery, Tab};

/// Everything one dashboard render needs. Lists left as `None` were not
/// loaded by this request.
pub(crate) struct DashboardView<'a> {
    pub admin_key: &'a str,
    pub tab: Tab,
    pub reviews: Option<Vec<PendingReview>>,
    pub contacts: Option<Vec<ContactSubmission>>,
    pub flash: Option<Flash>,
}

impl<'a> DashboardView<'a> {
    pub fn new(admin_key: &'a str, tab: Tab) -> Self {
        Self {
            admin_key,
            tab,
            reviews: None,
            contacts: None,
            flash: None,
        }
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<DashboardQuery>,
) -> Response {
    let flash = flash_from_codes(params.status.as_deref(), params.error.as_deref());

    if !auth::has_admin_session(&state, &jar).await {
        return (
            StatusCode::OK,
            Html(render_login_page(state.site_owner(), flash.as_ref())),
        )
            .into_response();
    }

    let mut view = DashboardView::new("", Tab::Reviews);
    view.flash = flash;
    respond(&state, StatusCode::OK, view)
}

/// The page echoes the admin key, so the browser must not keep a copy.
pub(crate) fn respond(state: &AppState, status: StatusCode, view: DashboardView<'_>) -> Response {
    (
        status,
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_dashboard(state.site_owner(), &view)),
    )
        .into_response()
}

/// Blank keys never reach the backend.
pub(crate) fn missing_key(state: &AppState, tab: Tab, raw_key: &str) -> Response {
    let view = DashboardView::new(raw_key, tab).with_flash(Flash::error(
        "Admin key required",
        "Enter your admin key first.",
    ));
    respond(state, StatusCode::BAD_REQUEST, view)
}

pub(crate) fn missing_id(state: &AppState, tab: Tab, raw_key: &str) -> Response {
    let view = DashboardView::new(raw_key, tab)
        .with_flash(Flash::error("Admin error", "No record was selected."));
    respond(state, StatusCode::BAD_REQUEST, view)
}

pub(crate) fn admin_error(
    state: &AppState,
    tab: Tab,
    raw_key: &str,
    err: &anyhow::Error,
) -> Response {
    let view = DashboardView::new(raw_key, tab).with_flash(Flash::error("Admin error", err.to_string()));
    respond(state, StatusCode::BAD_GATEWAY, view)
}

pub(crate) fn render_dashboard(owner: &str, view: &DashboardView<'_>) -> String {
    let has_key = !view.admin_key.trim().is_empty();
    let load_disabled = if has_key { "" } else { " disabled" };

    // `None` means this request never loaded the list: no count, no "empty" claim.
    let (reviews_title, reviews_html) = match view.reviews.as_deref() {
        Some(reviews) => (
            format!("Pending Reviews ({})", reviews.len()),
            render_reviews(reviews),
        ),
        None => (
            "Pending Reviews".to_string(),
            not_loaded("Load pending", "pending reviews"),
        ),
    };
    let (contacts_title, contacts_html) = match view.contacts.as_deref() {
        Some(contacts) => (
            format!(
                "Contact Submissions ({} unread)",
                contacts.iter().filter(|c| !c.read).count()
            ),
            render_contacts(contacts),
        ),
        None => (
            "Contact Submissions".to_string(),
            not_loaded("Load contacts", "contact submissions"),
        ),
    };

    let (reviews_active, contacts_active) = match view.tab {
        Tab::Reviews => (" active", ""),
        Tab::Contacts => ("", " active"),
    };

    let body = format!(
        r#"    <main class="container dashboard">
        <div class="dashboard-header">
            <div>
                <h1>Admin Dashboard</h1>
                <p class="muted">Manage reviews and view contact form submissions.</p>
            </div>
            <div class="header-actions">
                <a class="outline-button" href="/">Back to site</a>
                <form method="post" action="/admin/logout"><button class="outline-button" type="submit">Sign out</button></form>
            </div>
        </div>
        {flash}
        <form id="admin-form" method="post" action="/admin/reviews">
            <div class="card key-card">
                <label for="admin-key">Admin key</label>
                <input id="admin-key" name="admin_key" value="{admin_key}" placeholder="Enter your admin key" autocomplete="off" spellcheck="false">
                <p class="muted small">This key is not stored by the site.</p>
            </div>
            <div class="tabs" data-active-tab="{tab}">
                <button type="button" class="tab-toggle{reviews_active}" data-tab-target="reviews">Reviews</button>
                <button type="button" class="tab-toggle{contacts_active}" data-tab-target="contacts">Contact Forms</button>
            </div>
            <section class="card tab-panel{reviews_active}" data-tab-panel="reviews">
                <div class="panel-header">
                    <h2>{reviews_title}</h2>
                    <button class="hero-button small" type="submit" formaction="/admin/reviews" data-requires-key{load_disabled}>Load pending</button>
                </div>
                <div class="record-list">{reviews_html}</div>
            </section>
            <section class="card tab-panel{contacts_active}" data-tab-panel="contacts">
                <div class="panel-header">
                    <h2>{contacts_title}</h2>
                    <button class="hero-button small" type="submit" formaction="/admin/contacts" data-requires-key{load_disabled}>Load contacts</button>
                </div>
                <div class="record-list">{contacts_html}</div>
            </section>
        </form>
        {footer}
    </main>"#,
        flash = render_flash(view.flash.as_ref()),
        admin_key = escape_html(view.admin_key),
        tab = view.tab.as_str(),
        footer = render_footer(owner),
    );

    render_page(PageLayout {
        meta_title: "Admin Dashboard",
        indexable: false,
        body_html: Cow::Owned(body),
        extra_style_blocks: vec![Cow::Borrowed(DASHBOARD_STYLES)],
        body_scripts: vec![Cow::Borrowed(DASHBOARD_SCRIPT)],
    })
}

fn not_loaded(button: &str, what: &str) -> String {
    format!(
        r#"<p class="muted small not-loaded">Not loaded. Enter your admin key and click "{button}" to fetch {what}.</p>"#
    )
}

fn render_reviews(reviews: &[PendingReview]) -> String {
    if reviews.is_empty() {
        return r#"<p class="muted small">No pending reviews. Click "Load pending" to refresh.</p>"#
            .to_string();
    }

    reviews
        .iter()
        .map(|review| {
            format!(
                r#"<article class="record">
                    <div class="record-head">
                        <div>
                            <div class="record-name">{name}</div>
                            <div class="muted small">{meta}</div>
                        </div>
                        <div class="record-actions">
                            <button class="approve" type="submit" formaction="/admin/reviews/approve" name="id" value="{id}">&#10003; Approve</button>
                            <button class="reject" type="submit" formaction="/admin/reviews/reject" name="id" value="{id}">&#10005; Reject</button>
                        </div>
                    </div>
                    <p class="muted record-body">{body}</p>
                </article>"#,
                name = escape_html(&review.name),
                meta = escape_html(&review_meta(review)),
                id = escape_html(&review.id),
                body = escape_html(&review.body),
            )
        })
        .collect()
}

/// `"{design} • {rating}/5 • {date}"`, design omitted when absent.
pub(crate) fn review_meta(review: &PendingReview) -> String {
    let design = review
        .design
        .as_deref()
        .filter(|design| !design.is_empty())
        .map(|design| format!("{design} • "))
        .unwrap_or_default();
    format!(
        "{design}{rating}/5 • {date}",
        rating = review.rating,
        date = display_date(&review.created_at),
    )
}

fn render_contacts(contacts: &[ContactSubmission]) -> String {
    if contacts.is_empty() {
        return r#"<p class="muted small">No contact submissions. Click "Load contacts" to refresh.</p>"#
            .to_string();
    }

    contacts
        .iter()
        .map(|contact| {
            let (state_class, marker, mark_read) = if contact.read {
                ("read", "&#9993;&#xFE0E; read", String::new())
            } else {
                (
                    "unread",
                    "&#9993; new",
                    format!(
                        r#"<button class="outline-button small" type="submit" formaction="/admin/contacts/read" name="id" value="{id}">Mark read</button>"#,
                        id = escape_html(&contact.id),
                    ),
                )
            };

            format!(
                r#"<article class="record {state_class}">
                    <div class="record-head">
                        <div>
                            <span class="marker">{marker}</span>
                            <div class="record-name">{name}</div>
                            <div class="record-contact">{contact}</div>
                            <div class="muted small">{created}</div>
                        </div>
                        {mark_read}
                    </div>
                    <p class="muted record-body preserve">{details}</p>
                </article>"#,
                name = escape_html(&contact.name),
                contact = escape_html(&contact.contact),
                created = escape_html(&display_datetime(&contact.created_at)),
                details = escape_html(&contact.details),
            )
        })
        .collect()
}

const DASHBOARD_STYLES: &str = r#"
        .dashboard { padding-top: 3rem; }
        .dashboard-header { display: flex; flex-wrap: wrap; justify-content: space-between; align-items: flex-end; gap: 1rem; margin-bottom: 2rem; }
        .dashboard-header h1 { margin: 0; font-size: 2.2rem; }
        .header-actions { display: flex; gap: 0.75rem; align-items: center; }
        .header-actions form { margin: 0; }
        .key-card { margin-bottom: 1.5rem; }
        .small { font-size: 0.85rem; }
        .hero-button.small, .outline-button.small { padding: 0.45rem 0.9rem; font-size: 0.85rem; }
        .tabs { display: grid; grid-template-columns: 1fr 1fr; max-width: 28rem; gap: 0.25rem; padding: 0.25rem; border-radius: 14px; background: rgba(255, 255, 255, 0.05); margin-bottom: 1rem; }
        .tab-toggle { border: none; border-radius: 10px; padding: 0.55rem; background: transparent; color: var(--muted); font-weight: 600; cursor: pointer; }
        .tab-toggle.active { background: var(--card); color: var(--fg); }
        .tab-panel { display: none; }
        .tab-panel.active { display: block; }
        .panel-header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 1rem; }
        .panel-header h2 { margin: 0; font-size: 1.15rem; }
        .record-list { display: grid; gap: 1rem; }
        .record { border: 1px solid var(--border); border-radius: 18px; padding: 1rem; background: rgba(0, 0, 0, 0.2); }
        .record.read { opacity: 0.7; background: rgba(0, 0, 0, 0.1); }
        .record-head { display: flex; flex-wrap: wrap; justify-content: space-between; gap: 0.75rem; }
        .record-name { font-weight: 600; }
        .record-contact { color: var(--primary); font-size: 0.9rem; }
        .record-actions { display: flex; gap: 0.5rem; }
        .record-actions button { border: none; border-radius: 10px; padding: 0.45rem 0.85rem; font-weight: 600; color: #fff; cursor: pointer; }
        .approve { background: #16a34a; }
        .reject { background: #dc2626; }
        .marker { font-size: 0.8rem; color: var(--muted); }
        .record.unread .marker { color: var(--primary); }
        .record-body { margin: 0.75rem 0 0; font-size: 0.9rem; }
        .preserve { white-space: pre-wrap; }
"#;

const DASHBOARD_SCRIPT: &str = r#"<script>
(function () {
    const keyInput = document.getElementById('admin-key');
    const gated = document.querySelectorAll('[data-requires-key]');
    const sync = () => gated.forEach((button) => { button.disabled = keyInput.value.trim().length === 0; });
    keyInput.addEventListener('input', sync);
    sync();

    const toggles = document.querySelectorAll('.tab-toggle');
    const panels = document.querySelectorAll('.tab-panel');
    toggles.forEach((toggle) => toggle.addEventListener('click', () => {
        const target = toggle.dataset.tabTarget;
        toggles.forEach((t) => t.classList.toggle('active', t === toggle));
        panels.forEach((p) => p.classList.toggle('active', p.dataset.tabPanel === target));
    }));
})();
</script>"#;
