use std::borrow::Cow;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    discord::DiscordCounts,
    web::{
        AppState, Flash, PageLayout, escape_html, flash_from_codes, json_message, render_flash,
        render_footer, render_page,
        contact::{CONTACT_MAX_CHARS, ContactForm, DETAILS_MAX_CHARS, NAME_MAX_CHARS},
    },
};

#[derive(Default, Deserialize)]
pub struct LandingQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

pub async fn landing_page(
    State(state): State<AppState>,
    Query(params): Query<LandingQuery>,
) -> Html<String> {
    let flash = flash_from_codes(params.status.as_deref(), params.error.as_deref());
    Html(render_for_state(&state, &ContactForm::default(), flash.as_ref()).await)
}

pub async fn community_online(State(state): State<AppState>) -> Response {
    match community_counts(&state).await {
        Some(counts) => Json(counts).into_response(),
        None => json_message(StatusCode::NOT_FOUND, "Community widget unavailable.").into_response(),
    }
}

/// Renders the landing page, fetching the community badge when configured.
pub async fn render_for_state(state: &AppState, form: &ContactForm, flash: Option<&Flash>) -> String {
    let counts = community_counts(state).await;
    render_landing(state.site_owner(), counts.as_ref(), form, flash)
}

async fn community_counts(state: &AppState) -> Option<DiscordCounts> {
    match state.discord() {
        Some(widget) => widget.online_count().await,
        None => None,
    }
}

pub fn render_landing(
    owner: &str,
    counts: Option<&DiscordCounts>,
    form: &ContactForm,
    flash: Option<&Flash>,
) -> String {
    let owner_html = escape_html(owner);
    let community_badge = counts
        .map(|counts| {
            format!(
                r#"<span class="community-badge"><span class="dot"></span>{online} online in the community</span>"#,
                online = escape_html(&counts.online),
            )
        })
        .unwrap_or_default();

    let body = format!(
        r##"    <header class="container hero">
        <p class="eyebrow">Graphic design · PFPs · banners · server visuals</p>
        <h1>Hi, I'm {owner_html}.</h1>
        <p class="muted lead">Custom profile pictures, banners and server art with a clean, glowing look.</p>
        <div class="hero-actions">
            <a class="hero-button" href="#contact">Start a request</a>
            {community_badge}
        </div>
    </header>
    <section id="contact" class="contact-section">
        <div class="container contact-grid">
            <div>
                <h2>Contact</h2>
                <p class="muted">Tell me what you need (style, colors, theme, deadline). I'll reply with a quick plan.</p>
                <div class="card quick-start">
                    <div class="quick-start-title">Quick start</div>
                    <div class="muted">Include these 3 things:</div>
                    <ul class="muted">
                        <li>What you want (PFP / banner / server visual)</li>
                        <li>Your vibe (clean, neon, dark, pastel…)</li>
                        <li>Deadline + where it's used</li>
                    </ul>
                </div>
            </div>
            <form class="card" method="post" action="/contact">
                {flash}
                <div class="field">
                    <label for="name">Name</label>
                    <input id="name" name="name" placeholder="Your name" maxlength="{name_max}" value="{name}" required>
                </div>
                <div class="field">
                    <label for="contact-method">Discord / Email</label>
                    <input id="contact-method" name="contact" placeholder="@yourdiscord or you@email.com" maxlength="{contact_max}" value="{contact}" required>
                </div>
                <div class="field">
                    <label for="details">What do you want?</label>
                    <textarea id="details" name="details" placeholder="Example: A neon banner for my server, purple + teal, with my logo centered." maxlength="{details_max}" required>{details}</textarea>
                </div>
                <div class="form-actions">
                    <button class="hero-button" type="submit">Send</button>
                    <a class="outline-button" href="#top">Back to top</a>
                </div>
            </form>
        </div>
    </section>
    <div class="container">{footer}</div>"##,
        flash = render_flash(flash),
        name = escape_html(&form.name),
        contact = escape_html(&form.contact),
        details = escape_html(&form.details),
        name_max = NAME_MAX_CHARS,
        contact_max = CONTACT_MAX_CHARS,
        details_max = DETAILS_MAX_CHARS,
        footer = render_footer(owner),
    );

    let title = format!("{owner} · Portfolio");
    render_page(PageLayout {
        meta_title: &title,
        indexable: true,
        body_html: Cow::Owned(body),
        extra_style_blocks: vec![Cow::Borrowed(LANDING_STYLES)],
        body_scripts: Vec::new(),
    })
}

const LANDING_STYLES: &str = r#"
        .hero { padding: 5rem 1.5rem 3rem; }
        .hero h1 { font-size: clamp(2.2rem, 5vw, 3.4rem); margin: 0.5rem 0; letter-spacing: -0.02em; }
        .eyebrow { text-transform: uppercase; letter-spacing: 0.12em; font-size: 0.8rem; color: var(--accent); margin: 0; }
        .lead { max-width: 36rem; font-size: 1.1rem; }
        .hero-actions { display: flex; flex-wrap: wrap; align-items: center; gap: 1rem; margin-top: 1.5rem; }
        .community-badge { display: inline-flex; align-items: center; gap: 0.5rem; padding: 0.45rem 0.9rem; border-radius: 999px; border: 1px solid var(--border); color: var(--muted); font-size: 0.9rem; }
        .community-badge .dot { width: 0.55rem; height: 0.55rem; border-radius: 50%; background: #22c55e; box-shadow: 0 0 10px #22c55e; }
        .contact-section { border-top: 1px solid var(--border); padding: 4rem 0; }
        .contact-section h2 { font-size: 2rem; margin: 0; }
        .contact-grid { display: grid; gap: 2.5rem; grid-template-columns: 1fr 1fr; align-items: start; }
        .quick-start { margin-top: 1.5rem; }
        .quick-start-title { font-weight: 700; font-size: 1.1rem; }
        .quick-start ul { padding-left: 1.1rem; line-height: 1.8; }
        .form-actions { display: flex; flex-wrap: wrap; gap: 0.75rem; }
        @media (max-width: 768px) {
            .contact-grid { grid-template-columns: 1fr; }
            .hero { padding-top: 3rem; }
        }
"#;
