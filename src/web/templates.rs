use std::borrow::Cow;

use chrono::{Datelike, Utc};

use crate::web::{Flash, render_flash};

const SITE_BASE_STYLES: &str = r#"
        :root { color-scheme: dark; --bg: #0b0b14; --card: rgba(24, 24, 40, 0.72); --border: rgba(148, 140, 255, 0.22); --fg: #f4f3ff; --muted: #a5a3c2; --primary: #8b7cff; --accent: #2dd4bf; }
        * { box-sizing: border-box; }
        body { font-family: "Inter", "Helvetica Neue", Arial, sans-serif; margin: 0; background: radial-gradient(circle at 20% 0%, #1d1640 0%, var(--bg) 55%); color: var(--fg); min-height: 100vh; }
        a { color: var(--primary); }
        .container { max-width: 1100px; margin: 0 auto; padding: 0 1.5rem; }
        .card { background: var(--card); border: 1px solid var(--border); border-radius: 24px; padding: 1.5rem; box-shadow: 0 24px 60px rgba(0, 0, 0, 0.35); backdrop-filter: blur(12px); }
        .muted { color: var(--muted); }
        .hero-button { display: inline-flex; align-items: center; gap: 0.4rem; padding: 0.75rem 1.25rem; border: none; border-radius: 12px; background: linear-gradient(120deg, var(--primary), var(--accent)); color: #0b0b14; font-weight: 700; cursor: pointer; text-decoration: none; }
        .hero-button:hover { filter: brightness(1.1); }
        .hero-button:disabled { opacity: 0.5; cursor: not-allowed; filter: none; }
        .outline-button { display: inline-flex; align-items: center; padding: 0.7rem 1.2rem; border-radius: 12px; border: 1px solid var(--border); background: rgba(255, 255, 255, 0.04); color: var(--fg); font-weight: 600; text-decoration: none; cursor: pointer; }
        label { display: block; font-size: 0.9rem; color: var(--muted); margin-bottom: 0.4rem; }
        input, textarea { width: 100%; padding: 0.75rem 0.9rem; border-radius: 12px; border: 1px solid var(--border); background: rgba(0, 0, 0, 0.25); color: var(--fg); font: inherit; }
        input:focus, textarea:focus { outline: none; border-color: var(--primary); box-shadow: 0 0 0 3px rgba(139, 124, 255, 0.25); }
        textarea { min-height: 7rem; resize: vertical; }
        .field { display: grid; gap: 0.25rem; margin-bottom: 1rem; }
        .flash { display: grid; gap: 0.2rem; padding: 0.9rem 1.1rem; border-radius: 14px; margin-bottom: 1.25rem; border: 1px solid transparent; }
        .flash.success { background: rgba(45, 212, 191, 0.12); border-color: rgba(45, 212, 191, 0.4); }
        .flash.error { background: rgba(248, 113, 113, 0.12); border-color: rgba(248, 113, 113, 0.45); }
        .app-footer { margin: 3rem 0 2rem; text-align: center; font-size: 0.85rem; color: var(--muted); }
"#;

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub indexable: bool,
    pub body_html: Cow<'a, str>,
    pub extra_style_blocks: Vec<Cow<'a, str>>,
    pub body_scripts: Vec<Cow<'a, str>>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        indexable,
        body_html,
        extra_style_blocks,
        body_scripts,
    } = layout;

    let styles = std::iter::once(Cow::Borrowed(SITE_BASE_STYLES))
        .chain(extra_style_blocks)
        .map(|block| block.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    let scripts = body_scripts
        .into_iter()
        .map(|script| script.into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    let robots = if indexable {
        "index,follow"
    } else {
        "noindex,nofollow"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="{robots}">
    <style>
{styles}
    </style>
</head>
<body id="top">
{body_html}
{scripts}
</body>
</html>"#,
        meta_title = escape_html(meta_title),
    )
}

pub fn render_login_page(owner: &str, flash: Option<&Flash>) -> String {
    let body = format!(
        r#"    <main class="login-shell">
        <form class="card login-card" method="post" action="/admin/login">
            <div class="lock-badge" aria-hidden="true">&#128274;</div>
            <h1>Admin Access</h1>
            <p class="muted">Enter the password to access the admin panel.</p>
            {flash}
            <input type="password" name="password" placeholder="Enter password" autocomplete="current-password" required autofocus>
            <button class="hero-button wide" type="submit">Unlock</button>
            <p class="back"><a href="/">&larr; Back to site</a></p>
        </form>
        {footer}
    </main>"#,
        flash = render_flash(flash),
        footer = render_footer(owner),
    );

    render_page(PageLayout {
        meta_title: "Admin Access",
        indexable: false,
        body_html: Cow::Owned(body),
        extra_style_blocks: vec![Cow::Borrowed(LOGIN_STYLES)],
        body_scripts: Vec::new(),
    })
}

const LOGIN_STYLES: &str = r#"
        .login-shell { min-height: 100vh; display: flex; flex-direction: column; align-items: center; justify-content: center; padding: 1.5rem; }
        .login-card { width: 100%; max-width: 420px; padding: 2rem; text-align: center; }
        .login-card h1 { margin: 0.5rem 0 0.25rem; font-size: 1.6rem; }
        .login-card input { margin-top: 1.25rem; }
        .lock-badge { margin: 0 auto; width: 4rem; height: 4rem; display: flex; align-items: center; justify-content: center; border-radius: 18px; background: linear-gradient(120deg, var(--primary), var(--accent)); font-size: 1.6rem; }
        .wide { width: 100%; justify-content: center; margin-top: 1rem; }
        .back { margin-top: 1.5rem; }
        .back a { color: var(--muted); text-decoration: none; }
"#;

pub fn render_footer(owner: &str) -> String {
    let current_year = Utc::now().year();
    format!(
        r#"<footer class="app-footer">&copy; {year} {owner}. All rights reserved.</footer>"#,
        year = current_year,
        owner = escape_html(owner),
    )
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
