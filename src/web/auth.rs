use std::{collections::HashMap, sync::Arc};

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::web::{AppState, Flash, render_login_page};

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_COOKIE_PATH: &str = "/admin";

#[derive(Deserialize)]
pub struct LoginForm {
    pub password: String,
}

/// Admin sessions held in memory. A restart signs everyone out.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, DateTime<Utc>>>>,
}

impl SessionStore {
    pub async fn create(&self, ttl: ChronoDuration) -> Uuid {
        let token = Uuid::new_v4();
        let expires_at = Utc::now() + ttl;
        self.sessions.write().await.insert(token, expires_at);
        token
    }

    pub async fn is_active(&self, token: Uuid) -> bool {
        let guard = self.sessions.read().await;
        guard
            .get(&token)
            .is_some_and(|expires_at| *expires_at > Utc::now())
    }

    pub async fn revoke(&self, token: Uuid) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    /// Drops expired sessions and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut guard = self.sessions.write().await;
        let before = guard.len();
        guard.retain(|_, expires_at| *expires_at > now);
        before - guard.len()
    }

    #[cfg(test)]
    pub async fn insert_with_expiry(&self, expires_at: DateTime<Utc>) -> Uuid {
        let token = Uuid::new_v4();
        self.sessions.write().await.insert(token, expires_at);
        token
    }
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    if !verify_password(&form.password, state.admin_password_hash()) {
        warn!("rejected admin login attempt");
        return Err(invalid_password(state.site_owner()));
    }

    let ttl_hours = state.session_ttl_hours();
    let token = state
        .sessions()
        .create(ChronoDuration::hours(ttl_hours))
        .await;
    info!("admin session started");

    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path(SESSION_COOKIE_PATH);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::hours(ttl_hours));

    Ok((jar.add(cookie), Redirect::to("/admin?status=welcome")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(token) = session_token(&jar) {
        state.sessions().revoke(token).await;
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path(SESSION_COOKIE_PATH);
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));

    (jar.remove(removal), Redirect::to("/admin?status=logged_out"))
}

/// Whether the request carries a live admin session.
pub async fn has_admin_session(state: &AppState, jar: &CookieJar) -> bool {
    match session_token(jar) {
        Some(token) => state.sessions().is_active(token).await,
        None => false,
    }
}

/// Gate for admin actions; unauthenticated callers are sent back to the password page.
pub async fn require_admin_session(state: &AppState, jar: &CookieJar) -> Result<(), Redirect> {
    if has_admin_session(state, jar).await {
        Ok(())
    } else {
        Err(Redirect::to("/admin?error=session_expired"))
    }
}

fn session_token(jar: &CookieJar) -> Option<Uuid> {
    let cookie = jar.get(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value()).ok()
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

fn invalid_password(owner: &str) -> (StatusCode, Html<String>) {
    let flash = Flash::error("Invalid password", "Please try again.");
    (
        StatusCode::UNAUTHORIZED,
        Html(render_login_page(owner, Some(&flash))),
    )
}
