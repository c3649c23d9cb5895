use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, contact, landing};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/contact", post(contact::submit))
        .route("/api/contact", post(contact::submit_json))
        .route("/api/discord/online", get(landing::community_online))
        .route("/admin", get(admin::dashboard))
        .route("/admin/login", post(auth::process_login))
        .route("/admin/logout", post(auth::logout))
        .route("/admin/reviews", post(admin::load_pending))
        .route("/admin/reviews/approve", post(admin::approve_review))
        .route("/admin/reviews/reject", post(admin::reject_review))
        .route("/admin/contacts", post(admin::load_contacts))
        .route("/admin/contacts/read", post(admin::mark_read))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use std::{
        net::SocketAddr,
        time::{Duration, Instant},
    };

    use reqwest::{Client, redirect::Policy};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;
    use wiremock::matchers::{body_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::{BackendSettings, DiscordSettings, SiteConfig};

    const PASSWORD: &str = "open sesame";

    struct TestSite {
        addr: SocketAddr,
        http: Client,
    }

    impl TestSite {
        async fn start(backend: &MockServer, discord: Option<&MockServer>) -> Self {
            let config = SiteConfig {
                port: 0,
                site_owner: "Luzi".to_string(),
                backend: BackendSettings {
                    base_url: backend.uri(),
                    anon_key: "anon-key".to_string(),
                    timeout: Duration::from_secs(5),
                },
                discord: discord.map(|server| DiscordSettings {
                    guild_id: "42".to_string(),
                    api_base: server.uri(),
                    timeout: Duration::from_millis(500),
                }),
                admin_password: PASSWORD.to_string(),
                session_ttl_hours: 1,
            };
            let state = AppState::new(&config).expect("state");
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            let addr = listener.local_addr().expect("addr");
            tokio::spawn(async move {
                axum::serve(listener, build_router(state)).await.expect("serve");
            });

            let http = Client::builder()
                .redirect(Policy::none())
                .build()
                .expect("client");
            Self { addr, http }
        }

        fn url(&self, path: &str) -> String {
            format!("http://{}{path}", self.addr)
        }

        async fn login(&self) -> String {
            let response = self
                .http
                .post(self.url("/admin/login"))
                .form(&[("password", PASSWORD)])
                .send()
                .await
                .expect("login");
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            let set_cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|value| value.to_str().ok())
                .expect("session cookie")
                .to_string();
            set_cookie
                .split(';')
                .next()
                .expect("cookie pair")
                .to_string()
        }

        async fn admin_post(&self, cookie: &str, path: &str, form: &[(&str, &str)]) -> (StatusCode, String) {
            let response = self
                .http
                .post(self.url(path))
                .header(header::COOKIE, cookie)
                .form(form)
                .send()
                .await
                .expect("admin post");
            let status = response.status();
            (status, response.text().await.expect("body"))
        }
    }

    fn pending_payload() -> Value {
        json!({
            "pending": [
                {
                    "id": "r-1",
                    "name": "Mika",
                    "rating": 5,
                    "design": "Server banner",
                    "body": "Fast and clean",
                    "created_at": "2024-05-01T08:00:00+00:00"
                },
                {
                    "id": "r-2",
                    "name": "Jo",
                    "rating": 3,
                    "design": null,
                    "body": "Nice colors",
                    "created_at": "2024-05-03T08:00:00+00:00"
                }
            ]
        })
    }

    #[tokio::test]
    async fn health_and_robots() {
        let backend = MockServer::start().await;
        let site = TestSite::start(&backend, None).await;

        let health = site.http.get(site.url("/healthz")).send().await.unwrap();
        assert_eq!(health.status(), StatusCode::OK);

        let robots = site.http.get(site.url("/robots.txt")).send().await.unwrap();
        assert!(robots.text().await.unwrap().contains("Disallow: /admin"));
    }

    #[tokio::test]
    async fn landing_renders_contact_form_and_community_badge() {
        let backend = MockServer::start().await;
        let discord = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/guilds/42/widget.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "presence_count": 57 })))
            .mount(&discord)
            .await;
        let site = TestSite::start(&backend, Some(&discord)).await;

        let html = site
            .http
            .get(site.url("/?status=sent"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(html.contains(r#"action="/contact""#));
        assert!(html.contains("Message sent!"));
        assert!(html.contains("50+ online"));

        let online: Value = site
            .http
            .get(site.url("/api/discord/online"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(online, json!({ "online": "50+" }));
    }

    #[tokio::test]
    async fn slow_widget_does_not_hold_landing_page() {
        let backend = MockServer::start().await;
        let discord = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/guilds/42/widget.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "presence_count": 57 }))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&discord)
            .await;
        let site = TestSite::start(&backend, Some(&discord)).await;

        let started = Instant::now();
        let response = site.http.get(site.url("/")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.text().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(html.contains(r#"action="/contact""#));
        assert!(!html.contains("online in the community"));
    }

    #[tokio::test]
    async fn community_endpoint_is_404_without_guild() {
        let backend = MockServer::start().await;
        let site = TestSite::start(&backend, None).await;
        let response = site.http.get(site.url("/api/discord/online")).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_contact_is_rejected_before_backend() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contact_submissions"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;

        let response = site
            .http
            .post(site.url("/contact"))
            .form(&[("name", "Ada"), ("contact", "   "), ("details", "banner")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = response.text().await.unwrap();
        assert!(html.contains("Missing fields"));
        assert!(html.contains(r#"value="Ada""#));

        let long_name = "n".repeat(101);
        let response = site
            .http
            .post(site.url("/api/contact"))
            .json(&json!({ "name": long_name, "contact": "c", "details": "d" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Please shorten your input.");
    }

    #[tokio::test]
    async fn valid_contact_is_trimmed_and_stored() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contact_submissions"))
            .and(body_json(json!({
                "name": "Ada",
                "contact": "@ada",
                "details": "Neon banner"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(2)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;

        let response = site
            .http
            .post(site.url("/contact"))
            .form(&[("name", " Ada "), ("contact", "@ada"), ("details", " Neon banner\n")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/?status=sent#contact"
        );

        let response = site
            .http
            .post(site.url("/api/contact"))
            .json(&json!({ "name": "Ada", "contact": "@ada", "details": "Neon banner" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn backend_failure_keeps_form_values() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contact_submissions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;

        let response = site
            .http
            .post(site.url("/contact"))
            .form(&[("name", "Ada"), ("contact", "@ada"), ("details", "Neon banner")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let html = response.text().await.unwrap();
        assert!(html.contains("Request failed (503)"));
        assert!(html.contains("Neon banner</textarea>"));
    }

    #[tokio::test]
    async fn api_contact_reports_backend_failure_as_message() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contact_submissions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(1)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;

        let response = site
            .http
            .post(site.url("/api/contact"))
            .json(&json!({ "name": "Ada", "contact": "@ada", "details": "Neon banner" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "message": "Request failed (503)" }));
    }

    #[tokio::test]
    async fn api_contact_rejects_unreadable_bodies_as_message() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/contact_submissions"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;

        let malformed = site
            .http
            .post(site.url("/api/contact"))
            .header(header::CONTENT_TYPE, "application/json")
            .body("{\"name\": ")
            .send()
            .await
            .unwrap();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        let body: Value = malformed.json().await.unwrap();
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

        let untyped = site
            .http
            .post(site.url("/api/contact"))
            .body("name=Ada")
            .send()
            .await
            .unwrap();
        assert_eq!(untyped.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body: Value = untyped.json().await.unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn admin_requires_password() {
        let backend = MockServer::start().await;
        let site = TestSite::start(&backend, None).await;

        let gate = site.http.get(site.url("/admin")).send().await.unwrap();
        assert_eq!(gate.status(), StatusCode::OK);
        assert!(gate.text().await.unwrap().contains("Admin Access"));

        let wrong = site
            .http
            .post(site.url("/admin/login"))
            .form(&[("password", "nope")])
            .send()
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong.headers().get(header::SET_COOKIE).is_none());

        let anonymous = site
            .http
            .post(site.url("/admin/reviews"))
            .form(&[("admin_key", "k")])
            .send()
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            anonymous.headers().get(header::LOCATION).unwrap(),
            "/admin?error=session_expired"
        );

        let cookie = site.login().await;
        let dashboard = site
            .http
            .get(site.url("/admin?status=welcome"))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(dashboard.contains("Admin Dashboard"));
        assert!(dashboard.contains("Access granted."));
    }

    #[tokio::test]
    async fn blank_admin_key_never_reaches_backend() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;

        let (status, html) = site
            .admin_post(&cookie, "/admin/contacts", &[("admin_key", "   ")])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("Enter your admin key first."));
    }

    #[tokio::test]
    async fn approve_drops_review_and_keeps_key_out_of_cookies() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(header_eq("x-admin-key", "admin-secret"))
            .and(body_json(json!({ "action": "approve", "id": "r-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&backend)
            .await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(header_eq("x-admin-key", "admin-secret"))
            .and(body_json(json!({ "action": "list_pending" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(pending_payload()))
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;
        assert!(!cookie.contains("admin-secret"));

        let (status, html) = site
            .admin_post(&cookie, "/admin/reviews", &[("admin_key", " admin-secret ")])
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Pending Reviews (2)"));
        assert!(html.contains("Server banner • 5/5 • 2024-05-01"));

        let response = site
            .http
            .post(site.url("/admin/reviews/approve"))
            .header(header::COOKIE, &cookie)
            .form(&[("admin_key", "admin-secret"), ("id", "r-1")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let html = response.text().await.unwrap();
        assert!(html.contains("Review is now public."));
        assert!(html.contains("Pending Reviews (1)"));
        assert!(!html.contains(r#"value="r-1""#));
        assert!(html.contains(r#"value="admin-secret""#));
    }

    #[tokio::test]
    async fn reject_deletes_review_and_dashboard_is_not_cached() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(body_json(json!({ "action": "reject", "id": "r-2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&backend)
            .await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(body_json(json!({ "action": "list_pending" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(pending_payload()))
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;

        let response = site
            .http
            .post(site.url("/admin/reviews/reject"))
            .header(header::COOKIE, &cookie)
            .form(&[("admin_key", "k"), ("id", "r-2")])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
        let html = response.text().await.unwrap();
        assert!(html.contains("Rejected"));
        assert!(html.contains("Review has been deleted."));
        assert!(html.contains("Pending Reviews (1)"));
        assert!(!html.contains(r#"value="r-2""#));
        assert!(html.contains(r#"value="r-1""#));
    }

    #[tokio::test]
    async fn moderation_without_id_is_a_bad_request() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(0)
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;

        let (status, html) = site
            .admin_post(&cookie, "/admin/reviews/approve", &[("admin_key", "k")])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("No record was selected."));

        let (status, html) = site
            .admin_post(&cookie, "/admin/contacts/read", &[("admin_key", "k"), ("id", "  ")])
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("No record was selected."));
    }

    #[tokio::test]
    async fn mark_read_flags_contact_and_errors_surface() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(body_json(json!({ "action": "mark_read", "id": "c-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&backend)
            .await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(body_json(json!({ "action": "list_contacts" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "contacts": [{
                    "id": "c-1",
                    "name": "Ada",
                    "contact": "@ada",
                    "details": "Neon banner",
                    "created_at": "2024-05-02T09:30:00+00:00",
                    "read": false
                }]
            })))
            .mount(&backend)
            .await;
        Mock::given(method("POST"))
            .and(path("/functions/v1/reviews-admin"))
            .and(body_json(json!({ "action": "reject", "id": "r-9" })))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Invalid admin key" })))
            .mount(&backend)
            .await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;

        let (status, html) = site
            .admin_post(&cookie, "/admin/contacts/read", &[("admin_key", "k"), ("id", "c-1")])
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Contact Submissions (0 unread)"));
        assert!(!html.contains("Mark read</button>"));
        assert!(html.contains("<h2>Pending Reviews</h2>"));
        assert!(!html.contains("Pending Reviews (0)"));

        let (status, html) = site
            .admin_post(&cookie, "/admin/reviews/reject", &[("admin_key", "k"), ("id", "r-9")])
            .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(html.contains("Admin error"));
        assert!(html.contains("Invalid admin key"));
    }

    #[tokio::test]
    async fn logout_ends_session() {
        let backend = MockServer::start().await;
        let site = TestSite::start(&backend, None).await;
        let cookie = site.login().await;

        let response = site
            .http
            .post(site.url("/admin/logout"))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let html = site
            .http
            .get(site.url("/admin"))
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(html.contains("Admin Access"));
    }
}
