use atelier_core::documents::{CategoryLayout, GuestEntry};
use atelier_core::store::{BoxFuture, ContentStore, MemoryStore, PatchSet, StoreError, StoreResult};
use atelier_server::config::Config;
use atelier_server::mail::{Email, MailError, Mailer};
use atelier_server::{AppState, build_router};
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, email: &'a Email) -> BoxFuture<'a, Result<(), MailError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        })
    }
}

/// A store whose backend is down.
struct UnavailableStore;

impl ContentStore for UnavailableStore {
    fn create(&self, _document: Value) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async { Err(StoreError::Upstream("Insufficient permissions".into())) })
    }

    fn patch(&self, _id: &str, _set: PatchSet) -> BoxFuture<'_, StoreResult<Value>> {
        Box::pin(async { Err(StoreError::Upstream("Insufficient permissions".into())) })
    }

    fn guest_entries(&self, _limit: usize) -> BoxFuture<'_, StoreResult<Vec<GuestEntry>>> {
        Box::pin(async { Err(StoreError::Upstream("Dataset not found".into())) })
    }

    fn category_layout(&self, _slug: &str) -> BoxFuture<'_, StoreResult<Option<CategoryLayout>>> {
        Box::pin(async { Err(StoreError::Upstream("Dataset not found".into())) })
    }
}

struct TestApp {
    router: Router,
    store: Arc<MemoryStore>,
    mailer: Arc<RecordingMailer>,
}

fn seeded_store() -> MemoryStore {
    MemoryStore::with_documents([
        json!({ "_id": "cat1", "_type": "category", "title": "Bronze", "slug": { "current": "bronze" } }),
        json!({
            "_id": "abc", "_type": "sculpture", "title": "Torso",
            "category": { "_ref": "cat1", "_type": "reference" },
            "top": 10.0, "left": 20.0, "width": 200.0, "height": 150.0
        }),
        json!({ "_id": "g1", "_type": "guestEntry", "name": "Old", "message": "first", "createdAt": "2024-01-01T10:00:00.000Z" }),
        json!({ "_id": "g2", "_type": "guestEntry", "name": "New", "message": "second", "createdAt": "2024-03-01T10:00:00.000Z" }),
    ])
}

fn test_config() -> Config {
    Config {
        resend_email: Some("owner@example.com".into()),
        session_secret: "test-secret".into(),
        ..Config::default()
    }
}

fn app_with(config: Config) -> TestApp {
    let store = Arc::new(seeded_store());
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::new(store.clone(), mailer.clone(), config);
    TestApp {
        router: build_router(state),
        store,
        mailer,
    }
}

fn app() -> TestApp {
    app_with(test_config())
}

fn unavailable_app() -> Router {
    let state = AppState::new(
        Arc::new(UnavailableStore),
        Arc::new(RecordingMailer::default()),
        test_config(),
    );
    build_router(state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let response = send(&app.router, get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn dimensions_are_rounded_and_stored() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({ "id": "abc", "top": 12.345, "left": 5, "width": 100, "height": 50 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "message": "Dimensions updated" }));

    let stored = app.store.get("abc").unwrap();
    assert_eq!(stored["top"], json!(12.35));
    assert_eq!(stored["left"], json!(5.0));
    assert_eq!(stored["width"], json!(100.0));
    assert_eq!(stored["height"], json!(50.0));
    assert!(stored.get("left_percentage").is_none());
    assert_eq!(stored["title"], "Torso");
}

#[tokio::test]
async fn huge_dimension_values_are_stored_unrounded() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({ "id": "abc", "top": 1e307, "left": 5, "width": 100, "height": 50 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.store.get("abc").unwrap()["top"], json!(1e307));
}

#[tokio::test]
async fn dimensions_keep_supplied_percentages() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({
                "id": "abc", "top": 0, "left": 250, "width": 200, "height": 100,
                "left_percentage": "25.00%", "width_percentage": "20.00%"
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let stored = app.store.get("abc").unwrap();
    assert_eq!(stored["left_percentage"], "25.00%");
    assert_eq!(stored["width_percentage"], "20.00%");
}

#[tokio::test]
async fn dimensions_reject_invalid_input() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({ "id": "abc", "top": "12", "left": 5, "width": 100, "height": 50 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "message": "Invalid input" }));
    assert_eq!(app.store.get("abc").unwrap()["top"], json!(10.0));
}

#[tokio::test]
async fn store_failure_passes_upstream_message() {
    let router = unavailable_app();
    let response = send(
        &router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({ "id": "abc", "top": 1, "left": 5, "width": 100, "height": 50 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await, json!({ "message": "Insufficient permissions" }));

    let response = send(&router, get("/api/guestbook")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "Failed to fetch entries", "details": "Dataset not found" })
    );
}

#[tokio::test]
async fn unknown_sculpture_is_a_store_error() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateSculptureDimensions",
            json!({ "id": "missing", "top": 1, "left": 5, "width": 100, "height": 50 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn category_color_accepts_only_hex() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/updateCategoryColor",
            json!({ "id": "cat1", "background_color": { "hex": "#a1B2c3" } }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));
    assert_eq!(
        app.store.get("cat1").unwrap()["background_color"],
        json!({ "_type": "color", "hex": "#a1B2c3", "alpha": 1.0 })
    );

    for body in [
        json!({ "id": "cat1", "background_color": { "hex": "a1B2c3" } }),
        json!({ "id": "cat1", "background_color": { "hex": "#fff" } }),
        json!({ "id": "cat1", "background_color": "#a1B2c3" }),
        json!({ "background_color": { "hex": "#a1B2c3" } }),
    ] {
        let response = send(&app.router, post_json("/api/updateCategoryColor", body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid ID or background_color"));
    }
}

#[tokio::test]
async fn update_sculpture_title() {
    let app = app();
    let response = send(
        &app.router,
        post_json("/api/updateSculpture", json!({ "id": "abc", "newTitle": "Reclining Figure" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Document updated");
    assert_eq!(body["result"]["title"], "Reclining Figure");

    let response = send(&app.router, post_json("/api/updateSculpture", json!({ "id": "abc" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "message": "Missing id or newTitle" }));
}

#[tokio::test]
async fn guestbook_lists_newest_first() {
    let app = app();
    let response = send(&app.router, get("/api/guestbook")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["New", "Old"]);
}

#[tokio::test]
async fn guestbook_post_creates_entry() {
    let app = app();
    let response = send(
        &app.router,
        post_json("/api/guestbook", json!({ "name": "Ann", "message": "Lovely", "email_confirm": "" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert_eq!(created["_type"], "guestEntry");
    assert_eq!(created["name"], "Ann");
    assert!(created["_id"].is_string());

    let response = send(&app.router, get("/api/guestbook")).await;
    let entries = json_body(response).await;
    assert_eq!(entries[0]["name"], "Ann");
}

#[tokio::test]
async fn guestbook_honeypot_rejects_bots() {
    let app = app();
    let before = app.store.len();
    let response = send(
        &app.router,
        post_json(
            "/api/guestbook",
            json!({ "name": "Bot", "message": "Buy now", "email_confirm": "bot@spam.com" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Spam detected" }));
    assert_eq!(app.store.len(), before);

    for filled in [json!(true), json!(1), json!(["x"]), json!({ "a": 1 })] {
        let response = send(
            &app.router,
            post_json(
                "/api/guestbook",
                json!({ "name": "Bot", "message": "Buy now", "email_confirm": filled }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{filled}");
        assert_eq!(json_body(response).await, json!({ "error": "Spam detected" }));
    }
    assert_eq!(app.store.len(), before);

    for blank in [json!(false), json!(0), json!(""), Value::Null] {
        let response = send(
            &app.router,
            post_json(
                "/api/guestbook",
                json!({ "name": "Ann", "message": "Lovely", "email_confirm": blank }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK, "{blank}");
    }
    assert_eq!(app.store.len(), before + 4);

    let response = send(&app.router, post_json("/api/guestbook", json!({ "name": "Ann" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Missing name or message" }));
}

#[tokio::test]
async fn contact_sends_mail_and_stores_message() {
    let app = app();
    let response = send(
        &app.router,
        post_json(
            "/api/contact",
            json!({ "name": "Ann", "email": "ann@example.com", "message": "Commission?" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "success": true }));

    let sent = app.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "New message from Ann");
    assert_eq!(sent[0].reply_to, "ann@example.com");
    assert_eq!(app.store.documents_of_type("contactMessage").len(), 1);
}

#[tokio::test]
async fn contact_requires_all_fields() {
    let app = app();
    let response = send(
        &app.router,
        post_json("/api/contact", json!({ "name": "", "email": "a@b.com", "message": "hi" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Missing fields" }));
    assert!(app.mailer.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contact_without_recipient_is_a_server_error() {
    let app = app_with(Config {
        resend_email: None,
        ..test_config()
    });
    let response = send(
        &app.router,
        post_json("/api/contact", json!({ "name": "Ann", "email": "a@b.com", "message": "hi" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn category_layout_by_slug() {
    let app = app();
    let response = send(&app.router, get("/api/categories/bronze")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["category"]["title"], "Bronze");
    assert_eq!(body["category"]["slug"], "bronze");
    assert_eq!(body["sculptures"][0]["_id"], "abc");
    assert_eq!(body["sculptures"][0]["left"], json!(20.0));

    let response = send(&app.router, get("/api/categories/marble")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Category not found" }));
}

#[tokio::test]
async fn admin_requires_login() {
    let app = app();
    let response = send(&app.router, get("/sculptures-admin/bronze")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/login?redirect=%2Fsculptures-admin%2Fbronze"
    );

    let forged = Request::get("/sculptures-admin/bronze")
        .header(header::COOKIE, "sculpture_auth=mySecret123")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app.router, forged).await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn admin_prefix_and_deeper_paths_redirect() {
    let app = app();
    for (path, location) in [
        ("/sculptures-admin", "/login?redirect=%2Fsculptures-admin"),
        ("/sculptures-admin/", "/login?redirect=%2Fsculptures-admin%2F"),
        (
            "/sculptures-admin/bronze/edit",
            "/login?redirect=%2Fsculptures-admin%2Fbronze%2Fedit",
        ),
    ] {
        let response = send(&app.router, get(path)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.headers()[header::LOCATION], location);
    }

    let response = send(&app.router, get("/sculptures-administer")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_password_sets_no_cookie() {
    let app = app();
    let response = send(&app.router, post_json("/api/login", json!({ "password": "guess" }))).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(json_body(response).await, json!({ "success": false }));
}

#[tokio::test]
async fn login_cookie_opens_admin() {
    let app = app();
    let response = send(&app.router, post_json("/api/login", json!({ "password": "mySecret123" }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("sculpture_auth="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=28800"));
    assert_eq!(json_body(response).await, json!({ "success": true }));

    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let request = Request::get("/sculptures-admin/bronze")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let response = send(&app.router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["editable"], json!(true));
    assert_eq!(body["category"]["title"], "Bronze");
}
