//! HTTP-level tests: session login, permission guards, the JSON content-type
//! CSRF guard, and the suggestion lifecycle driven through the API.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, cookie::Key, test, web};
use chrono::Utc;

use ideabox::auth::password;
use ideabox::models::user::{self, NewUser};
use ideabox::{auth, db, handlers};
use common::setup_test_db;

macro_rules! init_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool.clone()))
                .route("/login", web::post().to(handlers::auth_handlers::login))
                .route("/logout", web::post().to(handlers::auth_handlers::logout))
                .service(
                    web::scope("/api/v1")
                        .wrap(actix_web::middleware::from_fn(
                            auth::middleware::require_json_content_type,
                        ))
                        .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                        .configure(handlers::configure),
                ),
        )
        .await
    };
}

macro_rules! login {
    ($app:expr, $username:expr, $password:expr) => {{
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "username": $username, "password": $password }))
            .to_request();
        let resp = test::call_service($app, req).await;
        assert!(resp.status().is_success(), "login failed: {}", resp.status());
        resp.response()
            .cookies()
            .find(|c| c.name() == "id")
            .expect("session cookie")
            .into_owned()
    }};
}

#[actix_rt::test]
async fn test_login_rejects_bad_credentials() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    db::seed_admin(pool, "admin123").await;
    let app = init_app!(pool);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(serde_json::json!({ "username": "admin", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_api_requires_session() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    let app = init_app!(pool);

    let req = test::TestRequest::get().uri("/api/v1/suggestions").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_mutations_require_json_content_type() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    db::seed_admin(pool, "admin123").await;
    let app = init_app!(pool);

    let cookie = login!(&app, "admin", "admin123");
    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions/1/submit")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_create_requires_permission() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    // A viewer without suggestion.create
    user::create(
        pool,
        &NewUser {
            username: "viewer".to_string(),
            password: password::hash_password("pass").unwrap(),
            email: String::new(),
            display_name: "Viewer".to_string(),
            permissions: "suggestion.view".to_string(),
        },
    )
    .await
    .unwrap();
    let app = init_app!(pool);

    let cookie = login!(&app, "viewer", "pass");
    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions")
        .cookie(cookie)
        .set_json(serde_json::json!({
            "title": "Not allowed",
            "description": "Viewer cannot create",
            "category": "other",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);
}

#[actix_rt::test]
async fn test_suggestion_lifecycle_over_http() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    db::seed_admin(pool, "admin123").await;
    let app = init_app!(pool);
    let cookie = login!(&app, "admin", "admin123");

    // Create
    let req = test::TestRequest::post()
        .uri("/api/v1/suggestions")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({
            "title": "Reduce waste",
            "description": "Use reusable cups",
            "category": "cost_saving",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "draft");
    assert_eq!(body["display_label"], "[DRAFT] Reduce waste");
    assert_eq!(body["processing_days"], 0);

    // Submit
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/suggestions/{id}/submit"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "submitted");
    assert_eq!(body["display_label"], "[SUBMITTED] Reduce waste");

    // Accept without assignee: validation error, status untouched
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/suggestions/{id}/accept"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Assign"));

    // Create a reviewer to assign
    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .cookie(cookie.clone())
        .set_json(serde_json::json!({
            "username": "reviewer",
            "password": "pass",
            "display_name": "Reviewer",
            "permissions": "suggestion.view,suggestion.review",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let reviewer_id = body["id"].as_i64().unwrap();

    // Assign via the generic write path
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/suggestions/{id}"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({ "assignee_id": reviewer_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["assignee_name"], "Reviewer");

    // Accept
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/suggestions/{id}/accept"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["processed_on"], Utc::now().date_naive().to_string());
    assert_eq!(body["processing_days"], 0);

    // Thread carries the creation, assignment and decision messages
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/suggestions/{id}/messages"))
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let subjects: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["subject"].as_str().unwrap())
        .collect();
    assert_eq!(
        subjects,
        vec!["New suggestion", "New assignment", "Suggestion accepted"]
    );

    // Name search over the list endpoint
    let req = test::TestRequest::get()
        .uri("/api/v1/suggestions?q=reduce&status=accepted")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total_count"], 1);

    // Archive
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/suggestions/{id}"))
        .cookie(cookie.clone())
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/v1/suggestions")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["total_count"], 0);
}

#[actix_rt::test]
async fn test_unknown_status_filter_is_validation_error() {
    let test_db = setup_test_db().await;
    let pool = test_db.pool();
    db::seed_admin(pool, "admin123").await;
    let app = init_app!(pool);
    let cookie = login!(&app, "admin", "admin123");

    let req = test::TestRequest::get()
        .uri("/api/v1/suggestions?status=bogus")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}
