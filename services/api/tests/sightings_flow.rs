//! End-to-end tests for the sightings router
//!
//! These tests require running PostgreSQL and Redis instances:
//! docker run -d -p 5432:5432 -e POSTGRES_PASSWORD=postgres postgres:16
//! docker run -d -p 6379:6379 redis:7

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serial_test::serial;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use api::{AppState, repositories::SightingRepository, routes::create_router};
use common::{cache, database, session::SessionStore};

struct TestContext {
    app: Router,
    pool: PgPool,
    sessions: SessionStore,
}

async fn setup() -> TestContext {
    let db_config = database::DatabaseConfig::from_env().expect("database config");
    let pool = database::init_pool(&db_config).await.expect("pg pool");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            last_login_at TIMESTAMPTZ,
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("create users table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sightings (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL,
            animal_name TEXT NOT NULL,
            location TEXT NOT NULL,
            timestamp_sighted TIMESTAMPTZ NOT NULL,
            photo_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("create sightings table");

    let redis_config = cache::RedisConfig::from_env().expect("redis config");
    let redis_pool = cache::RedisPool::new(&redis_config).await.expect("redis pool");
    let sessions = SessionStore::new(redis_pool, common::session::SessionConfig::default());

    let app = create_router(AppState {
        db_pool: pool.clone(),
        sightings: SightingRepository::new(pool.clone()),
        sessions: sessions.clone(),
        cookie_secure: false,
    });

    TestContext {
        app,
        pool,
        sessions,
    }
}

/// Insert an account directly and return a signed-in cookie for it
async fn signed_in_user(ctx: &TestContext) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(format!("user-{}@example.com", user_id.simple()))
        .bind("unused")
        .execute(&ctx.pool)
        .await
        .expect("insert user");

    let token = ctx.sessions.create(user_id).await.expect("create session");
    (user_id, format!("session={token}"))
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_sighting(
    ctx: &TestContext,
    cookie: &str,
    animal_name: &str,
    location: &str,
    photo_url: Option<&str>,
) -> serde_json::Value {
    let mut payload = serde_json::json!({
        "animal_name": animal_name,
        "location": location,
    });
    if let Some(photo_url) = photo_url {
        payload["photo_url"] = serde_json::json!(photo_url);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/sightings",
            Some(cookie),
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
#[serial]
async fn test_create_and_list_scoped_to_owner() {
    let ctx = setup().await;
    let (user_id, cookie) = signed_in_user(&ctx).await;
    let (_, other_cookie) = signed_in_user(&ctx).await;

    let created = create_sighting(&ctx, &cookie, "Red Fox", "Golden Gate Park", None).await;
    let sighting = &created["sighting"];
    assert_eq!(sighting["animal_name"], "Red Fox");
    assert_eq!(sighting["user_id"], user_id.to_string());
    assert!(sighting["timestamp_sighted"].is_string());
    assert!(sighting.get("deleted_at").is_none());

    create_sighting(&ctx, &cookie, "Mule Deer", "Twin Peaks", None).await;
    create_sighting(&ctx, &other_cookie, "Coyote", "Marin Headlands", None).await;

    // Each account lists only its own records, newest first
    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/sightings", Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let sightings = body["sightings"].as_array().unwrap();
    assert!(
        sightings
            .iter()
            .all(|s| s["user_id"] == user_id.to_string())
    );
    assert_eq!(sightings.len(), 2);
    assert_eq!(sightings[0]["animal_name"], "Mule Deer");
    assert_eq!(sightings[1]["animal_name"], "Red Fox");
    assert!(!sightings.iter().any(|s| s["animal_name"] == "Coyote"));
}

#[tokio::test]
#[serial]
async fn test_foreign_sighting_is_forbidden_not_hidden() {
    let ctx = setup().await;
    let (_, owner_cookie) = signed_in_user(&ctx).await;
    let (_, intruder_cookie) = signed_in_user(&ctx).await;

    let created = create_sighting(&ctx, &owner_cookie, "Bobcat", "Mount Tamalpais", None).await;
    let id = created["sighting"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sightings/{id}");

    // Someone else's record answers 403
    for (method, body) in [
        (Method::GET, None),
        (Method::PATCH, Some(serde_json::json!({"location": "x"}))),
        (Method::DELETE, None),
    ] {
        let response = ctx
            .app
            .clone()
            .oneshot(request(method, &uri, Some(&intruder_cookie), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Not authorized to access this sighting");
    }

    // A record that never existed answers 404
    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/sightings/{}", Uuid::new_v4()),
            Some(&intruder_cookie),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The rejected PATCH and DELETE left the record untouched
    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::GET, &uri, Some(&owner_cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sighting"]["animal_name"], "Bobcat");
    assert_eq!(body["sighting"]["location"], "Mount Tamalpais");
}

#[tokio::test]
#[serial]
async fn test_patch_merges_and_clears_photo() {
    let ctx = setup().await;
    let (_, cookie) = signed_in_user(&ctx).await;

    let created = create_sighting(
        &ctx,
        &cookie,
        "Great Horned Owl",
        "Presidio",
        Some("data:image/jpeg;base64,AAAA"),
    )
    .await;
    let id = created["sighting"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sightings/{id}");

    // Updating one field leaves the others, photo included, alone
    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&cookie),
            Some(serde_json::json!({"location": "  Lands End  "})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sighting"]["location"], "Lands End");
    assert_eq!(body["sighting"]["animal_name"], "Great Horned Owl");
    assert_eq!(body["sighting"]["photo_url"], "data:image/jpeg;base64,AAAA");

    // An explicit null clears the photo
    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&cookie),
            Some(serde_json::json!({"photo_url": null})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["sighting"].get("photo_url").is_none());

    // An empty payload is rejected outright
    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&cookie),
            Some(serde_json::json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No fields to update");

    // Present but invalid fields fail validation
    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&cookie),
            Some(serde_json::json!({"photo_url": "https://example.com/owl.jpg"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["details"]["photo_url"].is_string());
}

#[tokio::test]
#[serial]
async fn test_delete_hides_sighting_everywhere() {
    let ctx = setup().await;
    let (_, cookie) = signed_in_user(&ctx).await;

    let created = create_sighting(&ctx, &cookie, "River Otter", "Crissy Field", None).await;
    let id = created["sighting"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/sightings/{id}");

    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::DELETE, &uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone from direct fetch, from the list, and from a second delete
    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::GET, &uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::GET, "/api/sightings", Some(&cookie), None))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert!(
        !body["sightings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["id"] == id.as_str())
    );

    let response = ctx
        .app
        .clone()
        .oneshot(request(Method::DELETE, &uri, Some(&cookie), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_create_validation_details() {
    let ctx = setup().await;
    let (_, cookie) = signed_in_user(&ctx).await;

    let response = ctx
        .app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/sightings",
            Some(&cookie),
            Some(serde_json::json!({"animal_name": "   ", "location": ""})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["details"]["animal_name"].is_string());
    assert!(body["details"]["location"].is_string());
}

#[tokio::test]
#[serial]
async fn test_all_routes_require_session() {
    let ctx = setup().await;
    let id = Uuid::new_v4();
    let uri = format!("/api/sightings/{id}");

    let requests = [
        request(Method::GET, "/api/sightings", None, None),
        request(
            Method::POST,
            "/api/sightings",
            None,
            Some(serde_json::json!({"animal_name": "Fox", "location": "Park"})),
        ),
        request(Method::GET, &uri, None, None),
        request(
            Method::PATCH,
            &uri,
            Some("session=garbage"),
            Some(serde_json::json!({"location": "x"})),
        ),
        request(Method::DELETE, &uri, None, None),
    ];

    for req in requests {
        let response = ctx.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
