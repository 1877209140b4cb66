use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use brandkit_server::{
    auth::Role,
    config::{Config, StorageKind},
    test_utils::{
        app::TestApp,
        http::{map_response, TestHttpApp},
    },
};
use brandkit_types::{ErrorResponse, HealthResponse, ThemeSettings};
use serde_json::json;

#[tokio::test]
async fn http_not_found() {
    let mut app = TestHttpApp::new().await;

    let response = app.get("/does_not_exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: ErrorResponse = map_response(response).await;
    assert_eq!(body.error, "Not found");
}

#[tokio::test]
async fn http_config() {
    let mut app = TestHttpApp::new().await;

    let response = app.get("/config").await;
    assert!(response.status().is_success());

    let config: Config = map_response(response).await;
    assert_eq!(config.port, app.inner.config.port);
    assert_eq!(config.granted_role, Role::SuperAdmin);
}

#[tokio::test]
async fn http_config_hides_bearer_token() {
    let mut cli_args = TestApp::zeroed_cli_args();
    cli_args.bearer_token = Some("s3cr3t".to_string());
    let mut app = TestHttpApp::new_with_args(cli_args).await;

    let response = app.get("/config").await;
    let body: serde_json::Value = map_response(response).await;

    assert!(body.get("bearer_token").is_none());
}

#[tokio::test]
async fn http_health() {
    let mut app = TestHttpApp::new().await;

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let health: HealthResponse = map_response(response).await;
    assert!(health.healthy);
    assert_eq!(health.settings_version, 0);
}

#[tokio::test]
async fn get_theme_returns_defaults() {
    let mut app = TestHttpApp::new().await;

    let response = app.get("/theme").await;
    assert_eq!(response.status(), StatusCode::OK);

    let settings: ThemeSettings = map_response(response).await;
    assert_eq!(settings.primary_color.as_str(), "#465fff");
    assert_eq!(settings.secondary_color.as_str(), "#ee46bc");
    assert_eq!(settings.tertiary_color.as_str(), "#91ff47");
    assert_eq!(settings.success_color.as_str(), "#12b76a");
    assert_eq!(settings.error_color.as_str(), "#f04438");
    assert_eq!(settings.warning_color.as_str(), "#f79009");
    assert_eq!(settings.version, 0);
}

#[tokio::test]
async fn put_theme_merges_and_stamps() {
    let mut app = TestHttpApp::new().await;

    let before: ThemeSettings = map_response(app.get("/theme").await).await;

    let response = app
        .put_json("/theme", &json!({ "primaryColor": "#abc123" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let after: ThemeSettings = map_response(response).await;
    assert_eq!(after.primary_color.as_str(), "#abc123");
    assert_eq!(after.secondary_color, before.secondary_color);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.version, before.version + 1);

    // and it sticks
    let fetched: ThemeSettings = map_response(app.get("/theme").await).await;
    assert_eq!(fetched, after);
}

#[tokio::test]
async fn put_theme_accepts_shorthand_and_keeps_casing() {
    let mut app = TestHttpApp::new().await;

    let response = app
        .put_json("/theme", &json!({ "tertiaryColor": "#AbC" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let settings: ThemeSettings = map_response(response).await;
    assert_eq!(settings.tertiary_color.as_str(), "#AbC");
}

#[tokio::test]
async fn put_theme_invalid_color_is_rejected() {
    let mut app = TestHttpApp::new().await;

    let before: ThemeSettings = map_response(app.get("/theme").await).await;

    let response = app
        .put_json("/theme", &json!({ "primaryColor": "not-a-color" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = map_response(response).await;
    assert_eq!(body.error, "Invalid primary color format");

    // every color field is checked, not just the first two
    let response = app
        .put_json(
            "/theme",
            &json!({ "secondaryColor": "#123456", "warningColor": "#12" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = map_response(response).await;
    assert_eq!(body.error, "Invalid warning color format");

    let after: ThemeSettings = map_response(app.get("/theme").await).await;
    assert_eq!(after, before);
}

#[tokio::test]
async fn put_theme_unknown_field_is_rejected() {
    let mut app = TestHttpApp::new().await;

    let response = app
        .put_json("/theme", &json!({ "fontFamily": "Comic Sans" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorResponse = map_response(response).await;
    assert!(body.error.contains("fontFamily"));
}

#[tokio::test]
async fn put_theme_malformed_json_is_rejected() {
    let mut app = TestHttpApp::new().await;

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/theme")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"primaryColor\":"))
        .unwrap();

    let response = app.call(req).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_theme_ignores_store_owned_fields() {
    let mut app = TestHttpApp::new().await;

    let response = app
        .put_json(
            "/theme",
            &json!({
                "errorColor": "#000000",
                "updatedAt": "1999-01-01T00:00:00Z",
                "version": 99,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let settings: ThemeSettings = map_response(response).await;
    assert_eq!(settings.version, 1);
    assert!(settings.updated_at.timestamp() > 946_684_800);
}

#[tokio::test]
async fn put_theme_stale_version_conflicts() {
    let mut app = TestHttpApp::new().await;

    let first = app
        .put_json(
            "/theme",
            &json!({ "primaryColor": "#111111", "expectedVersion": 0 }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    let current: ThemeSettings = map_response(first).await;

    let second = app
        .put_json(
            "/theme",
            &json!({ "primaryColor": "#222222", "expectedVersion": 0 }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let after: ThemeSettings = map_response(app.get("/theme").await).await;
    assert_eq!(after, current);
}

#[tokio::test]
async fn put_theme_requires_role() {
    let mut cli_args = TestApp::zeroed_cli_args();
    cli_args.granted_role = Some(Role::Admin);
    let mut app = TestHttpApp::new_with_args(cli_args).await;

    let response = app
        .put_json("/theme", &json!({ "primaryColor": "#abc123" }))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body: ErrorResponse = map_response(response).await;
    assert_eq!(body.error, "Requires the super_admin role");

    // reading is still fine
    assert_eq!(app.get("/theme").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn put_theme_bearer_token() {
    let mut cli_args = TestApp::zeroed_cli_args();
    cli_args.bearer_token = Some("s3cr3t".to_string());
    let mut app = TestHttpApp::new_with_args(cli_args).await;

    let response = app
        .put_json("/theme", &json!({ "primaryColor": "#abc123" }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/theme")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer s3cr3t")
        .body(Body::from(r##"{"primaryColor":"#abc123"}"##))
        .unwrap();
    let response = app.call(req).await;
    assert_eq!(response.status(), StatusCode::OK);

    // reads never need the token
    assert_eq!(app.get("/theme").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn file_storage_survives_restart() {
    let cli_args = TestApp::zeroed_cli_args();
    let data = cli_args.data.clone();
    let mut app = TestHttpApp::new_with_args(cli_args).await;
    assert_eq!(app.inner.config.storage, StorageKind::File);

    let saved: ThemeSettings = map_response(
        app.put_json("/theme", &json!({ "successColor": "#00ff00" }))
            .await,
    )
    .await;

    let mut cli_args = TestApp::zeroed_cli_args();
    cli_args.data = data;
    let mut restarted = TestHttpApp::new_with_args(cli_args).await;

    let fetched: ThemeSettings = map_response(restarted.get("/theme").await).await;
    assert_eq!(fetched, saved);
}

#[tokio::test]
async fn memory_storage_starts_fresh() {
    let mut cli_args = TestApp::zeroed_cli_args();
    cli_args.storage = Some(StorageKind::Memory);
    let mut app = TestHttpApp::new_with_args(cli_args).await;

    let settings: ThemeSettings = map_response(app.get("/theme").await).await;
    assert_eq!(settings, {
        let mut expected = ThemeSettings::default();
        expected.updated_at = settings.updated_at;
        expected
    });
}

#[tokio::test]
async fn openapi_doc_lists_theme_routes() {
    let mut app = TestHttpApp::new().await;

    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let doc: serde_json::Value = map_response(response).await;
    assert!(doc["paths"]["/theme"]["get"].is_object());
    assert!(doc["paths"]["/theme"]["put"].is_object());
}
