use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

async fn test_router() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    server::seed_default_admin(&db).await.unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    let state = server::ServerState::new(
        engine,
        db,
        &server::SessionConfig {
            secret_key: TEST_SECRET.to_string(),
            session_hours: 2,
        },
    )
    .unwrap();
    server::router(state)
}

fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = session {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

async fn login(router: &Router) -> String {
    let response = router
        .clone()
        .oneshot(form_request("/login", "username=admin&password=admin123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login must set a session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn with_session(mut request: Request<Body>, session: &str) -> Request<Body> {
    request
        .headers_mut()
        .insert(header::COOKIE, session.parse().unwrap());
    request
}

#[tokio::test]
async fn admin_seeding_is_idempotent() {
    let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    server::seed_default_admin(&db).await.unwrap();
    // A second startup against the same database must not insert again.
    server::seed_default_admin(&db).await.unwrap();

    let engine = engine::Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    let state = server::ServerState::new(
        engine,
        db,
        &server::SessionConfig {
            secret_key: TEST_SECRET.to_string(),
            session_hours: 2,
        },
    )
    .unwrap();
    let router = server::router(state);
    login(&router).await;
}

#[tokio::test]
async fn requests_without_a_session_are_rejected() {
    let router = test_router().await;

    let response = router.oneshot(get_request("/ministers", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_credentials_are_rejected() {
    let router = test_router().await;

    let response = router
        .oneshot(form_request("/login", "username=admin&password=wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seeded_admin_can_log_in_and_read_data() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(get_request("/ministers", Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn logout_drops_the_session_cookie() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(get_request("/logout", Some(&session)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let removal = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(removal.starts_with("session="));
}

#[tokio::test]
async fn minister_crud_roundtrip() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/ministers/add",
                "full_name=Grace%20Achieng&department=Choir&date_joined=2023-05-01",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["full_name"], "Grace Achieng");
    assert_eq!(created["total_savings"], 0.0);
    let id = created["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(get_request("/ministers?search=choir", Some(&session)))
        .await
        .unwrap();
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                &format!("/ministers/edit/{id}"),
                "full_name=Grace%20Achieng&department=Ushering&date_joined=2023-05-01",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["department"], "Ushering");

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(&format!("/ministers/delete/{id}"), ""),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .clone()
        .oneshot(get_request("/ministers", Some(&session)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, serde_json::json!([]));
}

#[tokio::test]
async fn recording_a_payment_updates_the_dashboard() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/ministers/add",
                "full_name=Grace%20Achieng&date_joined=2023-05-01",
            ),
            &session,
        ))
        .await
        .unwrap();
    let minister_id = body_json(response).await["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/payments/add",
                &format!("minister_id={minister_id}&amount=100.0&payment_date=2024-01-07"),
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let payment = body_json(response).await;
    assert_eq!(payment["minister_name"], "Grace Achieng");
    assert_eq!(payment["week_number"], 1);

    let response = router
        .clone()
        .oneshot(get_request("/dashboard", Some(&session)))
        .await
        .unwrap();
    let dashboard = body_json(response).await;
    assert_eq!(dashboard["total_ministers"], 1);
    assert_eq!(dashboard["total_savings"], 100.0);
    assert_eq!(dashboard["top_savers"][0]["total_savings"], 100.0);
    assert_eq!(
        dashboard["recent_payments"][0]["minister_name"],
        "Grace Achieng"
    );
}

#[tokio::test]
async fn csv_report_downloads_with_attachment_headers() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/reports/generate/summary",
                "start_date=2024-01-01&end_date=2024-03-31",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=summary_report_20240101_to_20240331.csv"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Lavisco Ministers Saving Scheme - Summary Report"));
}

#[tokio::test]
async fn pdf_report_downloads_with_attachment_headers() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/reports/pdf/detailed",
                "start_date=2024-01-01&end_date=2024-03-31",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=detailed_report_20240101_to_20240331.pdf"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn unknown_report_scope_is_rejected_before_rendering() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/reports/generate/weekly",
                "start_date=2024-01-01&end_date=2024-03-31",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_payment_amount_maps_to_422() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/ministers/add",
                "full_name=Grace%20Achieng&date_joined=2023-05-01",
            ),
            &session,
        ))
        .await
        .unwrap();
    let minister_id = body_json(response).await["id"].as_i64().unwrap();

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/payments/add",
                &format!("minister_id={minister_id}&amount=0.0&payment_date=2024-01-07"),
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn unknown_routes_render_the_not_found_page() {
    let router = test_router().await;

    let response = router
        .oneshot(get_request("/does-not-exist", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("404 - Page Not Found"));
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let router = test_router().await;
    let session = login(&router).await;

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/profile/password",
                "current_password=wrong&new_password=brand-new-pass",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(with_session(
            form_request(
                "/profile/password",
                "current_password=admin123&new_password=brand-new-pass",
            ),
            &session,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works; the new one does.
    let response = router
        .clone()
        .oneshot(form_request("/login", "username=admin&password=admin123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = router
        .clone()
        .oneshot(form_request(
            "/login",
            "username=admin&password=brand-new-pass",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
