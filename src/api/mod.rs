//! HTTP interface - router, shared state and server lifecycle.

/// Request extractors
pub mod extract;
/// Response envelope and error mapping
pub mod response;
/// Route handlers
pub mod routes;

use crate::{
    config::{AppConfig, app::ServerConfig},
    errors::Result,
};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DatabaseConnection,
    /// Loaded application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundles the pool and configuration for the router.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}

/// Builds the application router with tracing and CORS layers applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    let api = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/profile", get(routes::auth::profile))
        .route(
            "/employees",
            get(routes::employee::list_employees).post(routes::employee::create_employee),
        )
        .route(
            "/employees/{id}",
            get(routes::employee::get_employee)
                .put(routes::employee::update_employee)
                .delete(routes::employee::delete_employee),
        )
        .route(
            "/departments",
            get(routes::department::list_departments).post(routes::department::create_department),
        )
        .route(
            "/departments/{id}",
            put(routes::department::update_department)
                .delete(routes::department::delete_department),
        )
        .route(
            "/transfers",
            get(routes::transfer::list_transfers).post(routes::transfer::submit_transfer),
        )
        .route(
            "/transfers/{id}/approve",
            put(routes::transfer::approve_transfer),
        )
        .route("/backup/export", get(routes::backup::export_employees));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", addr, e))?;

    info!(%addr, "Personnel transfer API listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::{
        entities::{Employee, EmployeeStatus, TransferStatus},
        test_utils::setup_with_employee_and_department,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sea_orm::EntityTrait;
    use tower::ServiceExt;

    fn test_state(db: DatabaseConnection) -> AppState {
        AppState::new(db, Arc::new(AppConfig::default()))
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (db, _, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_submit_and_approve_department_move() {
        let (db, employee, department) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db.clone()));

        let submit = json!({
            "employee_id": employee.id,
            "type": 1,
            "transfer_date": "2024-03-01",
            "from_dept_id": 0,
            "to_dept_id": department.id,
            "reason": "team growth",
        });
        let (status, body) =
            send(&router, json_request(Method::POST, "/api/transfers", &submit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["status"], 1);
        assert!(body["data"]["from_department_id"].is_null());
        let transfer_id = body["data"]["id"].as_i64().unwrap();

        let approve = json!({ "status": 2, "approver_id": 7 });
        let uri = format!("/api/transfers/{transfer_id}/approve");
        let (status, body) = send(&router, json_request(Method::PUT, &uri, &approve)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], i32::from(TransferStatus::Approved));
        assert_eq!(body["data"]["approver_id"], 7);

        let moved = Employee::find_by_id(employee.id).one(&db).await.unwrap().unwrap();
        assert_eq!(moved.department, "Engineering");
        assert_eq!(moved.status, EmployeeStatus::Active);

        // A second decision conflicts
        let reject = json!({ "status": 3, "approver_id": 7 });
        let (status, body) = send(&router, json_request(Method::PUT, &uri, &reject)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], 409);
    }

    #[tokio::test]
    async fn test_submit_rejects_bad_input() {
        let (db, employee, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let unknown_type = json!({
            "employee_id": employee.id,
            "type": 9,
            "transfer_date": "2024-03-01",
        });
        let (status, _) =
            send(&router, json_request(Method::POST, "/api/transfers", &unknown_type)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing_target = json!({
            "employee_id": employee.id,
            "type": 1,
            "transfer_date": "2024-03-01",
            "to_dept_id": 0,
        });
        let (status, _) =
            send(&router, json_request(Method::POST, "/api/transfers", &missing_target)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown_employee = json!({
            "employee_id": 9999,
            "type": 3,
            "transfer_date": "2024-03-01",
        });
        let (status, body) =
            send(&router, json_request(Method::POST, "/api/transfers", &unknown_employee)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
    }

    #[tokio::test]
    async fn test_malformed_requests_get_enveloped_bad_request() {
        let (db, employee, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let missing_date = json!({ "employee_id": employee.id, "type": 3 });
        let (status, body) =
            send(&router, json_request(Method::POST, "/api/transfers", &missing_date)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(body["message"].as_str().unwrap().contains("transfer_date"));
        assert!(body.get("data").is_none());

        let request = Request::post("/api/transfers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let request = Request::get("/api/employees/abc").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);

        let request = Request::get("/api/employees?page=first")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }

    #[tokio::test]
    async fn test_employee_list_with_huge_page_is_empty() {
        let (db, _, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let uri = format!("/api/employees?page={}&page_size=100", u64::MAX);
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 1);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_approve_rejects_non_decision_status() {
        let (db, employee, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let submit = json!({
            "employee_id": employee.id,
            "type": 3,
            "transfer_date": "2024-03-01",
        });
        let (_, body) = send(&router, json_request(Method::POST, "/api/transfers", &submit)).await;
        let transfer_id = body["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/transfers/{transfer_id}/approve");
        for code in [1, 4] {
            let approve = json!({ "status": code, "approver_id": 7 });
            let (status, _) = send(&router, json_request(Method::PUT, &uri, &approve)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }

        let (status, _) = send(
            &router,
            json_request(
                Method::PUT,
                "/api/transfers/9999/approve",
                &json!({ "status": 2, "approver_id": 7 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_transfers_with_relations() {
        let (db, employee, department) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let submit = json!({
            "employee_id": employee.id,
            "type": 1,
            "transfer_date": "2024-03-01",
            "to_department_id": department.id,
        });
        send(&router, json_request(Method::POST, "/api/transfers", &submit)).await;

        let uri = format!("/api/transfers?employee_id={}&status=1", employee.id);
        let request = Request::get(uri).body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["type"], 1);
        assert_eq!(items[0]["employee"]["employee_no"], "E42");
        assert_eq!(items[0]["to_department"]["name"], "Engineering");
    }

    #[tokio::test]
    async fn test_employee_crud_and_paging() {
        let (db, _, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let create = json!({
            "employee_id": "E43",
            "name": "Ada",
            "status": 3,
            "arrival_date": "2024-02-01",
            "department": "Sales",
        });
        let (status, body) =
            send(&router, json_request(Method::POST, "/api/employees", &create)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["employee_no"], "E43");
        assert_eq!(body["data"]["status_text"], EmployeeStatus::Probation.label());
        let id = body["data"]["id"].as_i64().unwrap();

        let (status, _) =
            send(&router, json_request(Method::POST, "/api/employees", &create)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let request = Request::get("/api/employees?page=0&page_size=500&department=Sales")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["page"], 1);
        assert_eq!(body["data"]["page_size"], 10);

        let uri = format!("/api/employees/{id}");
        let (status, body) = send(
            &router,
            json_request(Method::PUT, &uri, &json!({ "position": "Lead" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["position"], "Lead");

        let request = Request::delete(uri.as_str()).body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);

        let request = Request::get(uri.as_str()).body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_register_login_profile() {
        let (db, _, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let register = json!({ "username": "hr-admin", "password": "s3cret!" });
        let (status, body) =
            send(&router, json_request(Method::POST, "/api/register", &register)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].get("password_hash").is_none());

        let wrong = json!({ "username": "hr-admin", "password": "nope-nope" });
        let (status, _) = send(&router, json_request(Method::POST, "/api/login", &wrong)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send(&router, json_request(Method::POST, "/api/login", &register)).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_string();

        let request = Request::get("/api/profile")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["username"], "hr-admin");

        let request = Request::get("/api/profile").body(Body::empty()).unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_backup_export_headers() {
        let (db, _, _) = setup_with_employee_and_department().await.unwrap();
        let router = build_router(test_state(db));

        let request = Request::get("/api/backup/export").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=employees_backup_"));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(body.starts_with('\u{feff}'));
        assert!(body.contains("E42"));
    }

    #[test]
    fn test_cors_layer_ignores_invalid_origins() {
        let origins = vec!["https://hr.example.com".to_string(), "\n".to_string()];
        let _layer = cors_layer(&origins);
        let _any = cors_layer(&[]);
    }
}
