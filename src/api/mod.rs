//! HTTP layer exposing the portfolio API.

pub mod routes;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::http::HeaderValue;
use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

fn cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(routes::ready))
        .route("/portfolio-monitoring/summary", get(routes::portfolio_summary))
        .route(
            "/startups",
            get(routes::list_startups).post(routes::create_startup),
        )
        .route(
            "/startups/:startup_id",
            get(routes::get_startup)
                .patch(routes::update_startup)
                .delete(routes::delete_startup),
        )
        .route(
            "/startups/:startup_id/indicators",
            get(routes::list_indicators).post(routes::create_indicator),
        )
        .route(
            "/startups/:startup_id/indicators/:indicator_id",
            get(routes::get_indicator)
                .patch(routes::update_indicator)
                .delete(routes::delete_indicator),
        )
        .route(
            "/startups/:startup_id/board-meetings",
            get(routes::list_meetings).post(routes::create_meeting),
        )
        .route(
            "/startups/:startup_id/board-meetings/:meeting_id",
            get(routes::get_meeting)
                .patch(routes::update_meeting)
                .delete(routes::delete_meeting),
        )
        .route(
            "/startups/:startup_id/executives",
            get(routes::list_executives).post(routes::create_executive),
        )
        .route(
            "/startups/:startup_id/executives/:executive_id",
            get(routes::get_executive)
                .patch(routes::update_executive)
                .delete(routes::delete_executive),
        )
        .route(
            "/startups/:startup_id/report-tokens",
            get(routes::list_report_tokens).post(routes::generate_report_token),
        )
        .route("/deals", get(routes::list_deals).post(routes::create_deal))
        .route(
            "/deals/:deal_id",
            get(routes::get_deal)
                .patch(routes::update_deal)
                .delete(routes::delete_deal),
        )
        .route("/deals/:deal_id/move", patch(routes::move_deal))
        .route("/report/:token", get(routes::report_form))
        .route(
            "/report/:token/submit",
            axum::routing::post(routes::submit_report),
        );

    Router::new()
        .nest("/api", api)
        .layer(cors(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(
    store: Arc<dyn Store>,
    cors_origins: &[String],
    host: String,
    port: u16,
) -> Result<()> {
    let router = router(AppState { store }, cors_origins);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving portfolio API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Datelike, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::store::MemoryStore;

    fn app() -> Router {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
        };
        router(state, &["http://localhost:4200".to_string()])
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_startup(app: &Router, name: &str, status: &str) -> String {
        let (code, body) = call(
            app,
            "POST",
            "/api/startups",
            Some(json!({
                "name": name,
                "status": status,
                "sector": "SaaS",
                "investment_date": "2024-06-01"
            })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_public_and_ready() {
        let app = app();
        let (code, body) = call(&app, "GET", "/api/health", None).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
        let (code, body) = call(&app, "GET", "/api/health/ready", None).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"status": "ready"}));
    }

    #[tokio::test]
    async fn empty_summary_has_zero_shape() {
        let app = app();
        let (code, body) = call(&app, "GET", "/api/portfolio-monitoring/summary", None).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "total_startups": 0,
                "portfolio_revenue": "0",
                "portfolio_health": {"healthy": 0, "warning": 0, "critical": 0},
                "monthly_report_pct": 0.0,
                "routines_up_to_date_pct": 0.0,
                "startups": []
            })
        );
    }

    #[tokio::test]
    async fn summary_reflects_current_month_reports() {
        let app = app();
        let today = Utc::now().date_naive();
        let reported = create_startup(&app, "Alpha", "healthy").await;
        create_startup(&app, "Bravo", "critical").await;

        let (code, _) = call(
            &app,
            "POST",
            &format!("/api/startups/{reported}/indicators"),
            Some(json!({
                "month": today.month(),
                "year": today.year(),
                "total_revenue": "1000.50",
                "cash_balance": "5000.00",
                "ebitda_burn": "-250.00",
                "headcount": 7
            })),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);

        let (code, _) = call(
            &app,
            "POST",
            &format!("/api/startups/{reported}/board-meetings"),
            Some(json!({"meeting_date": today.to_string()})),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);

        let (code, body) = call(&app, "GET", "/api/portfolio-monitoring/summary", None).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["total_startups"], 2);
        assert_eq!(body["portfolio_revenue"], "1000.50");
        assert_eq!(
            body["portfolio_health"],
            json!({"healthy": 1, "warning": 0, "critical": 1})
        );
        assert_eq!(body["monthly_report_pct"], 50.0);
        assert_eq!(body["routines_up_to_date_pct"], 50.0);
        assert_eq!(body["startups"][0]["startup"]["name"], "Alpha");
        assert_eq!(body["startups"][0]["headcount"], 7);
        assert_eq!(body["startups"][1]["total_revenue"], Value::Null);
    }

    #[tokio::test]
    async fn indicator_errors_map_to_statuses() {
        let app = app();
        let id = create_startup(&app, "Alpha", "healthy").await;
        let uri = format!("/api/startups/{id}/indicators");

        let (code, body) = call(&app, "POST", &uri, Some(json!({"month": 1, "year": 2100}))).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("future"));

        let (code, _) = call(&app, "POST", &uri, Some(json!({"month": 1, "year": 2020}))).await;
        assert_eq!(code, StatusCode::CREATED);
        let (code, _) = call(&app, "POST", &uri, Some(json!({"month": 1, "year": 2020}))).await;
        assert_eq!(code, StatusCode::CONFLICT);

        let missing = format!("/api/startups/{}/indicators", uuid::Uuid::new_v4());
        let (code, _) = call(&app, "GET", &missing, None).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn public_report_flow() {
        let app = app();
        let id = create_startup(&app, "Alpha", "warning").await;

        let (code, token) = call(
            &app,
            "POST",
            &format!("/api/startups/{id}/report-tokens"),
            Some(json!({"month": 6, "year": 2025})),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        let value = token["token"].as_str().unwrap().to_string();

        let (code, form) = call(&app, "GET", &format!("/api/report/{value}"), None).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(form["startup_name"], "Alpha");
        assert_eq!(form["existing_indicator"], Value::Null);

        let (code, _) = call(
            &app,
            "POST",
            &format!("/api/report/{value}/submit"),
            Some(json!({"total_revenue": "321.00", "achievements": "first enterprise deal"})),
        )
        .await;
        assert_eq!(code, StatusCode::NO_CONTENT);

        let (_, listing) = call(&app, "GET", &format!("/api/startups/{id}/indicators"), None).await;
        assert_eq!(listing["total"], 1);
        assert_eq!(listing["items"][0]["month"], 6);
        assert_eq!(listing["items"][0]["total_revenue"], "321.00");

        let (code, _) = call(
            &app,
            "GET",
            &format!("/api/report/{}", uuid::Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deal_can_be_moved_across_columns() {
        let app = app();
        let (code, deal) = call(&app, "POST", "/api/deals", Some(json!({"company": "Orbital"}))).await;
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(deal["column"], "new");
        let id = deal["id"].as_str().unwrap();

        let (code, moved) = call(
            &app,
            "PATCH",
            &format!("/api/deals/{id}/move"),
            Some(json!({"column": "committee", "position": 3})),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(moved["column"], "committee");
        assert_eq!(moved["position"], 3);
    }

    #[tokio::test]
    async fn deleting_a_startup_removes_it_from_the_summary() {
        let app = app();
        let id = create_startup(&app, "Alpha", "healthy").await;
        let (code, _) = call(&app, "DELETE", &format!("/api/startups/{id}"), None).await;
        assert_eq!(code, StatusCode::NO_CONTENT);
        let (code, _) = call(&app, "GET", &format!("/api/startups/{id}"), None).await;
        assert_eq!(code, StatusCode::NOT_FOUND);
        let (_, body) = call(&app, "GET", "/api/portfolio-monitoring/summary", None).await;
        assert_eq!(body["total_startups"], 0);
    }
}
