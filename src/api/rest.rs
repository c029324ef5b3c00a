// =============================================================================
// HTTP Endpoints — Axum 0.7
// =============================================================================
//
// `GET /` serves the single-page UI. Everything the page needs lives under
// `/api/v1/`:
//   GET  /api/v1/health   liveness
//   GET  /api/v1/config   form defaults, bounds and interval options
//   GET  /api/v1/status   idle/running and run counter
//   POST /api/v1/analyze  run one scan ("Analisar")
//
// There is no authentication. CORS is permissive.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::market_data::MarketDataProvider;
use crate::scanner::ScanRequest;
use crate::types::{Interval, ScanPhase};

const INDEX_HTML: &str = include_str!("../../static/index.html");

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router<P: MarketDataProvider>(state: Arc<AppState<P>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/config", get(ui_config::<P>))
        .route("/api/v1/status", get(status::<P>))
        .route("/api/v1/analyze", post(analyze::<P>))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// UI page
// =============================================================================

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Form configuration
// =============================================================================

#[derive(Serialize)]
struct WindowBounds {
    default: usize,
    min: usize,
    max: usize,
}

#[derive(Serialize)]
struct UiConfigResponse {
    defaults: ScanRequest,
    intervals: [Interval; 3],
    short_window: WindowBounds,
    long_window: WindowBounds,
    tickers: usize,
}

async fn ui_config<P: MarketDataProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> impl IntoResponse {
    let config = &state.config;
    Json(UiConfigResponse {
        defaults: ScanRequest::from_defaults(config),
        intervals: Interval::ALL,
        short_window: WindowBounds {
            default: config.default_short_window,
            min: 1,
            max: config.max_short_window,
        },
        long_window: WindowBounds {
            default: config.default_long_window,
            min: 1,
            max: config.max_long_window,
        },
        tickers: config.tickers.len(),
    })
}

// =============================================================================
// Run status
// =============================================================================

#[derive(Serialize)]
struct StatusResponse {
    phase: ScanPhase,
    runs_completed: u64,
    uptime_secs: u64,
}

async fn status<P: MarketDataProvider>(
    State(state): State<Arc<AppState<P>>>,
) -> impl IntoResponse {
    Json(StatusResponse {
        phase: state.phase(),
        runs_completed: state.runs_completed(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// =============================================================================
// Analyze ("Analisar")
// =============================================================================

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

async fn analyze<P: MarketDataProvider>(
    State(state): State<Arc<AppState<P>>>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "scan request body rejected");
            return error_response(rejection.status(), rejection.body_text());
        }
    };

    if let Err(e) = request.validate(&state.config) {
        warn!(error = %e, "scan request rejected");
        return error_response(StatusCode::BAD_REQUEST, e.to_string());
    }

    let report = state.run_scan(&request).await;
    info!(
        run_id = %report.run_id,
        tickers = ?report.tickers,
        "scan result delivered"
    );
    Json(report).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::market_data::provider::testing::StaticProvider;
    use crate::runtime_config::RuntimeConfig;
    use crate::scanner::NO_SIGNAL_MESSAGE;

    fn app(provider: StaticProvider, tickers: &[&str]) -> Router {
        let config = RuntimeConfig {
            tickers: tickers.iter().map(|s| s.to_string()).collect(),
            ..RuntimeConfig::default()
        };
        router(Arc::new(AppState::new(config, Arc::new(provider))))
    }

    fn late_rally() -> Vec<f64> {
        let mut closes = vec![100.0; 290];
        closes.extend((1..=9).map(|i| 100.0 - 0.5 * i as f64));
        closes.push(120.0);
        closes
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let resp = app(StaticProvider::new(), &[])
            .oneshot(get_request("/api/v1/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let resp = app(StaticProvider::new(), &[])
            .oneshot(get_request("/"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Analisar"));
        assert!(html.contains("alert("));
        assert!(html.contains("Maiores informações: https://www.linkedin.com/in/ilha/"));
    }

    #[tokio::test]
    async fn config_exposes_form_defaults() {
        let resp = app(StaticProvider::new(), &["PETR4.SA"])
            .oneshot(get_request("/api/v1/config"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["defaults"]["period"], "1d");
        assert_eq!(json["defaults"]["interval"], "15m");
        assert_eq!(json["intervals"], serde_json::json!(["15m", "30m", "60m"]));
        assert_eq!(json["short_window"]["default"], 50);
        assert_eq!(json["short_window"]["max"], 100);
        assert_eq!(json["long_window"]["default"], 200);
        assert_eq!(json["long_window"]["max"], 500);
        assert_eq!(json["tickers"], 1);
    }

    #[tokio::test]
    async fn status_starts_idle() {
        let resp = app(StaticProvider::new(), &[])
            .oneshot(get_request("/api/v1/status"))
            .await
            .unwrap();
        let json = body_json(resp).await;
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["runs_completed"], 0);
    }

    #[tokio::test]
    async fn analyze_returns_qualifying_charts() {
        let provider = StaticProvider::new()
            .with_closes("PETR4.SA", &late_rally())
            .with_failure("VALE3.SA");
        let body = serde_json::json!({
            "period": "5d", "interval": "30m", "short_window": 5, "long_window": 20
        });

        let resp = app(provider, &["PETR4.SA", "VALE3.SA"])
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["tickers"], serde_json::json!(["PETR4.SA"]));
        assert_eq!(json["charts"][0]["ticker"], "PETR4.SA");
        assert_eq!(json["charts"][0]["figure"]["data"].as_array().unwrap().len(), 5);
        assert_eq!(json["charts"][0]["macd"]["hist"].as_array().unwrap().len(), 300);
        assert!(json["message"].is_null());
    }

    #[tokio::test]
    async fn analyze_without_signal_returns_message() {
        let body = serde_json::json!({
            "period": "1d", "interval": "15m", "short_window": 50, "long_window": 200
        });

        let resp = app(StaticProvider::new(), &[])
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["tickers"], serde_json::json!([]));
        assert_eq!(json["charts"], serde_json::json!([]));
        assert_eq!(json["message"], NO_SIGNAL_MESSAGE);
    }

    #[tokio::test]
    async fn analyze_rejects_out_of_bounds_window() {
        let body = serde_json::json!({
            "period": "1d", "interval": "15m", "short_window": 50, "long_window": 900
        });

        let resp = app(StaticProvider::new(), &[])
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("long_window"));
    }

    #[tokio::test]
    async fn analyze_rejects_unknown_interval() {
        let body = serde_json::json!({
            "period": "1d", "interval": "1d", "short_window": 50, "long_window": 200
        });

        let resp = app(StaticProvider::new(), &[])
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("interval"));
    }

    #[tokio::test]
    async fn analyze_cleared_number_field_is_a_json_error() {
        // An emptied number input reaches the server as `null`.
        let body = serde_json::json!({
            "period": "1d", "interval": "15m", "short_window": null, "long_window": 200
        });

        let resp = app(StaticProvider::new(), &[])
            .oneshot(analyze_request(body))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("application/json"));
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("short_window"));
    }

    #[tokio::test]
    async fn analyze_malformed_body_is_a_json_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let resp = app(StaticProvider::new(), &[]).oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert!(json["error"].is_string());
    }
}
