use axum::routing::{get, post, put};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{distribution_handlers, ops_handlers, report_handlers, spin_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/spin", post(spin_handlers::spin))
        .route(
            "/v1/inventory",
            get(distribution_handlers::get_inventory).put(distribution_handlers::save_distributions),
        )
        .route(
            "/v1/inventory/:location_id/slots",
            put(distribution_handlers::set_slots),
        )
        .route(
            "/v1/inventory/reset",
            post(distribution_handlers::reset_inventory),
        )
        .route("/v1/reports/daily", get(report_handlers::daily_report))
        .route("/v1/reports/summary", get(report_handlers::range_summary))
        .route("/v1/history", get(report_handlers::list_history))
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .route(
            "/v1/ops/history-writer",
            get(ops_handlers::history_writer_stats),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tokio::sync::{Mutex, RwLock};
    use tower::ServiceExt;

    use backend_application::Metrics;
    use backend_domain::services::SequenceSource;
    use backend_domain::{default_inventory, Inventory, RuntimeConfig};
    use backend_infrastructure::{MemoryHistoryRepository, MemoryInventoryRepository, QueuedHistoryWriter};

    fn test_state(api_token: Option<&str>, inventory: Inventory) -> AppState {
        let history = Arc::new(MemoryHistoryRepository::new());
        AppState {
            config: RuntimeConfig {
                api_token: api_token.map(str::to_string),
                ..RuntimeConfig::default()
            },
            inventory_repo: Arc::new(MemoryInventoryRepository::with_inventory(inventory)),
            history_repo: history.clone(),
            history_sink: Arc::new(QueuedHistoryWriter::spawn(history)),
            rng: Arc::new(Mutex::new(Box::new(SequenceSource::new(vec![0])))),
            local_inventory: Arc::new(RwLock::new(Inventory::new())),
            metrics: Arc::new(Metrics::default()),
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn read_json(res: Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn spin_returns_outcome_and_remaining_slots() {
        let app = build_router(test_state(None, default_inventory()));
        let res = app
            .oneshot(json_request("POST", "/v1/spin", json!({ "location_id": "location1" })))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = read_json(res).await;
        assert_eq!(body["number"], 1);
        assert_eq!(body["location_name"], "Goma");
        assert_eq!(body["remaining"][0], 79);
        assert_eq!(body["inventory_persisted"], true);
    }

    #[tokio::test]
    async fn exhausted_location_is_a_conflict() {
        let mut inventory = default_inventory();
        inventory.retain(|id, _| id == "location4");
        inventory.get_mut("location4").expect("location4").slots = Default::default();
        let app = build_router(test_state(None, inventory));

        let res = app
            .oneshot(json_request("POST", "/v1/spin", json!({ "location_id": "location4" })))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body = read_json(res).await;
        assert_eq!(body["error"], "no prizes left at location4");
    }

    #[tokio::test]
    async fn set_slots_validates_length() {
        let app = build_router(test_state(None, default_inventory()));
        let res = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/v1/inventory/location2/slots",
                json!({ "slots": [1, 2, 3] }),
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = app
            .oneshot(json_request(
                "PUT",
                "/v1/inventory/location2/slots",
                json!({ "slots": [1, -2, "3", 4, 5, 6, 7, 8] }),
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = read_json(res).await;
        assert_eq!(body["slots"], json!([1, 0, 3, 4, 5, 6, 7, 8]));
    }

    #[tokio::test]
    async fn token_guards_everything_but_health() {
        let app = build_router(test_state(Some("s3cret"), default_inventory()));
        let res = app
            .clone()
            .oneshot(Request::get("/v1/inventory").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = app
            .clone()
            .oneshot(
                Request::get("/v1/inventory")
                    .header("Authorization", "Bearer s3cret")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .oneshot(Request::get("/v1/ops/health/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ops_endpoints_report_spin_counters() {
        let app = build_router(test_state(None, default_inventory()));
        let res = app
            .clone()
            .oneshot(json_request("POST", "/v1/spin", json!({ "location_id": "location3" })))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);

        let res = app
            .clone()
            .oneshot(
                Request::get("/v1/ops/metrics/prometheus")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let text = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(text.contains("wheel_spins_total 1"));

        let res = app
            .oneshot(Request::get("/v1/ops/history-writer").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = read_json(res).await;
        assert!(body.get("delivered").is_some());
    }

    #[tokio::test]
    async fn daily_report_rejects_unknown_band() {
        let app = build_router(test_state(None, default_inventory()));
        let res = app
            .oneshot(
                Request::get("/v1/reports/daily?date=2024-03-01&frequency=warm")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
