use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::middleware;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::reports::{routes as reports_routes, ReportService};
use crate::modules::classifier::TextClassifier;
use crate::shared::types::HealthResponse;

/// Everything the HTTP layer needs, built once at startup
#[derive(Clone)]
pub struct AppServices {
    pub report_service: Arc<ReportService>,
    pub category_service: Arc<CategoryService>,
    pub classifier: Arc<dyn TextClassifier>,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// All API routes, without swagger and without the tower layers
pub fn api_routes(services: AppServices) -> Router {
    Router::new()
        .merge(reports_routes::routes(
            services.report_service,
            services.classifier,
        ))
        .merge(categories_routes::routes(services.category_service))
        .route("/health", get(health_check))
}

/// Wrap a router in CORS, request id and tracing layers
pub fn with_layers(router: Router, cors_allowed_origins: Vec<String>) -> Router {
    router
        .layer(middleware::cors_layer(cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::modules::classifier::test_support::FixedClassifier;
    use crate::shared::category::Category;
    use crate::shared::test_helpers::{post_report, test_server, test_server_with};

    #[tokio::test]
    async fn test_health() {
        let server = test_server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_create_report_returns_classified_report() {
        let server = test_server().await;

        let response = server
            .post("/reports")
            .json(&json!({
                "text": "Glass on bike lane at intersection",
                "latitude": 48.2082,
                "longitude": 16.3738,
                "source": "real"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert!(body["id"].as_i64().unwrap() > 0);
        assert_eq!(body["text"], "Glass on bike lane at intersection");
        assert_eq!(body["category"], "Obstacle");
        assert_eq!(body["confidence"], 0.87);
        assert_eq!(body["source"], "real");
        assert_eq!(body["is_corrected"], false);
        assert_eq!(body["model_name"], "fixed");
        assert!(body["timestamp"].as_str().is_some());

        let listed: Value = server.get("/reports").await.json();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], body["id"]);
    }

    #[tokio::test]
    async fn test_create_report_trims_text_and_defaults_source() {
        let server = test_server().await;

        let response = server
            .post("/reports")
            .json(&json!({
                "text": "   Scherben am Radweg   ",
                "latitude": 48.2,
                "longitude": 16.4
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["text"], "Scherben am Radweg");
        assert_eq!(body["source"], "real");
    }

    #[tokio::test]
    async fn test_short_text_is_rejected_with_detail() {
        let server = test_server().await;

        let response = server
            .post("/reports")
            .json(&json!({ "text": "abc", "latitude": 48.2, "longitude": 16.3 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Text must be at least 5 characters.");

        let listed: Value = server.get("/reports").await.json();
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_and_symbol_only_text_are_rejected() {
        let server = test_server().await;

        let long: Value = server
            .post("/reports")
            .json(&json!({ "text": "a".repeat(151), "latitude": 48.2, "longitude": 16.3 }))
            .await
            .json();
        assert_eq!(long["detail"], "Text must be at most 150 characters.");

        let symbols: Value = server
            .post("/reports")
            .json(&json!({ "text": "!!!!!! 🚲🚲", "latitude": 48.2, "longitude": 16.3 }))
            .await
            .json();
        assert_eq!(
            symbols["detail"],
            "Text must contain letters or numbers (not only emojis/symbols)."
        );
    }

    #[tokio::test]
    async fn test_missing_latitude_is_bad_request() {
        let server = test_server().await;

        let response = server
            .post("/reports")
            .json(&json!({ "text": "Glass on bike lane", "longitude": 16.3 }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("latitude"));
    }

    #[tokio::test]
    async fn test_list_filters_by_category_and_search() {
        let server = test_server_with(FixedClassifier::new(Category::Obstacle, 0.9)).await;
        post_report(&server, "Glass on bike lane at intersection").await;
        post_report(&server, "Fallen branch after the storm").await;

        let obstacles: Value = server
            .get("/reports")
            .add_query_param("category", "Obstacle")
            .add_query_param("search", "GLASS")
            .await
            .json();
        assert_eq!(obstacles.as_array().unwrap().len(), 1);
        assert_eq!(obstacles[0]["text"], "Glass on bike lane at intersection");

        let danger: Value = server
            .get("/reports")
            .add_query_param("category", "DangerSpot")
            .await
            .json();
        assert!(danger.as_array().unwrap().is_empty());

        let all: Value = server
            .get("/reports")
            .add_query_param("category", "")
            .await
            .json();
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(all[0]["text"], "Fallen branch after the storm");
    }

    #[tokio::test]
    async fn test_unknown_category_filter_is_bad_request() {
        let server = test_server().await;
        let response = server
            .get("/reports")
            .add_query_param("category", "Pothole")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["detail"].as_str().unwrap().contains("Pothole"));
    }

    #[tokio::test]
    async fn test_spam_hidden_unless_requested() {
        let server = test_server_with(FixedClassifier::new(Category::Spam, 0.95)).await;
        post_report(&server, "Buy cheap bikes at www.example.com").await;

        let hidden: Value = server.get("/reports").await.json();
        assert!(hidden.as_array().unwrap().is_empty());

        let shown: Value = server
            .get("/reports")
            .add_query_param("include_spam", "true")
            .await
            .json();
        assert_eq!(shown.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_is_csv_attachment() {
        let server = test_server().await;
        post_report(&server, "Glass on bike lane at intersection").await;
        post_report(&server, "Glas, Steine und Äste").await;

        let response = server.get("/reports/export").await;

        response.assert_status_ok();
        assert_eq!(
            response.header("content-type"),
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"reports.csv\""
        );

        let text = response.text();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,text,latitude,longitude,timestamp,category,confidence,source,is_corrected")
        );

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Glas, Steine und Äste");
    }

    #[tokio::test]
    async fn test_get_missing_report_is_not_found() {
        let server = test_server().await;
        let response = server.get("/reports/42").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["detail"], "Report 42 not found");
    }

    #[tokio::test]
    async fn test_correction_survives_reclassification() {
        let server = test_server().await;
        let created = post_report(&server, "Glass on bike lane at intersection").await;
        let id = created["id"].as_i64().unwrap();

        let corrected: Value = server
            .patch(&format!("/reports/{}/category", id))
            .json(&json!({ "category": "Gefahrenstelle" }))
            .await
            .json();
        assert_eq!(corrected["category"], "DangerSpot");
        assert_eq!(corrected["is_corrected"], true);

        let response = server.post(&format!("/reports/{}/reclassify", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["reclassified"], false);
        assert_eq!(body["report"]["category"], "DangerSpot");
    }

    #[tokio::test]
    async fn test_reclassify_uncorrected_report() {
        let server = test_server().await;
        let created = post_report(&server, "Glass on bike lane at intersection").await;
        let id = created["id"].as_i64().unwrap();

        let body: Value = server
            .post(&format!("/reports/{}/reclassify", id))
            .await
            .json();
        assert_eq!(body["reclassified"], true);
        assert_eq!(body["report"]["category"], "Obstacle");
    }

    #[tokio::test]
    async fn test_correction_with_unknown_category_is_bad_request() {
        let server = test_server().await;
        let created = post_report(&server, "Glass on bike lane at intersection").await;

        let response = server
            .patch(&format!("/reports/{}/category", created["id"]))
            .json(&json!({ "category": "Pothole" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_categories_in_both_languages() {
        let server = test_server().await;

        let en: Value = server.get("/categories").await.json();
        assert_eq!(en.as_array().unwrap().len(), 5);
        assert_eq!(en[1]["value"], "DangerSpot");
        assert_eq!(en[1]["label"], "Danger Spot");

        let de: Value = server
            .get("/categories")
            .add_query_param("lang", "de")
            .await
            .json();
        assert_eq!(de[1]["value"], "DangerSpot");
        assert_eq!(de[1]["label"], "Gefahrenstelle");

        server
            .get("/categories")
            .add_query_param("lang", "fr")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let server = test_server().await;
        let response = server.get("/health").await;
        assert!(!response.header("x-request-id").is_empty());
    }
}
