use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use crate::core::app::{api_routes, with_layers, AppServices};
use crate::core::database::test_pool;
use crate::features::categories::CategoryService;
use crate::features::reports::ReportService;
use crate::modules::classifier::test_support::FixedClassifier;
use crate::shared::category::Category;

/// Full router on a fresh in-memory database, classifying everything as
/// `Obstacle` with confidence 0.87
pub async fn test_server() -> TestServer {
    test_server_with(FixedClassifier::new(Category::Obstacle, 0.87)).await
}

pub async fn test_server_with(classifier: FixedClassifier) -> TestServer {
    let services = AppServices {
        report_service: Arc::new(ReportService::new(test_pool().await)),
        category_service: Arc::new(CategoryService::new()),
        classifier: Arc::new(classifier),
    };
    let app = with_layers(api_routes(services), vec!["*".to_string()]);
    TestServer::new(app).expect("test server")
}

/// Submit a valid report at a fixed Vienna position and return the body
pub async fn post_report(server: &TestServer, text: &str) -> Value {
    let response = server
        .post("/reports")
        .json(&json!({ "text": text, "latitude": 48.2082, "longitude": 16.3738 }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
