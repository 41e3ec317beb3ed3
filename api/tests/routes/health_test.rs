use crate::helpers::make_test_app;
use axum::http::StatusCode;

#[tokio::test]
async fn health_is_public() {
    let app = make_test_app().await;

    let (status, body) = app.get("/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
}
