use crate::helpers::make_test_app;
use axum::http::StatusCode;
use db::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn reads_require_a_token() {
    let app = make_test_app().await;

    let (status, body) = app.get("/api/courses", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let app = make_test_app().await;

    let (status, _) = app.get("/api/users", Some("not.a.jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let app = make_test_app().await;
    let (_, teacher) = app.user("teacher1", Role::Teacher).await;

    let (status, body) = app
        .post(
            "/api/groups",
            Some(&teacher),
            json!({ "name": "G1" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn session_routes_reject_students() {
    let app = make_test_app().await;
    let (_, student) = app.user("student1", Role::Student).await;

    let (status, body) = app
        .post(
            "/api/sessions/markAttendance",
            Some(&student),
            json!({
                "sessionId": "665f1c2e9b1d4a0012345678",
                "studentId": "665f1c2e9b1d4a0012345679",
                "isPresent": true
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Teacher or admin access required");
}

#[tokio::test]
async fn any_role_can_read() {
    let app = make_test_app().await;
    let (_, student) = app.user("student1", Role::Student).await;

    let (status, body) = app.get("/api/groups", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}
