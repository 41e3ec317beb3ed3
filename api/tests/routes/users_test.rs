use crate::helpers::make_test_app;
use axum::http::StatusCode;
use db::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = make_test_app().await;
    let (admin, _) = app.user("admin1", Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/users/login",
            None,
            json!({ "email": admin.email, "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["id"], admin.id);
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let token = body["data"]["token"].as_str().unwrap().to_owned();
    let (status, _) = app.get("/api/users", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = make_test_app().await;
    app.user("admin1", Role::Admin).await;

    let (status, body) = app
        .post(
            "/api/users/login",
            None,
            json!({ "email": "admin1@example.com", "password": "wrong1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn create_user_validates_and_detects_conflicts() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;

    let (status, _) = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "t1", "email": "t1@example.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "teacher1", "email": "t1@example.com", "password": "secret", "role": "teacher" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "teacher1", "email": "T1@Example.com", "password": "secret1", "role": "teacher" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "teacher");
    assert_eq!(body["data"]["email"], "t1@example.com");

    let (status, _) = app
        .post(
            "/api/users",
            Some(&admin),
            json!({ "username": "teacher1", "email": "other@example.com", "password": "secret1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_by_role_and_unknown_role() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;
    app.user("student1", Role::Student).await;

    let (status, body) = app.get("/api/users/role/teacher", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], teacher.id);

    let (status, _) = app.get("/api/users/role/lecturer", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_user_distinguishes_format_from_absence() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;

    let (status, _) = app.get("/api/users/not-an-id", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/users/665f1c2e9b1d4a0012345678", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_and_delete_user() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (student, _) = app.user("student1", Role::Student).await;

    let (status, body) = app
        .put(
            &format!("/api/users/{}", student.id),
            Some(&admin),
            json!({ "role": "teacher" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "teacher");

    let (status, _) = app.delete(&format!("/api/users/{}", student.id), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete(&format!("/api/users/{}", student.id), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
