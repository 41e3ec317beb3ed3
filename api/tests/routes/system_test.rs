use crate::helpers::make_test_app;
use axum::http::StatusCode;
use db::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn deleted_course_leaves_orphans_until_purged() {
    let app = make_test_app().await;
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, teacher_token) = app.user("teacher1", Role::Teacher).await;

    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 10 }),
        )
        .await;
    let course_id = course["data"]["id"].as_str().unwrap().to_owned();
    let (_, group) = app.post("/api/groups", Some(&admin), json!({ "name": "G1" })).await;
    let group_id = group["data"]["id"].as_str().unwrap().to_owned();
    let (_, session) = app
        .post(
            "/api/sessions",
            Some(&teacher_token),
            json!({
                "courseId": course_id,
                "groupId": group_id,
                "date": "2024-03-01",
                "startTime": "09:00",
                "endTime": "10:00"
            }),
        )
        .await;
    let session_id = session["data"]["id"].as_str().unwrap().to_owned();

    let (status, report) = app.get("/api/system/orphans", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["data"]["sessionsWithoutCourse"], json!([]));

    app.delete(&format!("/api/courses/{course_id}"), Some(&admin)).await;

    let (_, report) = app.get("/api/system/orphans", Some(&admin)).await;
    assert_eq!(report["data"]["sessionsWithoutCourse"], json!([session_id]));

    let (status, purged) = app.delete("/api/system/orphans", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purged["data"]["deleted"]["sessions"], 1);

    let (_, report) = app.get("/api/system/orphans", Some(&admin)).await;
    assert_eq!(report["data"]["sessionsWithoutCourse"], json!([]));
}

#[tokio::test]
async fn maintenance_is_admin_only() {
    let app = make_test_app().await;
    let (_, teacher) = app.user("teacher1", Role::Teacher).await;

    let (status, _) = app.get("/api/system/orphans", Some(&teacher)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
