use crate::helpers::{app::multipart_request, make_test_app, TestApp};
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use db::models::user::Role;
use serde_json::json;
use tower::ServiceExt;

async fn course_with_admin(app: &TestApp) -> (String, String) {
    let (_, admin) = app.user("admin1", Role::Admin).await;
    let (teacher, _) = app.user("teacher1", Role::Teacher).await;
    let (_, course) = app
        .post(
            "/api/courses",
            Some(&admin),
            json!({ "name": "Algebra", "teacherId": teacher.id, "totalDuration": 10 }),
        )
        .await;
    (admin, course["data"]["id"].as_str().unwrap().to_owned())
}

#[tokio::test]
async fn upload_stores_file_and_serves_it_back() {
    let app = make_test_app().await;
    let (admin, course_id) = course_with_admin(&app).await;

    let (status, body) = app
        .send(multipart_request(
            &format!("/api/courses/{course_id}/files"),
            &admin,
            "Week 1 Notes.pdf",
            b"%PDF-1.4 test",
            Some("syllabus"),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["courseId"], course_id);
    assert_eq!(body["data"]["section"], "syllabus");

    let locator = body["data"]["filePath"].as_str().unwrap().to_owned();
    assert!(locator.starts_with("http://files.test/uploads/syllabus/"));
    assert!(locator.ends_with(".pdf"));
    let stored = locator.rsplit('/').next().unwrap();
    assert_eq!(body["data"]["filename"], stored);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/syllabus/{stored}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"%PDF-1.4 test");

    let (status, files) = app
        .get(&format!("/api/courses/{course_id}/files"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(files["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn upload_rejects_disallowed_extension_and_missing_course() {
    let app = make_test_app().await;
    let (admin, course_id) = course_with_admin(&app).await;

    let (status, body) = app
        .send(multipart_request(
            &format!("/api/courses/{course_id}/files"),
            &admin,
            "tool.exe",
            b"MZ",
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains(".pdf"));

    let (status, _) = app
        .send(multipart_request(
            "/api/courses/665f1c2e9b1d4a0012345678/files",
            &admin,
            "notes.pdf",
            b"%PDF",
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn course_without_files_lists_as_not_found() {
    let app = make_test_app().await;
    let (admin, course_id) = course_with_admin(&app).await;

    let (status, _) = app
        .get(&format!("/api/courses/{course_id}/files"), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_file_is_idempotent() {
    let app = make_test_app().await;
    let (admin, course_id) = course_with_admin(&app).await;

    let (_, uploaded) = app
        .send(multipart_request(
            &format!("/api/courses/{course_id}/files"),
            &admin,
            "slides.png",
            b"\x89PNG",
            None,
        ))
        .await;
    let file_id = uploaded["data"]["id"].as_str().unwrap().to_owned();
    assert_eq!(uploaded["data"]["section"], "general");

    for _ in 0..2 {
        let (status, body) = app
            .post(
                "/api/courses/addFile",
                Some(&admin),
                json!({ "courseId": course_id, "fileId": file_id }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["files"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"]["files"][0]["id"], file_id);
    }
}

#[tokio::test]
async fn edit_and_delete_file_record() {
    let app = make_test_app().await;
    let (admin, course_id) = course_with_admin(&app).await;

    let (_, uploaded) = app
        .send(multipart_request(
            &format!("/api/courses/{course_id}/files"),
            &admin,
            "photo.jpg",
            b"\xff\xd8",
            None,
        ))
        .await;
    let file_id = uploaded["data"]["id"].as_str().unwrap().to_owned();

    let (status, body) = app
        .put(
            &format!("/api/files/{file_id}"),
            Some(&admin),
            json!({ "filename": "cover.jpg" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filename"], "cover.jpg");

    let (status, _) = app
        .put(
            &format!("/api/files/{file_id}"),
            Some(&admin),
            json!({ "courseId": "665f1c2e9b1d4a0012345678" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/files/{file_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/files/{file_id}"), Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn download_rejects_unknown_names() {
    let app = make_test_app().await;

    let (status, _) = app.get("/uploads/general/missing.pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/uploads/../secret.pdf", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
