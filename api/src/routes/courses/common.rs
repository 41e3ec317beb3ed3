use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[validate(length(min = 3, message = "Course name must be at least 3 characters"))]
    pub name: String,

    #[serde(alias = "teacher")]
    pub teacher_id: String,

    pub files: Option<Vec<String>>,

    pub groups: Option<Vec<String>>,

    #[validate(range(exclusive_min = 0.0, message = "Total duration must be greater than zero"))]
    pub total_duration: f64,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[validate(length(min = 3, message = "Course name must be at least 3 characters"))]
    pub name: Option<String>,

    #[serde(alias = "teacher")]
    pub teacher_id: Option<String>,

    pub files: Option<Vec<String>>,

    pub groups: Option<Vec<String>>,

    #[validate(range(exclusive_min = 0.0, message = "Total duration must be greater than zero"))]
    pub total_duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileRequest {
    pub course_id: String,
    pub file_id: String,
}
