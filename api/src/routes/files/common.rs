use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    #[validate(length(min = 1, message = "Filename must not be empty"))]
    pub filename: Option<String>,

    #[validate(length(min = 1, message = "File path must not be empty"))]
    pub file_path: Option<String>,

    #[serde(alias = "course")]
    pub course_id: Option<String>,
}
